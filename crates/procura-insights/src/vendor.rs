//! Vendor evaluation: rolling scores, complaints, and the A-D class

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of an open complaint, with a fixed score deduction each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintSeverity {
    Minor,
    Major,
    Critical,
}

impl ComplaintSeverity {
    /// The deduction an OPEN complaint of this severity applies to the
    /// vendor's adjusted score.
    pub fn deduction(self) -> f64 {
        match self {
            ComplaintSeverity::Minor => 0.1,
            ComplaintSeverity::Major => 0.3,
            ComplaintSeverity::Critical => 0.8,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Open,
    Resolved,
}

/// A non-conformance report against a vendor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub severity: ComplaintSeverity,
    pub status: ComplaintStatus,
    pub summary: String,
    pub resolution: String,
    pub resolved_by: String,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Complaint {
    pub fn new(severity: ComplaintSeverity, summary: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            severity,
            status: ComplaintStatus::Open,
            summary: summary.into(),
            resolution: String::new(),
            resolved_by: String::new(),
            resolved_at: None,
        }
    }
}

/// Per-criterion scores of one evaluation round (1.0-5.0; 0 = not rated).
///
/// `overall` is the mean of the rated criteria, computed on insertion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub date: DateTime<Utc>,
    pub quality: f64,
    pub delivery: f64,
    pub price: f64,
    pub communication: f64,
    pub technical_capability: f64,
    pub compliance: f64,
    pub flexibility: f64,
    pub documentation: f64,
    pub overall: f64,
}

impl Evaluation {
    fn criteria(&self) -> [f64; 8] {
        [
            self.quality,
            self.delivery,
            self.price,
            self.communication,
            self.technical_capability,
            self.compliance,
            self.flexibility,
            self.documentation,
        ]
    }
}

/// Rolling purchasing scores shown on the vendor master record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchasingScores {
    pub quality_rating: f64,
    /// Percentage, derived from the 1-5 delivery score
    pub delivery_reliability: f64,
    pub price_competitiveness: f64,
    /// Average overall score, adjusted for open complaints
    pub overall_score: f64,
}

/// The slice of vendor master data the derivations need.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub id: Uuid,
    pub name: String,
    pub evaluations: Vec<Evaluation>,
    pub complaints: Vec<Complaint>,
    pub purchasing: PurchasingScores,
}

impl VendorRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record an evaluation round and recompute the rolling purchasing
    /// scores.
    pub fn add_evaluation(&mut self, mut evaluation: Evaluation) {
        let rated: Vec<f64> = evaluation
            .criteria()
            .iter()
            .copied()
            .filter(|v| *v > 0.0)
            .collect();
        evaluation.overall = if rated.is_empty() {
            0.0
        } else {
            round2(rated.iter().sum::<f64>() / rated.len() as f64)
        };
        self.evaluations.insert(0, evaluation);
        self.recompute_scores();
    }

    pub fn add_complaint(&mut self, complaint: Complaint) {
        self.complaints.insert(0, complaint);
        self.recompute_scores();
    }

    pub fn resolve_complaint(&mut self, id: Uuid, resolution: &str, resolved_by: &str) {
        if let Some(c) = self.complaints.iter_mut().find(|c| c.id == id) {
            c.status = ComplaintStatus::Resolved;
            c.resolution = resolution.to_owned();
            c.resolved_by = resolved_by.to_owned();
            c.resolved_at = Some(Utc::now());
        }
        self.recompute_scores();
    }

    /// Total deduction from currently OPEN complaints.
    pub fn complaint_deduction(&self) -> f64 {
        self.complaints
            .iter()
            .filter(|c| c.status == ComplaintStatus::Open)
            .map(|c| c.severity.deduction())
            .sum()
    }

    /// Mean of all recorded overall scores (unadjusted).
    pub fn average_score(&self) -> f64 {
        if self.evaluations.is_empty() {
            return 0.0;
        }
        self.evaluations.iter().map(|e| e.overall).sum::<f64>() / self.evaluations.len() as f64
    }

    /// The vendor's evaluation class: average score minus the open
    /// complaint deduction, bucketed A-D.
    pub fn evaluation_class(&self) -> EvaluationClass {
        if self.evaluations.is_empty() {
            return EvaluationClass::NotEvaluated;
        }
        let adjusted = (self.average_score() - self.complaint_deduction()).max(0.0);
        if adjusted >= 4.0 {
            EvaluationClass::A
        } else if adjusted >= 3.0 {
            EvaluationClass::B
        } else if adjusted >= 2.0 {
            EvaluationClass::C
        } else {
            EvaluationClass::D
        }
    }

    fn recompute_scores(&mut self) {
        let n = self.evaluations.len();
        if n == 0 {
            self.purchasing = PurchasingScores::default();
            return;
        }
        let avg = |f: fn(&Evaluation) -> f64| {
            self.evaluations.iter().map(f).sum::<f64>() / n as f64
        };
        let scores = PurchasingScores {
            quality_rating: round1(avg(|e| e.quality)),
            delivery_reliability: round1(avg(|e| e.delivery) * 20.0),
            price_competitiveness: round1(avg(|e| e.price)),
            overall_score: round1((avg(|e| e.overall) - self.complaint_deduction()).max(0.0)),
        };
        self.purchasing = scores;
    }
}

/// The four supplier classes, plus the unrated state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationClass {
    /// Preferred supplier (adjusted score >= 4.0)
    A,
    /// Approved supplier (>= 3.0)
    B,
    /// Conditional supplier (>= 2.0)
    C,
    /// Restricted supplier
    D,
    NotEvaluated,
}

impl EvaluationClass {
    pub fn label(self) -> &'static str {
        match self {
            EvaluationClass::A => "Preferred Supplier",
            EvaluationClass::B => "Approved Supplier",
            EvaluationClass::C => "Conditional Supplier",
            EvaluationClass::D => "Restricted Supplier",
            EvaluationClass::NotEvaluated => "Not Evaluated",
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(score: f64) -> Evaluation {
        Evaluation {
            quality: score,
            delivery: score,
            price: score,
            ..Default::default()
        }
    }

    #[test]
    fn overall_averages_rated_criteria_only() {
        let mut vendor = VendorRecord::new("Acme Parts");
        vendor.add_evaluation(Evaluation {
            quality: 4.0,
            delivery: 5.0,
            ..Default::default()
        });
        assert_eq!(vendor.evaluations[0].overall, 4.5);
    }

    #[test]
    fn unrated_vendor_has_no_class() {
        let vendor = VendorRecord::new("Acme Parts");
        assert_eq!(vendor.evaluation_class(), EvaluationClass::NotEvaluated);
    }

    #[test]
    fn class_buckets() {
        for (score, expected) in [
            (4.5, EvaluationClass::A),
            (4.0, EvaluationClass::A),
            (3.2, EvaluationClass::B),
            (2.5, EvaluationClass::C),
            (1.0, EvaluationClass::D),
        ] {
            let mut vendor = VendorRecord::new("V");
            vendor.add_evaluation(eval(score));
            assert_eq!(vendor.evaluation_class(), expected, "score {score}");
        }
    }

    #[test]
    fn open_complaints_deduct_by_severity() {
        let mut vendor = VendorRecord::new("Acme Parts");
        vendor.add_evaluation(eval(4.2));
        assert_eq!(vendor.evaluation_class(), EvaluationClass::A);

        vendor.add_complaint(Complaint::new(ComplaintSeverity::Minor, "late delivery"));
        assert_eq!(vendor.complaint_deduction(), 0.1);
        // 4.2 - 0.1 = 4.1, still A
        assert_eq!(vendor.evaluation_class(), EvaluationClass::A);

        vendor.add_complaint(Complaint::new(ComplaintSeverity::Critical, "defective lot"));
        // 4.2 - 0.9 = 3.3 -> B
        assert_eq!(vendor.evaluation_class(), EvaluationClass::B);
    }

    #[test]
    fn resolving_a_complaint_restores_the_score() {
        let mut vendor = VendorRecord::new("Acme Parts");
        vendor.add_evaluation(eval(3.1));
        let complaint = Complaint::new(ComplaintSeverity::Major, "wrong part delivered");
        let id = complaint.id;
        vendor.add_complaint(complaint);
        assert_eq!(vendor.evaluation_class(), EvaluationClass::C);

        vendor.resolve_complaint(id, "replacement shipped", "carol@acme.com");
        assert_eq!(vendor.complaint_deduction(), 0.0);
        assert_eq!(vendor.evaluation_class(), EvaluationClass::B);
    }

    #[test]
    fn deduction_never_drives_score_negative() {
        let mut vendor = VendorRecord::new("Acme Parts");
        vendor.add_evaluation(eval(0.5));
        for _ in 0..3 {
            vendor.add_complaint(Complaint::new(ComplaintSeverity::Critical, "bad"));
        }
        assert_eq!(vendor.purchasing.overall_score, 0.0);
        assert_eq!(vendor.evaluation_class(), EvaluationClass::D);
    }

    #[test]
    fn rolling_scores_follow_evaluations() {
        let mut vendor = VendorRecord::new("Acme Parts");
        vendor.add_evaluation(eval(4.0));
        vendor.add_evaluation(eval(2.0));
        assert_eq!(vendor.purchasing.quality_rating, 3.0);
        assert_eq!(vendor.purchasing.delivery_reliability, 60.0);
    }
}
