//! Approval chains: the ordered record of per-level decisions
//!
//! Every chain mutation goes through [`ApprovalChain`] so its invariants
//! hold by construction:
//!
//! - at most one step is `Pending` at any time (the active gate);
//! - every step before the active gate is `Approved`;
//! - no step exists for a level that was skipped.

use crate::{DocumentType, WorkflowError, WorkflowResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ladder of approval gates a document climbs.
///
/// `Finance` is a level tag, not a role: no standalone finance role exists,
/// and finance-level approval is reserved to admins and superadmins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    Requester,
    Manager,
    Admin,
    Finance,
}

impl ApprovalLevel {
    /// The level that follows this one for the given document type, or
    /// `None` if this level is terminal.
    ///
    /// PRs terminate at `Admin`; POs skip `Admin` and terminate at
    /// `Finance`. The asymmetry is intentional: requisitions get an extra
    /// financial gate once converted to orders.
    pub fn next(self, document_type: DocumentType) -> Option<ApprovalLevel> {
        match (self, document_type) {
            (ApprovalLevel::Requester, _) => Some(ApprovalLevel::Manager),
            (ApprovalLevel::Manager, DocumentType::Requisition) => Some(ApprovalLevel::Admin),
            (ApprovalLevel::Manager, DocumentType::Order) => Some(ApprovalLevel::Finance),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalLevel::Requester => "requester",
            ApprovalLevel::Manager => "manager",
            ApprovalLevel::Admin => "admin",
            ApprovalLevel::Finance => "finance",
        }
    }
}

impl fmt::Display for ApprovalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome recorded on a single approval step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Approved,
    Rejected,
}

/// One entry in an approval chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalStep {
    pub level: ApprovalLevel,
    /// Who decided (empty while the step is pending)
    pub approver: String,
    pub status: StepStatus,
    /// When the decision was recorded
    pub date: Option<DateTime<Utc>>,
    pub notes: String,
}

impl ApprovalStep {
    fn pending(level: ApprovalLevel) -> Self {
        Self {
            level,
            approver: String::new(),
            status: StepStatus::Pending,
            date: None,
            notes: String::new(),
        }
    }

    fn decided(level: ApprovalLevel, approver: &str, status: StepStatus, notes: &str) -> Self {
        Self {
            level,
            approver: approver.to_owned(),
            status,
            date: Some(Utc::now()),
            notes: notes.to_owned(),
        }
    }
}

/// The ordered sequence of per-level approval steps attached to a PR/PO.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalChain(Vec<ApprovalStep>);

impl ApprovalChain {
    /// An empty chain (a freshly created draft).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[ApprovalStep] {
        &self.0
    }

    /// The single pending step, if any (the active gate).
    pub fn active_gate(&self) -> Option<&ApprovalStep> {
        self.0.iter().find(|s| s.status == StepStatus::Pending)
    }

    /// Whether any step was rejected (terminal).
    pub fn is_rejected(&self) -> bool {
        self.0.iter().any(|s| s.status == StepStatus::Rejected)
    }

    /// The highest level closed as approved, if any.
    pub fn last_approved_level(&self) -> Option<ApprovalLevel> {
        self.0
            .iter()
            .rev()
            .find(|s| s.status == StepStatus::Approved)
            .map(|s| s.level)
    }

    /// Open the chain on submission: the requester's own sign-off followed
    /// by a pending manager gate.
    pub fn submit(&mut self, requester: &str) -> WorkflowResult<()> {
        if !self.0.is_empty() {
            return Err(WorkflowError::AlreadySubmitted);
        }
        self.0.push(ApprovalStep::decided(
            ApprovalLevel::Requester,
            requester,
            StepStatus::Approved,
            "",
        ));
        self.0.push(ApprovalStep::pending(ApprovalLevel::Manager));
        Ok(())
    }

    /// Close the active gate as approved and, unless `level` is terminal
    /// for the document type, open the next level's gate.
    ///
    /// Fails without touching the chain when `level` does not match the
    /// active gate: a wrong-level approval must never mutate an unrelated
    /// step.
    pub fn approve(
        &mut self,
        document_type: DocumentType,
        level: ApprovalLevel,
        approver: &str,
        notes: &str,
    ) -> WorkflowResult<()> {
        self.close_active(level, approver, StepStatus::Approved, notes)?;
        if let Some(next) = level.next(document_type) {
            self.0.push(ApprovalStep::pending(next));
        }
        Ok(())
    }

    /// Close the active gate as rejected. Terminal: no further step is
    /// opened.
    pub fn reject(
        &mut self,
        level: ApprovalLevel,
        approver: &str,
        notes: &str,
    ) -> WorkflowResult<()> {
        self.close_active(level, approver, StepStatus::Rejected, notes)
    }

    fn close_active(
        &mut self,
        level: ApprovalLevel,
        approver: &str,
        status: StepStatus,
        notes: &str,
    ) -> WorkflowResult<()> {
        let expected = self.active_gate().map(|s| s.level);
        if expected != Some(level) {
            return Err(WorkflowError::WrongLevel {
                expected,
                got: level,
            });
        }
        let step = self
            .0
            .iter_mut()
            .find(|s| s.status == StepStatus::Pending)
            .expect("active gate checked above");
        *step = ApprovalStep::decided(level, approver, status, notes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_opens_manager_gate() {
        let mut chain = ApprovalChain::new();
        chain.submit("alice@acme.com").unwrap();

        assert_eq!(chain.steps().len(), 2);
        assert_eq!(chain.steps()[0].status, StepStatus::Approved);
        assert_eq!(chain.active_gate().unwrap().level, ApprovalLevel::Manager);
    }

    #[test]
    fn double_submit_rejected() {
        let mut chain = ApprovalChain::new();
        chain.submit("alice").unwrap();
        let err = chain.submit("alice").unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadySubmitted));
        assert_eq!(chain.steps().len(), 2);
    }

    #[test]
    fn pr_terminates_at_admin() {
        let mut chain = ApprovalChain::new();
        chain.submit("alice").unwrap();
        chain
            .approve(DocumentType::Requisition, ApprovalLevel::Manager, "bob", "")
            .unwrap();
        assert_eq!(chain.active_gate().unwrap().level, ApprovalLevel::Admin);

        chain
            .approve(DocumentType::Requisition, ApprovalLevel::Admin, "carol", "")
            .unwrap();
        assert!(chain.active_gate().is_none());
        assert_eq!(chain.last_approved_level(), Some(ApprovalLevel::Admin));
    }

    #[test]
    fn po_terminates_at_finance() {
        let mut chain = ApprovalChain::new();
        chain.submit("alice").unwrap();
        chain
            .approve(DocumentType::Order, ApprovalLevel::Manager, "bob", "")
            .unwrap();
        assert_eq!(chain.active_gate().unwrap().level, ApprovalLevel::Finance);

        chain
            .approve(DocumentType::Order, ApprovalLevel::Finance, "dave", "ok")
            .unwrap();
        assert!(chain.active_gate().is_none());
    }

    #[test]
    fn wrong_level_leaves_chain_untouched() {
        let mut chain = ApprovalChain::new();
        chain.submit("alice").unwrap();
        let before = chain.clone();

        let err = chain
            .approve(DocumentType::Requisition, ApprovalLevel::Admin, "carol", "")
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::WrongLevel {
                expected: Some(ApprovalLevel::Manager),
                got: ApprovalLevel::Admin,
            }
        ));
        assert_eq!(chain, before);
    }

    #[test]
    fn reject_is_terminal() {
        let mut chain = ApprovalChain::new();
        chain.submit("alice").unwrap();
        chain
            .reject(ApprovalLevel::Manager, "bob", "over budget")
            .unwrap();

        assert!(chain.is_rejected());
        assert!(chain.active_gate().is_none());
        assert_eq!(chain.steps().len(), 2);
    }

    #[test]
    fn single_active_gate_throughout() {
        let mut chain = ApprovalChain::new();
        chain.submit("alice").unwrap();
        for level in [ApprovalLevel::Manager, ApprovalLevel::Admin] {
            let pending = chain
                .steps()
                .iter()
                .filter(|s| s.status == StepStatus::Pending)
                .count();
            assert_eq!(pending, 1);
            chain
                .approve(DocumentType::Requisition, level, "x", "")
                .unwrap();
        }
    }
}
