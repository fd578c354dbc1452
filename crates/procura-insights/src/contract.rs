//! Contract lifecycle alerts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    PendingApproval,
    Active,
    ExpiringSoon,
    Expired,
    Terminated,
    Renewed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    Completed,
}

/// A dated obligation inside a contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub date: NaiveDate,
    pub status: MilestoneStatus,
}

/// The slice of a contract the alert derivation needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub title: String,
    pub status: ContractStatus,
    pub end_date: NaiveDate,
    /// Deadline for the renew-or-let-expire decision
    pub renewal_date: Option<NaiveDate>,
    pub milestones: Vec<Milestone>,
}

/// Alert tiers, ordered most severe first so a plain sort surfaces the
/// urgent ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Expired,
    Expiring,
    ExpiringSoon,
    RenewalOverdue,
    RenewalUpcoming,
    Milestone,
}

/// One alert row, referencing the contract it was derived from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractAlert {
    pub contract_id: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub date: NaiveDate,
}

/// Derive all alerts for a set of contracts against an explicit "now",
/// sorted most severe first.
///
/// Tiers: already expired -> critical; ending within 30 days -> high;
/// within 90 days -> medium. A renewal decision overdue while the
/// contract still runs -> high; due within 30 days -> medium. Pending
/// milestones between 7 days past and 14 days ahead -> high when missed,
/// low when upcoming. Terminated contracts are skipped.
pub fn contract_alerts(contracts: &[Contract], now: NaiveDate) -> Vec<ContractAlert> {
    let mut alerts = Vec::new();
    for contract in contracts {
        if contract.status == ContractStatus::Terminated {
            continue;
        }
        let days_to_end = (contract.end_date - now).num_days();

        if days_to_end < 0 {
            alerts.push(ContractAlert {
                contract_id: contract.id.clone(),
                kind: AlertKind::Expired,
                severity: AlertSeverity::Critical,
                message: format!("{} expired {} days ago", contract.title, -days_to_end),
                date: contract.end_date,
            });
        } else if days_to_end <= 30 {
            alerts.push(ContractAlert {
                contract_id: contract.id.clone(),
                kind: AlertKind::Expiring,
                severity: AlertSeverity::High,
                message: format!("{} expires in {} days", contract.title, days_to_end),
                date: contract.end_date,
            });
        } else if days_to_end <= 90 {
            alerts.push(ContractAlert {
                contract_id: contract.id.clone(),
                kind: AlertKind::ExpiringSoon,
                severity: AlertSeverity::Medium,
                message: format!("{} expires in {} days", contract.title, days_to_end),
                date: contract.end_date,
            });
        }

        if let Some(renewal) = contract.renewal_date {
            let days_to_renewal = (renewal - now).num_days();
            if days_to_renewal <= 0 && days_to_end > 0 {
                alerts.push(ContractAlert {
                    contract_id: contract.id.clone(),
                    kind: AlertKind::RenewalOverdue,
                    severity: AlertSeverity::High,
                    message: format!("Renewal decision overdue for {}", contract.title),
                    date: renewal,
                });
            } else if days_to_renewal > 0 && days_to_renewal <= 30 {
                alerts.push(ContractAlert {
                    contract_id: contract.id.clone(),
                    kind: AlertKind::RenewalUpcoming,
                    severity: AlertSeverity::Medium,
                    message: format!(
                        "Renewal decision due in {} days for {}",
                        days_to_renewal, contract.title
                    ),
                    date: renewal,
                });
            }
        }

        for milestone in &contract.milestones {
            if milestone.status != MilestoneStatus::Pending {
                continue;
            }
            let days_to_milestone = (milestone.date - now).num_days();
            if (-7..=14).contains(&days_to_milestone) {
                let (severity, message) = if days_to_milestone < 0 {
                    (
                        AlertSeverity::High,
                        format!(
                            "{} for {} was {} days ago",
                            milestone.title, contract.title, -days_to_milestone
                        ),
                    )
                } else {
                    (
                        AlertSeverity::Low,
                        format!(
                            "{} for {} in {} days",
                            milestone.title, contract.title, days_to_milestone
                        ),
                    )
                };
                alerts.push(ContractAlert {
                    contract_id: contract.id.clone(),
                    kind: AlertKind::Milestone,
                    severity,
                    message,
                    date: milestone.date,
                });
            }
        }
    }
    alerts.sort_by_key(|a| a.severity);
    alerts
}
