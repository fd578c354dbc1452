//! Aggregate counters over the procurement collections

use procura_types::{Document, DocumentStatus};
use serde::{Deserialize, Serialize};

/// Dashboard counters, recomputed on every read.
///
/// `total_spend` sums approved and completed orders only; drafts and
/// pending documents carry no committed spend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcurementStats {
    pub total_prs: usize,
    pub pending_prs: usize,
    pub approved_prs: usize,
    pub rejected_prs: usize,
    pub draft_prs: usize,
    pub total_pos: usize,
    pub pending_pos: usize,
    pub approved_pos: usize,
    pub total_spend: f64,
}

impl ProcurementStats {
    pub fn compute(requisitions: &[Document], orders: &[Document]) -> Self {
        let committed = |d: &&Document| {
            matches!(
                d.status(),
                DocumentStatus::Approved | DocumentStatus::Completed
            )
        };
        Self {
            total_prs: requisitions.len(),
            pending_prs: requisitions
                .iter()
                .filter(|d| d.status().is_pending())
                .count(),
            approved_prs: requisitions
                .iter()
                .filter(|d| d.status() == DocumentStatus::Approved)
                .count(),
            rejected_prs: requisitions
                .iter()
                .filter(|d| d.status() == DocumentStatus::Rejected)
                .count(),
            draft_prs: requisitions
                .iter()
                .filter(|d| d.status() == DocumentStatus::Draft)
                .count(),
            total_pos: orders.len(),
            pending_pos: orders.iter().filter(|d| d.status().is_pending()).count(),
            approved_pos: orders.iter().filter(committed).count(),
            total_spend: orders
                .iter()
                .filter(committed)
                .map(|d| d.total_amount)
                .sum(),
        }
    }
}
