//! Input payload for creating a PR or PO

use procura_types::LineItem;
use serde::{Deserialize, Serialize};

/// The caller-supplied half of a new document; the ledger fills in id,
/// ownership stamps, timestamps and the approval chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub title: String,
    pub description: String,
    pub requester: String,
    pub department: String,
    pub category: String,
    pub priority: String,
    pub currency: String,
    pub items: Vec<LineItem>,
    pub total_amount: f64,
    pub vendor_id: Option<String>,
    pub vendor_name: Option<String>,
}

impl DocumentDraft {
    pub fn new(title: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            requester: requester.into(),
            priority: "normal".into(),
            currency: "EUR".into(),
            ..Default::default()
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_amount(mut self, total_amount: f64) -> Self {
        self.total_amount = total_amount;
        self
    }

    pub fn with_vendor(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.vendor_id = Some(id.into());
        self.vendor_name = Some(name.into());
        self
    }

    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.total_amount = items
            .iter()
            .map(|i| f64::from(i.quantity) * i.unit_price)
            .sum();
        self.items = items;
        self
    }
}
