//! Approvable documents: purchase requisitions and purchase orders

use crate::{ApprovalChain, ApprovalLevel, ApprovalStep};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two document kinds driven through the approval workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Purchase Requisition -- terminal approval level is `Admin`
    #[serde(rename = "pr")]
    Requisition,
    /// Purchase Order -- terminal approval level is `Finance`
    #[serde(rename = "po")]
    Order,
}

impl DocumentType {
    /// Identifier prefix (`PR` / `PO`).
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentType::Requisition => "PR",
            DocumentType::Order => "PO",
        }
    }

    /// The level whose approval finalizes a document of this type.
    pub fn terminal_level(self) -> ApprovalLevel {
        match self {
            DocumentType::Requisition => ApprovalLevel::Admin,
            DocumentType::Order => ApprovalLevel::Finance,
        }
    }
}

/// A document identifier of the form `{PREFIX}-{YEAR}-{zero-padded seq}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a document stands in its lifecycle.
///
/// Never stored: always computed from the approval chain (plus the
/// fulfillment timestamp for completed orders) via [`DocumentStatus::project`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    PendingManager,
    PendingAdmin,
    PendingFinance,
    Approved,
    Rejected,
    Completed,
}

impl DocumentStatus {
    /// Project a document's status from its approval chain.
    ///
    /// Deterministic: any rejected step wins, then fulfillment, then the
    /// active gate, then terminal-level approval. An empty chain is a
    /// draft.
    pub fn project(chain: &ApprovalChain, document_type: DocumentType, fulfilled: bool) -> Self {
        if chain.is_rejected() {
            return DocumentStatus::Rejected;
        }
        if chain.is_empty() {
            return DocumentStatus::Draft;
        }
        if let Some(gate) = chain.active_gate() {
            return match gate.level {
                ApprovalLevel::Manager => DocumentStatus::PendingManager,
                ApprovalLevel::Admin => DocumentStatus::PendingAdmin,
                ApprovalLevel::Finance => DocumentStatus::PendingFinance,
                // A pending requester step never exists: submission closes it
                ApprovalLevel::Requester => DocumentStatus::Draft,
            };
        }
        if chain.last_approved_level() == Some(document_type.terminal_level()) {
            if fulfilled {
                return DocumentStatus::Completed;
            }
            return DocumentStatus::Approved;
        }
        // No gate, not rejected, terminal not reached: chain was never
        // advanced past submission, treat as draft-equivalent
        DocumentStatus::Draft
    }

    pub fn is_pending(self) -> bool {
        matches!(
            self,
            DocumentStatus::PendingManager
                | DocumentStatus::PendingAdmin
                | DocumentStatus::PendingFinance
        )
    }
}

/// A single line of an order or requisition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Goods-receipt state of a purchase order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivingStatus {
    #[default]
    NotReceived,
    Partial,
    Received,
}

/// Invoice state of a purchase order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    None,
    Received,
    Paid,
}

/// A purchase requisition or purchase order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub document_type: DocumentType,
    pub title: String,
    pub description: String,
    /// Who the purchase is for (display name or email)
    pub requester: String,
    pub department: String,
    pub category: String,
    pub priority: String,
    pub currency: String,
    pub items: Vec<LineItem>,
    pub total_amount: f64,
    pub vendor_id: Option<String>,
    pub vendor_name: Option<String>,
    /// User id of the session that created the record
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approval_chain: ApprovalChain,
    /// One-way PR<->PO cross-reference, set once on conversion
    pub linked_document_id: Option<DocumentId>,
    /// Set when an approved PO is fulfilled (orders only)
    pub fulfilled_at: Option<DateTime<Utc>>,
    pub payment_terms: String,
    pub delivery_date: Option<NaiveDate>,
    pub receiving_status: ReceivingStatus,
    pub received_qty: u32,
    pub invoice_status: InvoiceStatus,
}

impl Document {
    /// The document's lifecycle status, projected from its chain.
    pub fn status(&self) -> DocumentStatus {
        DocumentStatus::project(
            &self.approval_chain,
            self.document_type,
            self.fulfilled_at.is_some(),
        )
    }

    /// The single pending approval step, if any.
    pub fn active_gate(&self) -> Option<&ApprovalStep> {
        self.approval_chain.active_gate()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StepStatus;

    fn blank_document(document_type: DocumentType) -> Document {
        Document {
            id: DocumentId::new("PR-2026-0005"),
            document_type,
            title: "Laptops".into(),
            description: String::new(),
            requester: "alice@acme.com".into(),
            department: "IT".into(),
            category: "hardware".into(),
            priority: "normal".into(),
            currency: "EUR".into(),
            items: vec![],
            total_amount: 4200.0,
            vendor_id: None,
            vendor_name: None,
            created_by: "alice@acme.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            approval_chain: ApprovalChain::new(),
            linked_document_id: None,
            fulfilled_at: None,
            payment_terms: "Net 30".into(),
            delivery_date: None,
            receiving_status: ReceivingStatus::default(),
            received_qty: 0,
            invoice_status: InvoiceStatus::default(),
        }
    }

    #[test]
    fn empty_chain_is_draft() {
        let doc = blank_document(DocumentType::Requisition);
        assert_eq!(doc.status(), DocumentStatus::Draft);
    }

    #[test]
    fn status_tracks_chain() {
        let mut doc = blank_document(DocumentType::Requisition);
        doc.approval_chain.submit("alice@acme.com").unwrap();
        assert_eq!(doc.status(), DocumentStatus::PendingManager);

        doc.approval_chain
            .approve(DocumentType::Requisition, ApprovalLevel::Manager, "bob", "")
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::PendingAdmin);

        doc.approval_chain
            .approve(DocumentType::Requisition, ApprovalLevel::Admin, "carol", "")
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Approved);
    }

    #[test]
    fn fulfilled_order_is_completed() {
        let mut doc = blank_document(DocumentType::Order);
        doc.approval_chain.submit("alice").unwrap();
        doc.approval_chain
            .approve(DocumentType::Order, ApprovalLevel::Manager, "bob", "")
            .unwrap();
        doc.approval_chain
            .approve(DocumentType::Order, ApprovalLevel::Finance, "dave", "")
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Approved);

        doc.fulfilled_at = Some(Utc::now());
        assert_eq!(doc.status(), DocumentStatus::Completed);
    }

    #[test]
    fn rejection_wins_projection() {
        let mut doc = blank_document(DocumentType::Requisition);
        doc.approval_chain.submit("alice").unwrap();
        doc.approval_chain
            .reject(ApprovalLevel::Manager, "bob", "no")
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Rejected);
        assert_eq!(
            doc.approval_chain.steps()[1].status,
            StepStatus::Rejected
        );
    }
}
