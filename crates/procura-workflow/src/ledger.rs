//! The tenant-scoped procurement ledger

use crate::{DocumentDraft, ProcurementStats};
use chrono::{Datelike, Utc};
use procura_audit::{AuditEntry, AuditSink, NoopSink};
use procura_guard::{can_approve, can_edit, filter_by_company_role, matches_user, FilterOptions};
use procura_tenancy::{KeyValueStore, TenantStore};
use procura_types::{
    ApprovalChain, ApprovalLevel, Document, DocumentId, DocumentStatus, DocumentType,
    InvoiceStatus, ReceivingStatus, Session, WorkflowError, WorkflowResult,
};
use tracing::info;

/// Storage base keys; the tenant store scopes them per company.
const REQUISITIONS_KEY: &str = "procurement-requisitions";
const ORDERS_KEY: &str = "procurement-orders";

const AUDIT_MODULE: &str = "procurement";

/// The company's PR and PO collections plus the operations that move
/// documents through the approval workflow.
///
/// All mutations are copy-on-write over the in-memory collections,
/// immediately followed by a synchronous best-effort persist into the
/// tenant partition. One audit entry is emitted per state transition.
pub struct ProcurementLedger<S: KeyValueStore> {
    session: Session,
    store: TenantStore<S>,
    sink: Box<dyn AuditSink>,
    requisitions: Vec<Document>,
    orders: Vec<Document>,
}

impl<S: KeyValueStore> ProcurementLedger<S> {
    /// Open the ledger for the session's tenant, loading any previously
    /// persisted collections.
    pub fn open(session: Session, backing: S) -> Self {
        let store = TenantStore::new(backing, session.tenant_id.clone());
        let requisitions = store.get_json(REQUISITIONS_KEY).unwrap_or_default();
        let orders = store.get_json(ORDERS_KEY).unwrap_or_default();
        Self {
            session,
            store,
            sink: Box::new(NoopSink),
            requisitions,
            orders,
        }
    }

    /// Attach an audit sink; entries are emitted on every transition.
    pub fn with_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── PR operations ────────────────────────────────────────────────

    /// Create a purchase requisition in `Draft` with an empty chain.
    pub fn create_pr(&mut self, draft: DocumentDraft) -> WorkflowResult<DocumentId> {
        self.require_edit()?;
        let id = self.next_id(DocumentType::Requisition);
        let doc = self.instantiate(id.clone(), DocumentType::Requisition, draft);
        self.requisitions.insert(0, doc);
        self.persist_requisitions();
        self.audit("create_pr", &id, "Created purchase requisition");
        Ok(id)
    }

    /// Submit a draft PR: the requester's sign-off plus a pending manager
    /// gate. Submitting twice fails without touching the chain.
    pub fn submit_pr(&mut self, id: &DocumentId, requester: &str) -> WorkflowResult<()> {
        self.require_edit()?;
        let doc = find_mut(&mut self.requisitions, id)?;
        doc.approval_chain.submit(requester)?;
        doc.requester = requester.to_owned();
        doc.touch();
        let status = doc.status();
        info!(document = %id, status = ?status, "Requisition submitted");
        self.persist_requisitions();
        self.audit("submit_pr", id, "Submitted requisition for approval");
        Ok(())
    }

    /// Approve the active gate of a PR. `level` must match the gate.
    pub fn approve_pr(
        &mut self,
        id: &DocumentId,
        level: ApprovalLevel,
        approver: &str,
        notes: &str,
    ) -> WorkflowResult<()> {
        self.decide(DocumentType::Requisition, id, level, approver, notes, true)
    }

    /// Reject the active gate of a PR. Terminal.
    pub fn reject_pr(
        &mut self,
        id: &DocumentId,
        level: ApprovalLevel,
        approver: &str,
        notes: &str,
    ) -> WorkflowResult<()> {
        self.decide(DocumentType::Requisition, id, level, approver, notes, false)
    }

    /// Convert an approved, unlinked PR into a new PO seeded from the
    /// PR's items, vendor and amount.
    ///
    /// One-way and one-time: the PR is stamped with the new PO's id, and
    /// any further call is a no-op returning `None`.
    pub fn convert_pr_to_po(&mut self, pr_id: &DocumentId) -> WorkflowResult<Option<DocumentId>> {
        self.require_edit()?;
        let pr = find(&self.requisitions, pr_id)?;
        if pr.status() != DocumentStatus::Approved || pr.linked_document_id.is_some() {
            return Ok(None);
        }

        let po_id = self.next_id(DocumentType::Order);
        let draft = DocumentDraft {
            title: pr.title.clone(),
            description: format!("Purchase order from approved {pr_id}."),
            requester: pr.requester.clone(),
            department: pr.department.clone(),
            category: pr.category.clone(),
            priority: pr.priority.clone(),
            currency: pr.currency.clone(),
            items: pr.items.clone(),
            total_amount: pr.total_amount,
            vendor_id: pr.vendor_id.clone(),
            vendor_name: pr.vendor_name.clone(),
        };
        let requester = pr.requester.clone();

        let mut po = self.instantiate(po_id.clone(), DocumentType::Order, draft);
        po.approval_chain
            .submit(&requester)
            .expect("fresh chain accepts submission");
        po.linked_document_id = Some(pr_id.clone());
        self.orders.insert(0, po);

        let pr = find_mut(&mut self.requisitions, pr_id)?;
        pr.linked_document_id = Some(po_id.clone());
        pr.touch();

        info!(requisition = %pr_id, order = %po_id, "Converted requisition to order");
        self.persist_requisitions();
        self.persist_orders();
        self.audit("convert_pr", pr_id, &format!("Converted to {po_id}"));
        Ok(Some(po_id))
    }

    // ── PO operations ────────────────────────────────────────────────

    /// Create a purchase order directly (no originating PR). The chain
    /// opens already submitted: requester approved, manager pending.
    pub fn create_po(&mut self, mut draft: DocumentDraft) -> WorkflowResult<DocumentId> {
        self.require_edit()?;
        let id = self.next_id(DocumentType::Order);
        if draft.requester.is_empty() {
            // The stored requester drives the self-approval ban, so it
            // must carry the resolved user, not the empty input
            draft.requester = self.session.user_id.clone();
        }
        let requester = draft.requester.clone();
        let mut doc = self.instantiate(id.clone(), DocumentType::Order, draft);
        doc.approval_chain
            .submit(&requester)
            .expect("fresh chain accepts submission");
        self.orders.insert(0, doc);
        self.persist_orders();
        self.audit("create_po", &id, "Created purchase order");
        Ok(id)
    }

    /// Approve the active gate of a PO. `level` must match the gate.
    pub fn approve_po(
        &mut self,
        id: &DocumentId,
        level: ApprovalLevel,
        approver: &str,
        notes: &str,
    ) -> WorkflowResult<()> {
        self.decide(DocumentType::Order, id, level, approver, notes, true)
    }

    /// Reject the active gate of a PO. Terminal.
    pub fn reject_po(
        &mut self,
        id: &DocumentId,
        level: ApprovalLevel,
        approver: &str,
        notes: &str,
    ) -> WorkflowResult<()> {
        self.decide(DocumentType::Order, id, level, approver, notes, false)
    }

    /// Mark an approved PO as fulfilled (the separate fulfillment
    /// trigger that moves it to `Completed`).
    pub fn complete_po(&mut self, id: &DocumentId) -> WorkflowResult<()> {
        self.require_edit()?;
        let doc = find_mut(&mut self.orders, id)?;
        if doc.status() != DocumentStatus::Approved {
            return Err(WorkflowError::NotApproved);
        }
        doc.fulfilled_at = Some(Utc::now());
        doc.invoice_status = InvoiceStatus::Paid;
        doc.touch();
        info!(document = %id, "Order completed");
        self.persist_orders();
        self.audit("complete_po", id, "Order fulfilled and paid");
        Ok(())
    }

    /// Record goods receipt on a PO.
    pub fn update_po_receiving(
        &mut self,
        id: &DocumentId,
        status: ReceivingStatus,
        received_qty: u32,
    ) -> WorkflowResult<()> {
        self.require_edit()?;
        let doc = find_mut(&mut self.orders, id)?;
        doc.receiving_status = status;
        doc.received_qty = received_qty;
        doc.touch();
        self.persist_orders();
        self.audit("update_receiving", id, "Updated goods receipt");
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pr(&self, id: &DocumentId) -> Option<&Document> {
        self.requisitions.iter().find(|d| &d.id == id)
    }

    pub fn po(&self, id: &DocumentId) -> Option<&Document> {
        self.orders.iter().find(|d| &d.id == id)
    }

    /// All requisitions, unfiltered. Callers exposing this to a role
    /// below admin must use [`safe_prs`](Self::safe_prs) instead.
    pub fn all_prs(&self) -> &[Document] {
        &self.requisitions
    }

    pub fn all_pos(&self) -> &[Document] {
        &self.orders
    }

    pub fn prs_by_status(&self, status: DocumentStatus) -> Vec<&Document> {
        self.requisitions
            .iter()
            .filter(|d| d.status() == status)
            .collect()
    }

    pub fn pos_by_status(&self, status: DocumentStatus) -> Vec<&Document> {
        self.orders.iter().filter(|d| d.status() == status).collect()
    }

    /// Documents (PRs and POs) whose active gate sits at `level`.
    pub fn pending_approvals(&self, level: ApprovalLevel) -> Vec<&Document> {
        self.requisitions
            .iter()
            .chain(self.orders.iter())
            .filter(|d| d.active_gate().is_some_and(|gate| gate.level == level))
            .collect()
    }

    /// Requisitions visible to the current session's role.
    pub fn safe_prs(&self) -> Vec<Document> {
        filter_by_company_role(&self.session, &self.requisitions, &FilterOptions::creator_only())
    }

    /// Orders visible to the current session's role.
    pub fn safe_pos(&self) -> Vec<Document> {
        filter_by_company_role(&self.session, &self.orders, &FilterOptions::creator_only())
    }

    /// Aggregate counters over everything in the tenant partition.
    pub fn stats(&self) -> ProcurementStats {
        ProcurementStats::compute(&self.requisitions, &self.orders)
    }

    /// Aggregate counters over what the current role may see.
    pub fn safe_stats(&self) -> ProcurementStats {
        ProcurementStats::compute(&self.safe_prs(), &self.safe_pos())
    }

    // ── Internal helpers ─────────────────────────────────────────────

    /// Shared approve/reject path. Authorization first, then the chain
    /// transition; any failure leaves the document untouched.
    fn decide(
        &mut self,
        document_type: DocumentType,
        id: &DocumentId,
        level: ApprovalLevel,
        approver: &str,
        notes: &str,
        approve: bool,
    ) -> WorkflowResult<()> {
        let collection = match document_type {
            DocumentType::Requisition => &self.requisitions,
            DocumentType::Order => &self.orders,
        };
        let doc = find(collection, id)?;
        self.authorize_decision(doc, level)?;

        let collection = match document_type {
            DocumentType::Requisition => &mut self.requisitions,
            DocumentType::Order => &mut self.orders,
        };
        let doc = find_mut(collection, id)?;
        if approve {
            doc.approval_chain
                .approve(document_type, level, approver, notes)?;
        } else {
            doc.approval_chain.reject(level, approver, notes)?;
        }
        doc.touch();
        let status = doc.status();
        let amount = doc.total_amount;

        let action = match (document_type, approve) {
            (DocumentType::Requisition, true) => "approve_pr",
            (DocumentType::Requisition, false) => "reject_pr",
            (DocumentType::Order, true) => "approve_po",
            (DocumentType::Order, false) => "reject_po",
        };
        info!(document = %id, level = %level, status = ?status, "Approval gate decided");

        match document_type {
            DocumentType::Requisition => self.persist_requisitions(),
            DocumentType::Order => self.persist_orders(),
        }
        self.sink.record(
            AuditEntry::new(
                self.session.user_id.clone(),
                self.session.role,
                AUDIT_MODULE,
                action,
                id.as_str(),
                format!("{level} gate decided, now {status:?}"),
            )
            .with_details(serde_json::json!({
                "level": level.as_str(),
                "amount": amount,
            })),
        );
        Ok(())
    }

    fn authorize_decision(&self, doc: &Document, level: ApprovalLevel) -> WorkflowResult<()> {
        let session = &self.session;
        if session.role.is_auditor() {
            return Err(WorkflowError::ReadOnly(session.role));
        }
        if matches_user(&doc.requester, &session.user_id) {
            return Err(WorkflowError::SelfApproval);
        }
        if !can_approve(session, level, &doc.requester) {
            return Err(WorkflowError::NotAuthorized {
                role: session.role,
                level,
            });
        }
        Ok(())
    }

    fn require_edit(&self) -> WorkflowResult<()> {
        if can_edit(self.session.role) {
            Ok(())
        } else {
            Err(WorkflowError::ReadOnly(self.session.role))
        }
    }

    /// Mint the next `{PREFIX}-{YEAR}-{seq}` identifier from the current
    /// collection length. Only unique within a single non-concurrent
    /// session; the numbering continues where the retired seed data left
    /// off (PRs at 5, POs at 4).
    fn next_id(&self, document_type: DocumentType) -> DocumentId {
        let (len, offset) = match document_type {
            DocumentType::Requisition => (self.requisitions.len(), 5),
            DocumentType::Order => (self.orders.len(), 4),
        };
        DocumentId::new(format!(
            "{}-{}-{:04}",
            document_type.prefix(),
            Utc::now().year(),
            len + offset
        ))
    }

    fn instantiate(
        &self,
        id: DocumentId,
        document_type: DocumentType,
        draft: DocumentDraft,
    ) -> Document {
        let now = Utc::now();
        Document {
            id,
            document_type,
            title: draft.title,
            description: draft.description,
            requester: draft.requester,
            department: draft.department,
            category: draft.category,
            priority: draft.priority,
            currency: draft.currency,
            items: draft.items,
            total_amount: draft.total_amount,
            vendor_id: draft.vendor_id,
            vendor_name: draft.vendor_name,
            created_by: self.session.user_id.clone(),
            created_at: now,
            updated_at: now,
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

    fn persist_requisitions(&self) {
        self.store.set_json(REQUISITIONS_KEY, &self.requisitions);
    }

    fn persist_orders(&self) {
        self.store.set_json(ORDERS_KEY, &self.orders);
    }

    fn audit(&self, action: &str, entity: &DocumentId, description: &str) {
        self.sink.record(AuditEntry::new(
            self.session.user_id.clone(),
            self.session.role,
            AUDIT_MODULE,
            action,
            entity.as_str(),
            description,
        ));
    }
}

fn find<'a>(collection: &'a [Document], id: &DocumentId) -> WorkflowResult<&'a Document> {
    collection
        .iter()
        .find(|d| &d.id == id)
        .ok_or_else(|| WorkflowError::NotFound(id.to_string()))
}

fn find_mut<'a>(
    collection: &'a mut [Document],
    id: &DocumentId,
) -> WorkflowResult<&'a mut Document> {
    collection
        .iter_mut()
        .find(|d| &d.id == id)
        .ok_or_else(|| WorkflowError::NotFound(id.to_string()))
}
