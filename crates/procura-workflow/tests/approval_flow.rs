//! End-to-end workflow scenarios across tenants and roles

use chrono::{Datelike, Utc};
use procura_tenancy::MemoryStore;
use procura_types::{ApprovalLevel, DocumentStatus, Role, Session, StepStatus};
use procura_workflow::{DocumentDraft, ProcurementLedger};
use std::rc::Rc;

fn session(user: &str, role: Role, tenant: &str) -> Session {
    Session::new(user, role, tenant, tenant)
}

#[test]
fn manager_then_admin_then_conversion() {
    let backing = Rc::new(MemoryStore::new());
    let year = Utc::now().year();

    let mut as_alice = ProcurementLedger::open(
        session("alice@acme.com", Role::User, "acme.com"),
        Rc::clone(&backing),
    );
    let pr_id = as_alice
        .create_pr(DocumentDraft::new("Laptops", "alice@acme.com").with_amount(13100.0))
        .unwrap();
    assert_eq!(pr_id.as_str(), format!("PR-{year}-0005"));
    as_alice.submit_pr(&pr_id, "alice@acme.com").unwrap();

    let mut as_bob = ProcurementLedger::open(
        session("bob@acme.com", Role::Manager, "acme.com"),
        Rc::clone(&backing),
    );
    as_bob
        .approve_pr(&pr_id, ApprovalLevel::Manager, "Bob", "")
        .unwrap();
    assert_eq!(as_bob.pr(&pr_id).unwrap().status(), DocumentStatus::PendingAdmin);

    let mut as_carol = ProcurementLedger::open(
        session("carol@acme.com", Role::Admin, "acme.com"),
        Rc::clone(&backing),
    );
    as_carol
        .approve_pr(&pr_id, ApprovalLevel::Admin, "Carol", "")
        .unwrap();
    assert_eq!(as_carol.pr(&pr_id).unwrap().status(), DocumentStatus::Approved);

    let po_id = as_carol.convert_pr_to_po(&pr_id).unwrap().unwrap();
    assert_eq!(po_id.as_str(), format!("PO-{year}-0004"));
    assert_eq!(
        as_carol.pr(&pr_id).unwrap().linked_document_id.as_ref(),
        Some(&po_id)
    );

    // All steps before the (new PO's) active gate are approved
    let po = as_carol.po(&po_id).unwrap();
    let gate_index = po
        .approval_chain
        .steps()
        .iter()
        .position(|s| s.status == StepStatus::Pending)
        .unwrap();
    assert!(po.approval_chain.steps()[..gate_index]
        .iter()
        .all(|s| s.status == StepStatus::Approved));
}

#[test]
fn tenants_with_same_titles_stay_isolated() {
    let backing = Rc::new(MemoryStore::new());

    let mut acme = ProcurementLedger::open(
        session("alice@acme.com", Role::User, "acme.com"),
        Rc::clone(&backing),
    );
    acme.create_pr(DocumentDraft::new("Office chairs", "alice@acme.com"))
        .unwrap();

    let mut other = ProcurementLedger::open(
        session("zed@other.com", Role::User, "other.com"),
        Rc::clone(&backing),
    );
    other
        .create_pr(DocumentDraft::new("Office chairs", "zed@other.com"))
        .unwrap();

    // A user session under acme.com lists exactly one PR, its own
    let acme_view = ProcurementLedger::open(
        session("alice@acme.com", Role::User, "acme.com"),
        Rc::clone(&backing),
    );
    assert_eq!(acme_view.all_prs().len(), 1);
    let visible = acme_view.safe_prs();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].created_by, "alice@acme.com");
}

#[test]
fn last_write_wins_between_two_open_ledgers() {
    // Two "tabs" of the same tenant race on the same document; there is
    // no conflict detection and the later persist wins.
    let backing = Rc::new(MemoryStore::new());
    let admin = session("carol@acme.com", Role::Admin, "acme.com");

    let mut first = ProcurementLedger::open(admin.clone(), Rc::clone(&backing));
    let id = first
        .create_pr(DocumentDraft::new("Laptops", "alice@acme.com"))
        .unwrap();
    first.submit_pr(&id, "alice@acme.com").unwrap();

    let mut second = ProcurementLedger::open(admin.clone(), Rc::clone(&backing));

    first
        .approve_pr(&id, ApprovalLevel::Manager, "Carol", "tab one")
        .unwrap();
    second
        .reject_pr(&id, ApprovalLevel::Manager, "Carol", "tab two")
        .unwrap();

    let reread = ProcurementLedger::open(admin, Rc::clone(&backing));
    assert_eq!(reread.pr(&id).unwrap().status(), DocumentStatus::Rejected);
}

#[test]
fn audit_trail_records_each_transition() {
    let log = Rc::new(procura_audit::MemoryAuditLog::new());
    let mut ledger = ProcurementLedger::open(
        session("carol@acme.com", Role::Admin, "acme.com"),
        MemoryStore::new(),
    )
    .with_sink(Rc::clone(&log));

    let id = ledger
        .create_pr(DocumentDraft::new("Laptops", "alice@acme.com"))
        .unwrap();
    ledger.submit_pr(&id, "alice@acme.com").unwrap();
    ledger
        .approve_pr(&id, ApprovalLevel::Manager, "Carol", "")
        .unwrap();

    let trail = log.by_entity(id.as_str());
    let actions: Vec<&str> = trail.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, ["approve_pr", "submit_pr", "create_pr"]);
    assert!(trail.iter().all(|e| e.user == "carol@acme.com"));
    assert!(trail.iter().all(|e| e.module == "procurement"));
}

#[test]
fn stats_track_committed_spend() {
    let mut ledger = ProcurementLedger::open(
        session("carol@acme.com", Role::Admin, "acme.com"),
        MemoryStore::new(),
    );

    let po = ledger
        .create_po(DocumentDraft::new("Servers", "alice@acme.com").with_amount(9000.0))
        .unwrap();
    assert_eq!(ledger.stats().total_spend, 0.0);

    ledger
        .approve_po(&po, ApprovalLevel::Manager, "Carol", "")
        .unwrap();
    ledger
        .approve_po(&po, ApprovalLevel::Finance, "Carol", "")
        .unwrap();

    let stats = ledger.stats();
    assert_eq!(stats.total_pos, 1);
    assert_eq!(stats.approved_pos, 1);
    assert_eq!(stats.total_spend, 9000.0);
}
