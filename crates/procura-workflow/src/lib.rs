//! Approval Workflow Engine
//!
//! Owns the PR/PO lifecycle: creation, submission, per-level approval and
//! rejection, and one-way PR to PO conversion, enforcing sequential,
//! non-skippable approval gates.
//!
//! # Control flow
//!
//! A UI action invokes a [`ProcurementLedger`] operation. The ledger
//! mutates the document's approval chain (its status is always a
//! projection of that chain), emits one audit entry per transition, and
//! synchronously persists the whole collection back into the
//! tenant-scoped partition. Every read that exposes a collection goes
//! through the company-scoped visibility filter.
//!
//! Execution is single-threaded and event-driven; there is no in-flight
//! state, no locking, and no cross-tab conflict detection (last write
//! wins).

#![deny(unsafe_code)]

mod draft;
mod ledger;
mod stats;

pub use draft::*;
pub use ledger::*;
pub use stats::*;
