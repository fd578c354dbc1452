//! Procurement Domain Types
//!
//! Shared vocabulary for the procurement core: the role hierarchy, the
//! approval-level ladder, PR/PO documents and their approval chains.
//!
//! # Key Concepts
//!
//! - **Role**: a strict total order (`Guest` < `User` < `Manager` <
//!   `AuditorInternal` < `Admin` < `AuditorExternal` < `Superadmin`)
//!   governing read and write scope. Auditor roles are side-branches:
//!   they outrank `Manager` for *read* scope but are always read-only.
//! - **ApprovalLevel**: the per-step ladder a document climbs
//!   (`Requester` → `Manager` → `Admin` / `Finance`).
//! - **ApprovalChain**: the ordered record of per-level decisions. At most
//!   one step is pending at any time (the active gate); every step before
//!   it is approved.
//! - **DocumentStatus**: never stored. It is always a pure projection of
//!   the approval chain, so the two cannot drift.
//!
//! # Design Principles
//!
//! 1. Every capability check takes an explicit [`Session`]; there is no
//!    ambient global identity.
//! 2. Levels, statuses and roles are closed enums. An invalid level is a
//!    compile error, not a string that silently matches nothing.

#![deny(unsafe_code)]

mod chain;
mod document;
mod errors;
mod role;
mod session;

pub use chain::*;
pub use document::*;
pub use errors::*;
pub use role::*;
pub use session::*;
