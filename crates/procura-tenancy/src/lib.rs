//! Tenancy: identity resolution and company-scoped persistence
//!
//! All procurement data is scoped by COMPANY, derived from the user's
//! email domain or an explicit tenant record, so that:
//!
//! - users within the SAME company share data (PRs, POs, vendors, ...);
//! - different companies are completely isolated from each other;
//! - no cross-company data leakage is possible at the storage layer.
//!
//! Two pieces:
//!
//! - [`resolve`] turns a raw auth record ([`StoredSession`], reached
//!   through a [`SessionProvider`]) into a [`Session`]. Absence of a
//!   session is a normal state and resolves to the isolated `guest`
//!   tenant; nothing here ever fails.
//! - [`TenantStore`] wraps any [`KeyValueStore`] so every key is silently
//!   rewritten to `"{base}::{tenant_id}"`. Backend failures are swallowed
//!   (logged, best-effort): callers must not assume durability.

#![deny(unsafe_code)]

mod identity;
mod store;

pub use identity::*;
pub use store::*;
