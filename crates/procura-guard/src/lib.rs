//! Company Guard: role hierarchy enforcement and visibility filtering
//!
//! This crate answers two questions, for an explicit [`Session`]:
//!
//! 1. **May this role act?** -- [`has_min_role`], [`can_edit`],
//!    [`can_delete`], [`can_approve`] and the flattened
//!    [`CompanyContext`] bag.
//! 2. **Which records may this role see?** -- [`filter_by_company_role`]
//!    over anything implementing [`ScopedRecord`].
//!
//! All functions are pure: no ambient state, no side effects. The filter
//! is advisory (client-side); it must be applied on every read path that
//! exposes a collection to a role below admin, and it is not a substitute
//! for server-side authorization.

#![deny(unsafe_code)]

mod authority;
mod visibility;

pub use authority::*;
pub use visibility::*;
