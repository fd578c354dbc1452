//! Derived analytics over procurement master data
//!
//! Two stateless derivations, recomputed on every read:
//!
//! - **Vendor evaluation class** ([`vendor`]): the A/B/C/D bucket derived
//!   from a vendor's average evaluation score, adjusted for open
//!   complaints.
//! - **Contract alerts** ([`contract`]): expiry, renewal and milestone
//!   warnings bucketed into severity tiers against an explicit "now".
//!
//! Neither carries persisted state beyond the records it summarizes.

#![deny(unsafe_code)]

mod contract;
mod vendor;

pub use contract::*;
pub use vendor::*;
