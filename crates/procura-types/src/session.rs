//! Resolved identity: who is acting, for which company

use crate::Role;
use serde::{Deserialize, Serialize};

/// The resolved identity of the current actor.
///
/// Derived once per ambient session read and then passed explicitly into
/// every capability check, filter and workflow operation. The core never
/// mutates a session; it only consumes one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Per-user identifier within the company (lowercased email)
    pub user_id: String,
    /// Role within the company hierarchy
    pub role: Role,
    /// Company-level tenant identifier (all storage keys are scoped by it)
    pub tenant_id: String,
    /// Human-readable company name
    pub company_name: String,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        role: Role,
        tenant_id: impl Into<String>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            tenant_id: tenant_id.into(),
            company_name: company_name.into(),
        }
    }

    /// The anonymous session used when nobody is logged in.
    ///
    /// `guest` is itself a valid, isolated tenant; absence of a session is
    /// a normal, representable state, not an error.
    pub fn guest() -> Self {
        Self {
            user_id: "unknown".into(),
            role: Role::Guest,
            tenant_id: "guest".into(),
            company_name: "Unknown".into(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::guest()
    }
}
