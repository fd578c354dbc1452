//! The company role hierarchy

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's role within the company hierarchy.
///
/// Declaration order *is* the rank order, so the derived `Ord` gives the
/// total order the platform enforces:
/// `Guest < User < Manager < AuditorInternal < Admin < AuditorExternal < Superadmin`.
///
/// The two auditor roles sit above the roles whose data they may read, but
/// they are read-only regardless of rank. `AuditorExternal` additionally
/// reads across tenant boundaries, matching `Superadmin`'s read scope
/// without its write rights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Not logged in; an isolated tenant of its own
    #[default]
    Guest,
    /// Regular member: sees only records they created or are assigned to
    User,
    /// Department lead: sees department data, approves manager-level gates
    Manager,
    /// Company-wide read access, no write or approval rights
    AuditorInternal,
    /// Full edit and approval rights within the company
    Admin,
    /// Cross-company read access, no write or approval rights
    AuditorExternal,
    /// Platform operator: full control across all tenants
    Superadmin,
}

impl Role {
    /// Numeric rank within the hierarchy (0..=6).
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Whether this is an auditor role (internal or external).
    pub fn is_auditor(self) -> bool {
        matches!(self, Role::AuditorInternal | Role::AuditorExternal)
    }

    /// Whether this role reads across tenant boundaries.
    ///
    /// The one deliberate breach of tenant isolation, reserved for
    /// platform-level oversight and external audit.
    pub fn is_cross_tenant(self) -> bool {
        matches!(self, Role::Superadmin | Role::AuditorExternal)
    }

    /// The canonical snake_case name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Manager => "manager",
            Role::AuditorInternal => "auditor_internal",
            Role::Admin => "admin",
            Role::AuditorExternal => "auditor_external",
            Role::Superadmin => "superadmin",
        }
    }

    /// All roles, in rank order.
    pub fn all() -> [Role; 7] {
        [
            Role::Guest,
            Role::User,
            Role::Manager,
            Role::AuditorInternal,
            Role::Admin,
            Role::AuditorExternal,
            Role::Superadmin,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
