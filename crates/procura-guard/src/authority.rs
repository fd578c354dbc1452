//! Role hierarchy authority: capability answers derived from the role order

use procura_types::{ApprovalLevel, Role, Session};
use serde::{Deserialize, Serialize};

/// Whether the session's role meets or exceeds the required rank.
pub fn has_min_role(session: &Session, required: Role) -> bool {
    session.role.rank() >= required.rank()
}

/// Whether the role is an auditor (internal or external). Auditors have
/// elevated read access but cannot modify or approve data.
pub fn is_auditor(role: Role) -> bool {
    role.is_auditor()
}

/// Whether the role can EDIT records. Auditors and guests cannot; `User`
/// and above can.
pub fn can_edit(role: Role) -> bool {
    if role.is_auditor() {
        return false;
    }
    role.rank() >= Role::User.rank()
}

/// Whether the role can DELETE records. Only non-auditor roles at
/// `Manager` and above.
pub fn can_delete(role: Role) -> bool {
    if role.is_auditor() {
        return false;
    }
    role.rank() >= Role::Manager.rank()
}

/// Whether the session may approve at a given approval level.
///
/// - Auditors cannot approve anything.
/// - Nobody approves their own submission (see [`matches_user`]).
/// - Superadmin approves everything.
/// - Manager approves manager-level gates; admin approves manager, admin
///   and finance gates (an admin may fill in for an absent manager, and
///   finance-level approval is reserved to admin/superadmin).
pub fn can_approve(session: &Session, level: ApprovalLevel, submitter: &str) -> bool {
    if session.role.is_auditor() {
        return false;
    }
    if matches_user(submitter, &session.user_id) {
        return false;
    }
    if session.role == Role::Superadmin {
        return true;
    }
    match level {
        ApprovalLevel::Manager => matches!(session.role, Role::Manager | Role::Admin),
        ApprovalLevel::Admin | ApprovalLevel::Finance => session.role == Role::Admin,
        ApprovalLevel::Requester => false,
    }
}

/// Whether a record's creator/submitter identifier refers to the current
/// user.
///
/// Matched case-insensitively on the full value and on the local part
/// before any `@`, to tolerate aliasing between display names and emails.
pub fn matches_user(stored: &str, current_user_id: &str) -> bool {
    let stored = stored.trim().to_lowercase();
    let current = current_user_id.trim().to_lowercase();
    if stored.is_empty() || current.is_empty() {
        return false;
    }
    if stored == current {
        return true;
    }
    let stored_local = stored.split('@').next().unwrap_or("");
    let current_local = current.split('@').next().unwrap_or("");
    !stored_local.is_empty() && stored_local == current_local
}

/// The session's capabilities flattened into booleans, for consumers that
/// want one bag instead of individual checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyContext {
    pub user_id: String,
    pub role: Role,
    pub company_id: String,
    pub company_name: String,
    pub is_super_admin: bool,
    pub is_admin: bool,
    pub is_manager: bool,
    pub is_auditor_internal: bool,
    pub is_auditor_external: bool,
    pub is_auditor: bool,
    pub is_user: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

/// Build the flattened capability bag for a session.
pub fn company_context(session: &Session) -> CompanyContext {
    let role = session.role;
    CompanyContext {
        user_id: session.user_id.clone(),
        role,
        company_id: session.tenant_id.clone(),
        company_name: session.company_name.clone(),
        is_super_admin: role == Role::Superadmin,
        is_admin: matches!(role, Role::Admin | Role::Superadmin),
        is_manager: has_min_role(session, Role::Manager) && !role.is_auditor(),
        is_auditor_internal: role == Role::AuditorInternal,
        is_auditor_external: role == Role::AuditorExternal,
        is_auditor: role.is_auditor(),
        is_user: has_min_role(session, Role::User),
        can_edit: can_edit(role),
        can_delete: can_delete(role),
    }
}
