//! Company-scoped visibility filtering

use crate::matches_user;
use procura_types::{Document, Role, Session};

/// Ownership metadata a record exposes so it can be visibility-filtered.
///
/// Only `created_by` is mandatory; the rest default to absent and only
/// participate when a record actually carries them.
pub trait ScopedRecord {
    /// Creator identifier (email or display name)
    fn created_by(&self) -> Option<&str>;

    fn assigned_to(&self) -> Option<&str> {
        None
    }

    fn owner(&self) -> Option<&str> {
        None
    }

    fn department(&self) -> Option<&str> {
        None
    }

    /// Company id, for datasets that are NOT already tenant-partitioned
    /// at the storage layer
    fn company_id(&self) -> Option<&str> {
        None
    }
}

/// PR/PO documents are tenant-partitioned at the storage layer, so they
/// expose no company id; the requester doubles as an assignee for
/// visibility purposes.
impl ScopedRecord for Document {
    fn created_by(&self) -> Option<&str> {
        Some(&self.created_by)
    }

    fn assigned_to(&self) -> Option<&str> {
        Some(&self.requester)
    }

    fn department(&self) -> Option<&str> {
        Some(&self.department)
    }
}

/// Knobs for [`filter_by_company_role`], mirroring which ownership fields
/// a dataset actually carries.
#[derive(Clone, Debug, Default)]
pub struct FilterOptions {
    /// The current user's department, enabling the manager department
    /// pairing
    pub user_department: Option<String>,
    /// Narrow to the session's company via [`ScopedRecord::company_id`]
    /// (only for globally stored datasets)
    pub company_scoped: bool,
    /// Restrict `User`/`Guest` roles to records they created, own, or are
    /// assigned to. When off, those roles see the company-narrowed set.
    pub creator_scoped: bool,
}

impl FilterOptions {
    /// The common case: tenant-partitioned data, creator-restricted users.
    pub fn creator_only() -> Self {
        Self {
            creator_scoped: true,
            ..Default::default()
        }
    }
}

/// Return the subset of `records` visible to the session's role.
///
/// 1. `Superadmin` and `AuditorExternal` see everything, across
///    companies.
/// 2. With `company_scoped`, narrow to records of the session's company.
/// 3. `Admin` and `AuditorInternal` see the full company set.
/// 4. `Manager` sees own records plus their department's (when a
///    department pairing is supplied), otherwise the full company set.
/// 5. Everyone else sees only records they created, own, or are assigned
///    to.
pub fn filter_by_company_role<T: ScopedRecord + Clone>(
    session: &Session,
    records: &[T],
    opts: &FilterOptions,
) -> Vec<T> {
    if records.is_empty() {
        return Vec::new();
    }
    if session.role.is_cross_tenant() {
        return records.to_vec();
    }

    let company_filtered: Vec<T> = if opts.company_scoped {
        records
            .iter()
            .filter(|r| {
                r.company_id()
                    .is_some_and(|c| c.eq_ignore_ascii_case(&session.tenant_id))
            })
            .cloned()
            .collect()
    } else {
        records.to_vec()
    };

    match session.role {
        Role::Admin | Role::AuditorInternal => company_filtered,
        Role::Manager => {
            if let Some(dept) = &opts.user_department {
                company_filtered
                    .into_iter()
                    .filter(|r| is_own_record(r, session) || r.department() == Some(dept.as_str()))
                    .collect()
            } else {
                company_filtered
            }
        }
        _ => {
            if opts.creator_scoped {
                company_filtered
                    .into_iter()
                    .filter(|r| is_own_record(r, session))
                    .collect()
            } else {
                company_filtered
            }
        }
    }
}

fn is_own_record<T: ScopedRecord>(record: &T, session: &Session) -> bool {
    let user = &session.user_id;
    record
        .created_by()
        .is_some_and(|v| matches_user(v, user))
        || record.assigned_to().is_some_and(|v| matches_user(v, user))
        || record.owner().is_some_and(|v| matches_user(v, user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Rec {
        creator: &'static str,
        assigned: Option<&'static str>,
        dept: &'static str,
        company: &'static str,
    }

    impl ScopedRecord for Rec {
        fn created_by(&self) -> Option<&str> {
            Some(self.creator)
        }
        fn assigned_to(&self) -> Option<&str> {
            self.assigned
        }
        fn department(&self) -> Option<&str> {
            Some(self.dept)
        }
        fn company_id(&self) -> Option<&str> {
            Some(self.company)
        }
    }

    fn dataset() -> Vec<Rec> {
        vec![
            Rec { creator: "alice@acme.com", assigned: None, dept: "IT", company: "acme.com" },
            Rec { creator: "bob@acme.com", assigned: Some("alice@acme.com"), dept: "Sales", company: "acme.com" },
            Rec { creator: "carol@acme.com", assigned: None, dept: "Sales", company: "acme.com" },
            Rec { creator: "zed@other.com", assigned: None, dept: "IT", company: "other.com" },
        ]
    }

    fn session(user: &str, role: Role) -> Session {
        Session::new(user, role, "acme.com", "Acme")
    }

    fn opts_company() -> FilterOptions {
        FilterOptions {
            company_scoped: true,
            creator_scoped: true,
            ..Default::default()
        }
    }

    #[test]
    fn superadmin_and_external_auditor_see_everything() {
        for role in [Role::Superadmin, Role::AuditorExternal] {
            let out = filter_by_company_role(&session("x@x.com", role), &dataset(), &opts_company());
            assert_eq!(out.len(), 4);
        }
    }

    #[test]
    fn admin_and_internal_auditor_see_whole_company() {
        for role in [Role::Admin, Role::AuditorInternal] {
            let out = filter_by_company_role(&session("x@acme.com", role), &dataset(), &opts_company());
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|r| r.company == "acme.com"));
        }
    }

    #[test]
    fn manager_sees_department_plus_own() {
        let mut opts = opts_company();
        opts.user_department = Some("Sales".into());
        let out = filter_by_company_role(
            &session("alice@acme.com", Role::Manager),
            &dataset(),
            &opts,
        );
        // Own (alice's IT record) + both Sales records
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn manager_without_department_pairing_sees_company() {
        let out = filter_by_company_role(
            &session("alice@acme.com", Role::Manager),
            &dataset(),
            &opts_company(),
        );
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn user_sees_created_and_assigned_only() {
        let out = filter_by_company_role(
            &session("alice@acme.com", Role::User),
            &dataset(),
            &opts_company(),
        );
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|r| r.creator == "alice@acme.com"));
        assert!(out.iter().any(|r| r.assigned == Some("alice@acme.com")));
    }

    #[test]
    fn user_without_creator_scoping_sees_company_set() {
        let mut opts = opts_company();
        opts.creator_scoped = false;
        let out = filter_by_company_role(
            &session("alice@acme.com", Role::User),
            &dataset(),
            &opts,
        );
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let out: Vec<Rec> = filter_by_company_role(
            &session("x@x.com", Role::Superadmin),
            &[],
            &FilterOptions::default(),
        );
        assert!(out.is_empty());
    }
}
