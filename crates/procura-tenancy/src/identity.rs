//! Identity resolver: from raw auth record to a resolved [`Session`]

use procura_types::{Role, Session};
use serde::{Deserialize, Serialize};

/// The tenant half of a stored auth record, as the backend provides it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// The user half of a stored auth record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: Option<String>,
    pub company_name: Option<String>,
}

/// The raw ambient session record, before resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub tenant: Option<TenantRecord>,
    pub user: Option<UserRecord>,
    pub role: Option<Role>,
}

/// Source of the ambient session record.
///
/// The core never reads global state directly; callers hand it a provider
/// and get back an explicit [`Session`] value.
pub trait SessionProvider {
    fn session(&self) -> Option<StoredSession>;
}

/// A fixed session source, for tests and single-shot resolution.
#[derive(Clone, Debug, Default)]
pub struct StaticSession(pub Option<StoredSession>);

impl SessionProvider for StaticSession {
    fn session(&self) -> Option<StoredSession> {
        self.0.clone()
    }
}

/// Resolve the current identity. Never fails: a missing session yields the
/// anonymous `guest` session.
pub fn resolve(provider: &dyn SessionProvider) -> Session {
    let Some(stored) = provider.session() else {
        return Session::guest();
    };
    Session {
        user_id: derive_user_id(&stored),
        role: stored.role.unwrap_or_default(),
        tenant_id: derive_tenant_id(&stored),
        company_name: derive_company_name(&stored),
    }
}

/// Derive a stable, key-safe COMPANY-level tenant identifier.
///
/// All users within the same company get the same tenant id, ensuring
/// shared data while preventing cross-company leakage. Priority order:
///
/// 1. explicit tenant/company id from the backend
/// 2. tenant slug
/// 3. email domain (`john@acme.com` -> `acme.com`)
/// 4. company name from the user profile (non-email logins)
/// 5. `"guest"`
pub fn derive_tenant_id(stored: &StoredSession) -> String {
    if let Some(tenant) = &stored.tenant {
        if let Some(id) = non_empty(tenant.id.as_deref()) {
            return sanitize_tenant(id);
        }
        if let Some(slug) = non_empty(tenant.slug.as_deref()) {
            return sanitize_tenant(slug);
        }
    }
    if let Some(user) = &stored.user {
        if let Some(email) = non_empty(user.email.as_deref()) {
            if let Some(domain) = email.split('@').nth(1) {
                if !domain.is_empty() {
                    return sanitize_tenant(domain);
                }
            }
        }
        if let Some(name) = non_empty(user.company_name.as_deref()) {
            return sanitize_tenant(name);
        }
    }
    "guest".into()
}

/// Derive the per-user identifier within a company (lowercased email).
/// Used to track individual actions within shared company data.
pub fn derive_user_id(stored: &StoredSession) -> String {
    stored
        .user
        .as_ref()
        .and_then(|u| non_empty(u.email.as_deref()))
        .map(sanitize_user)
        .unwrap_or_else(|| "unknown".into())
}

fn derive_company_name(stored: &StoredSession) -> String {
    if let Some(name) = stored
        .tenant
        .as_ref()
        .and_then(|t| non_empty(t.name.as_deref()))
    {
        return name.to_owned();
    }
    if let Some(name) = stored
        .user
        .as_ref()
        .and_then(|u| non_empty(u.company_name.as_deref()))
    {
        return name.to_owned();
    }
    "Unknown".into()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn sanitize_tenant(raw: &str) -> String {
    keep_chars(raw, |c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
    })
}

fn sanitize_user(raw: &str) -> String {
    keep_chars(raw, |c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '@' | '.' | '_' | '-')
    })
}

fn keep_chars(raw: &str, keep: impl Fn(char) -> bool) -> String {
    raw.to_lowercase().chars().filter(|c| keep(*c)).collect()
}
