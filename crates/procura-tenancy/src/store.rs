//! Tenant-scoped key-value storage

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A generic persistent string key-value store.
///
/// Synchronous from the caller's perspective; there is no pending or
/// in-flight state. Implementations use interior mutability so that
/// several tenant views can share one backing store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// In-memory backing store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cells: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, across all tenants.
    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cells.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.cells
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.cells.borrow_mut().remove(key);
        Ok(())
    }
}

/// A store view that namespaces every key by tenant id.
///
/// Every read and write is silently rewritten to operate on
/// `"{base}::{tenant_id}"`, so two sessions with different tenant ids can
/// never observe or mutate the same partition.
///
/// Write failures (quota, unavailable backend) are swallowed after a
/// warning: the in-memory state stays authoritative for the rest of the
/// session, but it will not survive a reload. Callers must not assume
/// durability.
#[derive(Clone, Debug)]
pub struct TenantStore<S> {
    inner: S,
    tenant_id: String,
}

impl<S: KeyValueStore> TenantStore<S> {
    pub fn new(inner: S, tenant_id: impl Into<String>) -> Self {
        Self {
            inner,
            tenant_id: tenant_id.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// The fully scoped key a base key maps to.
    pub fn scoped_key(&self, base_key: &str) -> String {
        format!("{}::{}", base_key, self.tenant_id)
    }

    pub fn get(&self, base_key: &str) -> Option<String> {
        self.inner.get(&self.scoped_key(base_key))
    }

    pub fn set(&self, base_key: &str, value: &str) {
        if let Err(err) = self.inner.set(&self.scoped_key(base_key), value) {
            warn!(
                tenant = %self.tenant_id,
                key = %base_key,
                error = %err,
                "Tenant store write failed; continuing with in-memory state"
            );
        }
    }

    pub fn remove(&self, base_key: &str) {
        if let Err(err) = self.inner.remove(&self.scoped_key(base_key)) {
            warn!(
                tenant = %self.tenant_id,
                key = %base_key,
                error = %err,
                "Tenant store remove failed"
            );
        }
    }

    /// Read and deserialize a JSON value. Corrupt payloads are treated the
    /// same as missing ones.
    pub fn get_json<T: DeserializeOwned>(&self, base_key: &str) -> Option<T> {
        let raw = self.get(base_key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    tenant = %self.tenant_id,
                    key = %base_key,
                    error = %err,
                    "Discarding unreadable tenant store payload"
                );
                None
            }
        }
    }

    /// Serialize and write a JSON value (best-effort).
    pub fn set_json<T: Serialize>(&self, base_key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(base_key, &raw),
            Err(err) => {
                warn!(
                    tenant = %self.tenant_id,
                    key = %base_key,
                    error = %err,
                    "Tenant store serialization failed; skipping write"
                );
            }
        }
    }
}
