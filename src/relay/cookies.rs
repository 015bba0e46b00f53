//! Per-host cookie relay state.

use dashmap::DashMap;
use std::sync::Arc;

use crate::observability::metrics;

/// Process-wide map of upstream host → last `Set-Cookie` value seen from it.
///
/// Cloning shares the same underlying map. Entries are never evicted; the map
/// lives as long as the server that owns it and is lost on restart.
#[derive(Clone, Debug, Default)]
pub struct CookieStore {
    inner: Arc<DashMap<String, String>>,
}

impl CookieStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie value last stored for `host`, if any.
    pub fn get(&self, host: &str) -> Option<String> {
        self.inner.get(host).map(|r| r.value().clone())
    }

    /// Store `cookie` for `host`, replacing whatever was there.
    pub fn set(&self, host: impl Into<String>, cookie: impl Into<String>) {
        self.inner.insert(host.into(), cookie.into());
        metrics::record_cookie_store_size(self.inner.len());
    }

    /// Number of hosts with a stored cookie.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
