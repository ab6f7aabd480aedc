//! In-process session.
//!
//! [`MemorySession`] keeps its data in a map behind a lock. It suits tests,
//! single-process tools and examples. Clones share state, so a test can
//! keep one clone while the request carries another.

use crate::error::{SessionError, SessionResult};
use crate::traits::Session;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct Inner {
    data: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    saves: AtomicUsize,
    fail: AtomicBool,
}

/// Session backed by a shared in-memory map.
#[derive(Clone, Default)]
pub struct MemorySession {
    inner: Arc<Inner>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session pre-populated with `pairs`.
    pub fn with_values<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let session = Self::new();
        session
            .inner
            .data
            .lock()
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        session
    }

    /// Read a value without going through the async trait.
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.data.lock().get(key).cloned()
    }

    /// Number of `set` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Number of successful `save` calls so far.
    pub fn saves(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail with [`SessionError::Backend`].
    pub fn set_failing(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> SessionResult<()> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(SessionError::Backend("memory session unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        self.check()?;
        Ok(self.inner.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> SessionResult<()> {
        self.check()?;
        self.inner.data.lock().insert(key.to_string(), value);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> SessionResult<()> {
        self.check()?;
        self.inner.data.lock().remove(key);
        Ok(())
    }

    async fn save(&self) -> SessionResult<()> {
        self.check()?;
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn take(&self, key: &str) -> SessionResult<Option<String>> {
        self.check()?;
        Ok(self.inner.data.lock().remove(key))
    }
}

impl std::fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("keys", &self.inner.data.lock().len())
            .field("writes", &self.writes())
            .field("saves", &self.saves())
            .finish()
    }
}
