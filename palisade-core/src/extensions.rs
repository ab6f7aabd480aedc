//! Per-request context store.
//!
//! Middleware attaches typed values to a request so that handlers further
//! down the chain can retrieve them without knowing who inserted them. Each
//! type has at most one slot; inserting again replaces the previous value.
//!
//! # Example
//!
//! ```rust
//! use palisade_core::Extensions;
//!
//! struct RequestUser(String);
//!
//! let mut ext = Extensions::new();
//! ext.insert(RequestUser("alice".to_string()));
//!
//! assert_eq!(ext.get::<RequestUser>().map(|u| u.0.as_str()), Some("alice"));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-keyed extensions container.
///
/// Values are stored behind an `Arc`, so cloning a request (and its
/// extensions) shares the attached values instead of copying them.
#[derive(Clone, Default)]
pub struct Extensions {
    map: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Extensions {
    /// Create a new empty extensions container.
    #[inline]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a typed value, replacing any existing value of the same type.
    #[inline]
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.insert_arc(Arc::new(value));
    }

    /// Insert an Arc-wrapped value directly.
    #[inline]
    pub fn insert_arc<T: Send + Sync + 'static>(&mut self, value: Arc<T>) {
        let arc = value as Arc<dyn Any + Send + Sync>;
        self.map.insert(TypeId::of::<T>(), arc);
    }

    /// Get a reference to a typed value.
    #[inline]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|arc| arc.downcast_ref::<T>())
    }

    /// Get a shared handle to a typed value.
    ///
    /// Useful when the value has to outlive the borrow of the request,
    /// e.g. across an `.await`.
    #[inline]
    pub fn get_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|arc| arc.clone().downcast::<T>().ok())
    }

    /// Check if a value of this type exists.
    #[inline]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Remove a typed value. Returns true if the value existed.
    #[inline]
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> bool {
        self.map.remove(&TypeId::of::<T>()).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("count", &self.map.len())
            .finish()
    }
}
