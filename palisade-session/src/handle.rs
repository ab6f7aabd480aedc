use crate::error::{SessionError, SessionResult};
use crate::traits::Session;
use palisade_core::HttpRequest;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, type-erased session attached to a request.
///
/// Cloning is cheap; all clones refer to the same session.
#[derive(Clone)]
pub struct SessionHandle(Arc<dyn Session>);

impl SessionHandle {
    pub fn new<S: Session + 'static>(session: S) -> Self {
        Self(Arc::new(session))
    }

    /// Fetch the session attached to `req`.
    ///
    /// Returns [`SessionError::NotConfigured`] when nothing attached one,
    /// which means the session middleware is missing from the chain.
    pub fn from_request(req: &HttpRequest) -> SessionResult<Self> {
        req.extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or(SessionError::NotConfigured)
    }

    /// Attach this session to `req`, replacing any previous one.
    pub fn attach(self, req: &mut HttpRequest) {
        req.extensions.insert(self);
    }
}

impl Deref for SessionHandle {
    type Target = dyn Session;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionHandle").finish_non_exhaustive()
    }
}
