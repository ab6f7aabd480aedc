//! Middleware that attaches the current client's session to each request.

use crate::handle::SessionHandle;
use async_trait::async_trait;
use palisade_core::{Error, HttpRequest, HttpResponse, Middleware, Next};
use std::sync::Arc;
use tracing::trace;

/// Resolves the session for a request, if the client has one.
pub type SessionResolver = Arc<dyn Fn(&HttpRequest) -> Option<SessionHandle> + Send + Sync>;

/// Attaches a [`SessionHandle`] to every request it sees.
///
/// Cookie handling and storage stay with the host: the resolver is where an
/// application plugs in its own lookup. Requests for which the resolver
/// returns `None` pass through without a session.
///
/// ```rust
/// use palisade_session::{MemorySession, SessionHandle, SessionMiddleware};
///
/// let session = SessionHandle::new(MemorySession::new());
/// let middleware = SessionMiddleware::fixed(session);
/// ```
pub struct SessionMiddleware {
    resolver: SessionResolver,
}

impl SessionMiddleware {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&HttpRequest) -> Option<SessionHandle> + Send + Sync + 'static,
    {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Attach the same session to every request.
    pub fn fixed(session: SessionHandle) -> Self {
        Self::new(move |_req| Some(session.clone()))
    }
}

#[async_trait]
impl Middleware for SessionMiddleware {
    async fn handle(&self, mut req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        match (self.resolver)(&req) {
            Some(session) => session.attach(&mut req),
            None => trace!(path = %req.path, "No session resolved for request"),
        }

        next(req).await
    }
}
