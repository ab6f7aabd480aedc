//! Session capability for Palisade.
//!
//! Palisade does not store sessions and does not manage cookies. It needs a
//! small capability from whatever session system the host already runs:
//! read, write and delete string values, then flush. This crate defines that
//! capability ([`Session`]) and the plumbing that carries it through a
//! request:
//!
//! - [`SessionHandle`] - shared handle stored in the request extensions,
//!   with a typed [`SessionHandle::from_request`] accessor
//! - [`SessionMiddleware`] - attaches the session resolved for a request
//! - [`MemorySession`] - in-process implementation for tests and tools
//!
//! # Examples
//!
//! ```rust
//! use palisade_core::{HttpRequest, HttpResponse, MiddlewareChain, handler};
//! use palisade_session::*;
//!
//! # tokio_test::block_on(async {
//! let session = MemorySession::new();
//!
//! let mut chain = MiddlewareChain::new();
//! chain.use_middleware(SessionMiddleware::fixed(SessionHandle::new(session.clone())));
//!
//! let response = chain
//!     .respond(
//!         HttpRequest::new("GET", "/"),
//!         handler(|req: HttpRequest| async move {
//!             let session = SessionHandle::from_request(&req)
//!                 .map_err(|e| palisade_core::Error::Internal(e.to_string()))?;
//!             let _ = session.set("visited", "1".to_string()).await;
//!             Ok::<_, palisade_core::Error>(HttpResponse::ok())
//!         }),
//!     )
//!     .await;
//!
//! assert_eq!(response.status, 200);
//! assert_eq!(session.value("visited").as_deref(), Some("1"));
//! # });
//! ```

pub mod error;
pub mod handle;
pub mod memory;
pub mod middleware;
pub mod traits;

pub use error::{SessionError, SessionResult};
pub use handle::SessionHandle;
pub use memory::MemorySession;
pub use middleware::{SessionMiddleware, SessionResolver};
pub use traits::Session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::handle::SessionHandle;
    pub use crate::memory::MemorySession;
    pub use crate::middleware::SessionMiddleware;
    pub use crate::traits::Session;
}
