//! Session-bound CSRF protection for Palisade.
//!
//! Synchronizer-token scheme: a random salt lives in the client's session
//! and the token handed to the client is `base64url(sha1(salt + "-" + secret))`.
//! State-changing requests must echo the token back. Each check consumes the
//! salt, so a token is good for exactly one state-changing request.
//!
//! ## Features
//!
//! - ✅ Lazy, per-request token issuance ([`TokenIssuer`])
//! - ✅ One-time tokens, salt consumed on every check
//! - ✅ Constant-time comparison
//! - ✅ Form field, query parameter and header token lookup
//! - ✅ Pluggable failure response and token lookup
//! - ✅ Environment-based configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use palisade_core::{HttpRequest, HttpResponse, MiddlewareChain, handler};
//! use palisade_csrf::{CsrfConfig, CsrfMiddleware, TokenIssuer};
//! use palisade_session::{MemorySession, SessionHandle, SessionMiddleware};
//!
//! # tokio_test::block_on(async {
//! let session = SessionHandle::new(MemorySession::new());
//!
//! let mut chain = MiddlewareChain::new();
//! chain.use_middleware(SessionMiddleware::fixed(session));
//! chain.use_middleware(CsrfMiddleware::new(CsrfConfig::new("change-me").unwrap()));
//!
//! // Render a form carrying the token.
//! let form = chain
//!     .respond(
//!         HttpRequest::new("GET", "/form"),
//!         handler(|req: HttpRequest| async move {
//!             let token = TokenIssuer::from_request(&req)?.get_token().await?;
//!             Ok::<_, palisade_core::Error>(HttpResponse::text(token))
//!         }),
//!     )
//!     .await;
//! let token = form.body_text();
//!
//! // Submit it.
//! let submitted = chain
//!     .respond(
//!         HttpRequest::new("POST", "/form").with_header("X-CSRF-TOKEN", token),
//!         handler(|_req| async { Ok(HttpResponse::ok()) }),
//!     )
//!     .await;
//! assert_eq!(submitted.status, 200);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod issuer;
pub mod middleware;
pub mod token;

pub use config::{
    CsrfConfig, ErrorHandler, MissingSaltPolicy, TokenGetter, default_error_handler,
    default_token_getter,
};
pub use error::{CsrfError, REASON_TOKEN_MISMATCH, Result};
pub use issuer::TokenIssuer;
pub use middleware::CsrfMiddleware;
pub use token::{SALT_LEN, TokenDigest, generate_salt, tokenize, tokens_match};

/// Session key holding the current salt.
pub const SALT_KEY: &str = "_csrf_salt";

/// Form field and query parameter carrying the token.
pub const FIELD_NAME: &str = "_csrf";

pub const HEADER_NAME: &str = "X-CSRF-TOKEN";

pub const XSRF_HEADER_NAME: &str = "X-XSRF-TOKEN";

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{CsrfConfig, MissingSaltPolicy};
    pub use crate::error::CsrfError;
    pub use crate::issuer::TokenIssuer;
    pub use crate::middleware::CsrfMiddleware;
    pub use crate::token::TokenDigest;
}
