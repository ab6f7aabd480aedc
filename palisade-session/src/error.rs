//! Error types for session operations.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session was attached to the request.
    #[error("No session attached to the request; install a session middleware first")]
    NotConfigured,

    /// The backing store failed
    #[error("Session backend error: {0}")]
    Backend(String),
}
