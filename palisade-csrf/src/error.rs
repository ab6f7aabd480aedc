use palisade_session::SessionError;
use thiserror::Error;

/// Machine-readable reason reported for every verification failure.
pub const REASON_TOKEN_MISMATCH: &str = "csrf_token_mismatch";

#[derive(Error, Debug)]
pub enum CsrfError {
    #[error("Invalid CSRF configuration: {0}")]
    Config(String),

    #[error("CSRF middleware is not installed for this request")]
    NotInstalled,

    #[error("CSRF token mismatch: no token was issued for this session")]
    MissingSalt,

    #[error("CSRF token mismatch")]
    TokenMismatch,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CsrfError {
    /// Whether this error is a rejected request rather than a fault.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, CsrfError::MissingSalt | CsrfError::TokenMismatch)
    }

    /// Reason code exposed to clients.
    pub fn reason(&self) -> &'static str {
        match self {
            CsrfError::MissingSalt | CsrfError::TokenMismatch => REASON_TOKEN_MISMATCH,
            CsrfError::Config(_) | CsrfError::NotInstalled => "csrf_misconfigured",
            CsrfError::Session(_) => "csrf_session_unavailable",
        }
    }
}

impl From<CsrfError> for palisade_core::Error {
    fn from(error: CsrfError) -> Self {
        if error.is_verification_failure() {
            palisade_core::Error::Forbidden(error.to_string())
        } else {
            palisade_core::Error::Internal(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CsrfError>;
