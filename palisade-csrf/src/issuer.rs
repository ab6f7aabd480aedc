use crate::SALT_KEY;
use crate::error::{CsrfError, Result};
use crate::token::{TokenDigest, generate_salt};
use palisade_core::HttpRequest;
use palisade_session::SessionHandle;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Issues the CSRF token for one request.
///
/// The gate attaches an issuer to every request it sees. The first call to
/// [`get_token`](Self::get_token) mints a salt, stores it in the session and
/// returns the derived token; later calls on the same issuer return that
/// token without touching the session again.
///
/// ```rust
/// use palisade_csrf::{TokenDigest, TokenIssuer, tokenize};
/// use palisade_session::{MemorySession, SessionHandle};
///
/// # tokio_test::block_on(async {
/// let session = MemorySession::new();
/// let issuer = TokenIssuer::new("s3cr3t", TokenDigest::Sha1, SessionHandle::new(session.clone()));
///
/// let token = issuer.get_token().await.unwrap();
/// let salt = session.value("_csrf_salt").unwrap();
/// assert_eq!(token, tokenize("s3cr3t", &salt));
/// # });
/// ```
pub struct TokenIssuer {
    secret: Arc<str>,
    digest: TokenDigest,
    session: SessionHandle,
    token: OnceCell<String>,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<Arc<str>>, digest: TokenDigest, session: SessionHandle) -> Self {
        Self {
            secret: secret.into(),
            digest,
            session,
            token: OnceCell::new(),
        }
    }

    /// The issuer the gate attached to `req`.
    pub fn from_request(req: &HttpRequest) -> Result<Arc<TokenIssuer>> {
        req.extensions
            .get_arc::<TokenIssuer>()
            .ok_or(CsrfError::NotInstalled)
    }

    /// Return this request's token, minting and persisting a salt on first use.
    ///
    /// A session failure leaves nothing cached, so the next call tries again.
    pub async fn get_token(&self) -> Result<String> {
        self.token
            .get_or_try_init(|| self.issue())
            .await
            .cloned()
    }

    /// The token if one was already issued through this issuer.
    pub fn cached_token(&self) -> Option<&str> {
        self.token.get().map(String::as_str)
    }

    async fn issue(&self) -> Result<String> {
        let salt = generate_salt();
        let token = self.digest.tokenize(&self.secret, &salt);

        self.session.set(SALT_KEY, salt).await?;
        self.session.save().await?;

        debug!(digest = self.digest.as_str(), "Issued CSRF token");
        Ok(token)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("digest", &self.digest)
            .field("issued", &self.token.initialized())
            .finish_non_exhaustive()
    }
}
