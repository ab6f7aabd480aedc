use crate::SALT_KEY;
use crate::config::{CsrfConfig, MissingSaltPolicy};
use crate::error::CsrfError;
use crate::issuer::TokenIssuer;
use crate::token::tokens_match;
use async_trait::async_trait;
use palisade_core::{Error, HttpRequest, HttpResponse, Middleware, Next};
use palisade_session::SessionHandle;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// CSRF protection middleware
///
/// Must run after the middleware that attaches the session. Every request
/// gets a [`TokenIssuer`] in its extensions; requests whose method is not
/// ignored must present the token issued for the session's current salt.
/// The salt is consumed by the check whatever its outcome.
#[derive(Clone)]
pub struct CsrfMiddleware {
    config: Arc<CsrfConfig>,
}

impl CsrfMiddleware {
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    /// Check the token presented by `req` against the session's salt.
    ///
    /// Verification failures come back as [`CsrfError::MissingSalt`] or
    /// [`CsrfError::TokenMismatch`]; anything else is a session fault.
    pub async fn verify(
        &self,
        req: &HttpRequest,
        session: &SessionHandle,
    ) -> Result<(), CsrfError> {
        let salt = session.take(SALT_KEY).await?;
        if salt.is_some() {
            session.save().await?;
        }

        let salt = match salt.filter(|salt| !salt.is_empty()) {
            Some(salt) => salt,
            None => {
                return match self.config.missing_salt {
                    MissingSaltPolicy::Forward => Ok(()),
                    MissingSaltPolicy::Reject => Err(CsrfError::MissingSalt),
                };
            }
        };

        let presented = (self.config.token_getter)(req);
        let expected = self.config.digest.tokenize(self.config.secret(), &salt);

        if tokens_match(&expected, &presented) {
            Ok(())
        } else {
            Err(CsrfError::TokenMismatch)
        }
    }
}

#[async_trait]
impl Middleware for CsrfMiddleware {
    async fn handle(&self, mut req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        let session = SessionHandle::from_request(&req).map_err(|e| {
            error!(
                method = %req.method,
                path = %req.path,
                "CSRF middleware requires a session; install a session middleware before it"
            );
            Error::from(CsrfError::from(e))
        })?;

        req.extensions.insert(TokenIssuer::new(
            self.config.shared_secret(),
            self.config.digest,
            session.clone(),
        ));

        if self.config.is_ignored(&req.method) {
            debug!(method = %req.method, path = %req.path, "CSRF check skipped");
            return next(req).await;
        }

        match self.verify(&req, &session).await {
            Ok(()) => next(req).await,
            Err(e) if e.is_verification_failure() => {
                warn!(
                    method = %req.method,
                    path = %req.path,
                    reason = e.reason(),
                    missing_salt = matches!(e, CsrfError::MissingSalt),
                    "CSRF verification failed"
                );
                (self.config.error_handler)(&req, &e)
            }
            Err(e) => {
                error!(
                    method = %req.method,
                    path = %req.path,
                    error = %e,
                    "Session failed during CSRF verification"
                );
                Err(e.into())
            }
        }
    }
}
