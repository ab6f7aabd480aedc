use crate::error::{CsrfError, Result};
use crate::token::TokenDigest;
use crate::{FIELD_NAME, HEADER_NAME, XSRF_HEADER_NAME};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use palisade_core::{Error, HttpRequest, HttpResponse};
use rand::RngCore;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Environment variable holding the secret.
pub const ENV_SECRET: &str = "PALISADE_CSRF_SECRET";
/// Comma-separated list of exempt methods.
pub const ENV_IGNORED_METHODS: &str = "PALISADE_CSRF_IGNORED_METHODS";
/// `sha1` or `sha256`.
pub const ENV_DIGEST: &str = "PALISADE_CSRF_DIGEST";
/// `reject` or `forward`.
pub const ENV_MISSING_SALT: &str = "PALISADE_CSRF_MISSING_SALT";

/// Builds the response for a request that failed verification.
pub type ErrorHandler =
    Arc<dyn Fn(&HttpRequest, &CsrfError) -> std::result::Result<HttpResponse, Error> + Send + Sync>;

/// Extracts the token presented by the client. Returns `""` when there is none.
pub type TokenGetter = Arc<dyn Fn(&HttpRequest) -> String + Send + Sync>;

/// What the gate does with a state-changing request when the session holds
/// no salt, i.e. no token was ever issued or it was already consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingSaltPolicy {
    /// Fail verification.
    #[default]
    Reject,
    /// Let the request through unverified.
    Forward,
}

impl FromStr for MissingSaltPolicy {
    type Err = CsrfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(MissingSaltPolicy::Reject),
            "forward" => Ok(MissingSaltPolicy::Forward),
            other => Err(CsrfError::Config(format!(
                "unknown missing salt policy '{other}'"
            ))),
        }
    }
}

/// Default failure response: `403` with a JSON body.
pub fn default_error_handler(
    _req: &HttpRequest,
    error: &CsrfError,
) -> std::result::Result<HttpResponse, Error> {
    HttpResponse::forbidden().with_json(&serde_json::json!({
        "error": error.reason(),
        "message": "Invalid or missing CSRF token",
    }))
}

/// Default token lookup: form field `_csrf`, query parameter `_csrf`, then
/// the `X-CSRF-TOKEN` and `X-XSRF-TOKEN` headers. The first non-empty value
/// wins.
pub fn default_token_getter(req: &HttpRequest) -> String {
    if let Some(value) = req.form_value(FIELD_NAME).filter(|v| !v.is_empty()) {
        return value;
    }

    [
        req.query(FIELD_NAME),
        req.header(HEADER_NAME),
        req.header(XSRF_HEADER_NAME),
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.is_empty())
    .map(str::to_string)
    .unwrap_or_default()
}

/// CSRF protection configuration
///
/// The secret can only be set through [`CsrfConfig::new`],
/// [`CsrfConfig::from_env`] or `Default`, all of which reject an empty one:
///
/// ```compile_fail
/// use palisade_csrf::CsrfConfig;
///
/// let mut config = CsrfConfig::default();
/// config.secret = "".into();
/// ```
#[derive(Clone)]
pub struct CsrfConfig {
    /// Secret combined with each salt; never leaves the server. Only set
    /// through the validating constructors.
    secret: Arc<str>,

    /// Upper-cased methods exempt from verification
    pub ignored_methods: HashSet<String>,

    pub error_handler: ErrorHandler,

    pub token_getter: TokenGetter,

    pub missing_salt: MissingSaltPolicy,

    pub digest: TokenDigest,
}

impl CsrfConfig {
    /// Create a configuration with default behavior around `secret`.
    ///
    /// Fails with [`CsrfError::Config`] when the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CsrfError::Config("secret must not be empty".to_string()));
        }

        Ok(Self::with_valid_secret(secret))
    }

    fn with_valid_secret(secret: String) -> Self {
        Self {
            secret: Arc::from(secret),
            ignored_methods: ["GET", "HEAD", "OPTIONS"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            error_handler: Arc::new(default_error_handler),
            token_getter: Arc::new(default_token_getter),
            missing_salt: MissingSaltPolicy::default(),
            digest: TokenDigest::default(),
        }
    }

    /// Generate a random secret (32 bytes, base64url without padding)
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Load configuration from `PALISADE_CSRF_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset and blank optional variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let secret = var(ENV_SECRET)
            .ok_or_else(|| CsrfError::Config(format!("{ENV_SECRET} is not set")))?;
        let mut config = Self::new(secret)?;

        if let Some(methods) = var(ENV_IGNORED_METHODS) {
            config = config.with_ignored_methods(
                methods
                    .split(',')
                    .map(str::trim)
                    .filter(|method| !method.is_empty()),
            );
        }

        if let Some(digest) = var(ENV_DIGEST) {
            config = config.with_digest(digest.parse()?);
        }

        if let Some(policy) = var(ENV_MISSING_SALT) {
            config = config.with_missing_salt(policy.parse()?);
        }

        Ok(config)
    }

    /// Replace the exempt methods
    pub fn with_ignored_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_methods = methods
            .into_iter()
            .map(|method| method.as_ref().to_ascii_uppercase())
            .collect();
        self
    }

    /// Set the failure response builder
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpRequest, &CsrfError) -> std::result::Result<HttpResponse, Error>
            + Send
            + Sync
            + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Set the presented-token lookup
    pub fn with_token_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&HttpRequest) -> String + Send + Sync + 'static,
    {
        self.token_getter = Arc::new(getter);
        self
    }

    pub fn with_missing_salt(mut self, policy: MissingSaltPolicy) -> Self {
        self.missing_salt = policy;
        self
    }

    pub fn with_digest(mut self, digest: TokenDigest) -> Self {
        self.digest = digest;
        self
    }

    /// The secret tokens are derived from
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub(crate) fn shared_secret(&self) -> Arc<str> {
        Arc::clone(&self.secret)
    }

    /// Whether `method` skips verification
    pub fn is_ignored(&self, method: &str) -> bool {
        self.ignored_methods.contains(&method.to_ascii_uppercase())
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self::with_valid_secret(Self::generate_secret())
    }
}

impl fmt::Debug for CsrfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.ignored_methods.iter().collect();
        methods.sort();

        f.debug_struct("CsrfConfig")
            .field("secret", &"<redacted>")
            .field("ignored_methods", &methods)
            .field("missing_salt", &self.missing_salt)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_creation() {
        let config = CsrfConfig::new("s3cr3t").unwrap();
        assert_eq!(config.secret(), "s3cr3t");
        assert!(config.is_ignored("GET"));
        assert!(config.is_ignored("head"));
        assert!(config.is_ignored("Options"));
        assert!(!config.is_ignored("POST"));
        assert_eq!(config.missing_salt, MissingSaltPolicy::Reject);
        assert_eq!(config.digest, TokenDigest::Sha1);
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(CsrfConfig::new(""), Err(CsrfError::Config(_))));
    }

    #[test]
    fn test_builders_keep_validated_secret() {
        let config = CsrfConfig::new("kept")
            .unwrap()
            .with_ignored_methods(["GET"])
            .with_digest(TokenDigest::Sha256)
            .with_missing_salt(MissingSaltPolicy::Forward);

        assert_eq!(config.secret(), "kept");
        assert_eq!(&*config.shared_secret(), "kept");
    }

    #[test]
    fn test_config_builder() {
        let config = CsrfConfig::default()
            .with_ignored_methods(["get", "trace"])
            .with_missing_salt(MissingSaltPolicy::Forward)
            .with_digest(TokenDigest::Sha256);

        assert!(config.is_ignored("TRACE"));
        assert!(!config.is_ignored("HEAD"));
        assert_eq!(config.missing_salt, MissingSaltPolicy::Forward);
        assert_eq!(config.digest, TokenDigest::Sha256);
    }

    #[test]
    fn test_generate_secret() {
        let secret = CsrfConfig::generate_secret();
        assert_eq!(secret.len(), 43);
        assert_ne!(secret, CsrfConfig::generate_secret());
        assert!(!CsrfConfig::default().secret().is_empty());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = CsrfConfig::new("do-not-print").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("do-not-print"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_lookup() {
        let config = CsrfConfig::from_lookup(lookup(&[
            (ENV_SECRET, "env-secret"),
            (ENV_IGNORED_METHODS, "get, head ,"),
            (ENV_DIGEST, "sha256"),
            (ENV_MISSING_SALT, "forward"),
        ]))
        .unwrap();

        assert_eq!(config.secret(), "env-secret");
        assert_eq!(config.ignored_methods.len(), 2);
        assert!(config.is_ignored("HEAD"));
        assert!(!config.is_ignored("OPTIONS"));
        assert_eq!(config.digest, TokenDigest::Sha256);
        assert_eq!(config.missing_salt, MissingSaltPolicy::Forward);
    }

    #[test]
    fn test_from_lookup_requires_secret() {
        assert!(matches!(
            CsrfConfig::from_lookup(lookup(&[(ENV_DIGEST, "sha1")])),
            Err(CsrfError::Config(_))
        ));
        assert!(CsrfConfig::from_lookup(lookup(&[(ENV_SECRET, "  ")])).is_err());
    }

    #[test]
    fn test_from_lookup_rejects_unknown_values() {
        assert!(
            CsrfConfig::from_lookup(lookup(&[(ENV_SECRET, "x"), (ENV_DIGEST, "md5")])).is_err()
        );
        assert!(
            CsrfConfig::from_lookup(lookup(&[(ENV_SECRET, "x"), (ENV_MISSING_SALT, "allow")]))
                .is_err()
        );
    }

    #[test]
    fn test_default_token_getter_order() {
        let req = HttpRequest::new("POST", "/submit?_csrf=from-query")
            .with_header("x-csrf-token", "from-header")
            .with_form(&[("_csrf", "from-form")])
            .unwrap();
        assert_eq!(default_token_getter(&req), "from-form");

        let req = HttpRequest::new("POST", "/submit?_csrf=from-query")
            .with_header("X-CSRF-TOKEN", "from-header");
        assert_eq!(default_token_getter(&req), "from-query");

        let req = HttpRequest::new("POST", "/submit?_csrf=")
            .with_header("X-CSRF-TOKEN", "")
            .with_header("X-XSRF-TOKEN", "from-xsrf");
        assert_eq!(default_token_getter(&req), "from-xsrf");

        assert_eq!(default_token_getter(&HttpRequest::new("POST", "/")), "");
    }

    #[test]
    fn test_default_error_handler() {
        let req = HttpRequest::new("POST", "/");
        let response = default_error_handler(&req, &CsrfError::TokenMismatch).unwrap();
        assert_eq!(response.status, 403);

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["error"], "csrf_token_mismatch");
        assert!(body["message"].is_string());
    }
}
