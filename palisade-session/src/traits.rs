//! Session capability trait.

use crate::error::SessionResult;
use async_trait::async_trait;

/// A client-scoped key/value session.
///
/// Palisade never owns session state: the host application loads the
/// session for the current client (usually from a cookie) and hands it to
/// the middleware through a [`SessionHandle`](crate::SessionHandle). Writes
/// may be buffered until [`save`](Session::save) is called.
///
/// # Examples
///
/// ```ignore
/// use palisade_session::Session;
///
/// async fn remember(session: &dyn Session) -> palisade_session::SessionResult<()> {
///     session.set("theme", "dark".to_string()).await?;
///     session.save().await
/// }
/// ```
#[async_trait]
pub trait Session: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> SessionResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> SessionResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> SessionResult<()>;

    /// Flush pending changes to the backing store.
    async fn save(&self) -> SessionResult<()>;

    /// Read and remove `key` in one step.
    ///
    /// The default performs a `get` followed by a `delete`, which two
    /// concurrent callers can interleave. Backends able to remove
    /// atomically should override it so only one caller observes the value.
    async fn take(&self, key: &str) -> SessionResult<Option<String>> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.delete(key).await?;
        }
        Ok(value)
    }
}
