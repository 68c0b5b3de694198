//! Authentication strategy trait definition.

use async_trait::async_trait;
use russh::client;

use crate::mcp::error::RemoteError;
use crate::mcp::session::SshClientHandler;

/// Trait for SSH authentication strategies.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// per-host tasks.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Attempt to authenticate with the SSH server.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Authentication succeeded
    /// * `Ok(false)` - The server rejected the credentials
    /// * `Err(RemoteError)` - The attempt itself failed (key unreadable, transport error)
    async fn authenticate(
        &self,
        handle: &mut client::Handle<SshClientHandler>,
        username: &str,
    ) -> Result<bool, RemoteError>;

    /// Name of this strategy, for logging.
    fn name(&self) -> &'static str;
}
