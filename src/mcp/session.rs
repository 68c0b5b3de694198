//! russh client handler for log-fetch sessions.
//!
//! Each remote fetch owns exactly one `client::Handle<SshClientHandler>`; handles
//! are never shared between hosts or reused across fetches.

use russh::keys::HashAlg;
use russh::{client, keys};
use tracing::debug;

/// Client handler that accepts all host keys.
///
/// Behaves like `StrictHostKeyChecking=no` in OpenSSH. The fingerprint of the
/// presented key is logged at debug level so an operator can audit it.
///
/// # Security Note
///
/// Fleet hosts are provisioned by the operator alongside the collector key;
/// there is no known_hosts verification yet.
pub struct SshClientHandler {
    host: String,
}

impl SshClientHandler {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            "Accepting host key {} for {}",
            server_public_key.fingerprint(HashAlg::Sha256),
            self.host
        );
        Ok(true)
    }
}
