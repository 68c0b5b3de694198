//! Private key file SSH authentication.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use russh::{client, keys};
use tracing::debug;

use crate::mcp::error::{RemoteError, classify_failure};
use crate::mcp::session::SshClientHandler;

use super::traits::AuthStrategy;

/// Private key file authentication strategy.
///
/// The key is read from disk on every attempt so that a rotated identity file
/// is picked up without a restart. Only passphrase-less keys are supported.
pub struct KeyAuth {
    key_path: PathBuf,
}

impl KeyAuth {
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }
}

#[async_trait]
impl AuthStrategy for KeyAuth {
    async fn authenticate(
        &self,
        handle: &mut client::Handle<SshClientHandler>,
        username: &str,
    ) -> Result<bool, RemoteError> {
        let key_pair = keys::load_secret_key(&self.key_path, None).map_err(|e| {
            RemoteError::AuthFailed(format!(
                "failed to load private key from {:?}: {}",
                self.key_path, e
            ))
        })?;

        // For RSA keys, use the best supported hash algorithm
        let hash_alg = handle
            .best_supported_rsa_hash()
            .await
            .ok()
            .flatten()
            .flatten();
        debug!("Using RSA hash algorithm for key auth: {:?}", hash_alg);

        let key_with_hash = keys::PrivateKeyWithHashAlg::new(Arc::new(key_pair), hash_alg);

        let result = handle
            .authenticate_publickey(username, key_with_hash)
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;

        Ok(result.success())
    }

    fn name(&self) -> &'static str {
        "key"
    }
}
