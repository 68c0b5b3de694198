//! Credential and inventory document loading.
//!
//! The document is YAML:
//!
//! ```yaml
//! ssh_user: logreader
//! ssh_priv_key_path: /etc/monitoring/id_ed25519
//! hosts:
//!   - { id: 1, name: web-1, address: 10.0.0.11 }
//!   - { id: 2, name: db-1, address: "10.0.0.12:2222" }
//! ```
//!
//! It is read once per fetch and handed to every per-host task as an
//! immutable snapshot.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::mcp::config::config_path_from_env;
use crate::mcp::error::ConfigError;
use crate::mcp::inventory::StaticInventory;
use crate::mcp::types::HostTarget;

/// Identity used to open remote sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub remote_user: String,
    pub private_key_path: PathBuf,
}

/// Everything the configuration document provides.
#[derive(Debug)]
pub struct FleetConfig {
    pub credentials: Credentials,
    pub inventory: StaticInventory,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    ssh_user: Option<String>,
    ssh_priv_key_path: Option<PathBuf>,
    #[serde(default)]
    hosts: Vec<HostTarget>,
}

/// Load the configuration document at `path`.
pub fn load(path: &Path) -> Result<FleetConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let raw: RawConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let remote_user = raw
        .ssh_user
        .filter(|u| !u.trim().is_empty())
        .ok_or(ConfigError::MissingKey("ssh_user"))?;
    let private_key_path = raw
        .ssh_priv_key_path
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(ConfigError::MissingKey("ssh_priv_key_path"))?;

    debug!(
        "Loaded configuration from {:?}: user={}, {} host(s)",
        path,
        remote_user,
        raw.hosts.len()
    );

    Ok(FleetConfig {
        credentials: Credentials {
            remote_user,
            private_key_path,
        },
        inventory: StaticInventory::new(raw.hosts),
    })
}

/// Load credentials only.
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    load(path).map(|config| config.credentials)
}

/// Load the document named by `PATH_CONFIG`.
pub fn load_from_env() -> Result<FleetConfig, ConfigError> {
    let path = config_path_from_env().ok_or(ConfigError::NotConfigured)?;
    load(&path)
}
