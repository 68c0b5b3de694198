//! Error taxonomy for log retrieval and classification of low-level SSH failures.
//!
//! Three families of errors exist:
//!
//! 1. [`ConfigError`]: the credential document is missing or invalid. This is the
//!    only error that aborts a whole fetch, since no host can be reached without
//!    credentials.
//!
//! 2. [`HostResolutionError`]: a requested host id is malformed or unknown to the
//!    inventory. Reported per host.
//!
//! 3. [`RemoteError`]: a single host could not deliver its log tail. Reported per
//!    host and never propagated past the aggregator.
//!
//! # Classification Strategy
//!
//! russh and the OS report failures as free-form text. [`classify_failure`] maps
//! that text onto the closed [`RemoteError`] set by matching case-insensitive
//! patterns. Authentication patterns are checked first: a message such as
//! "connection closed: publickey authentication failed" is an auth failure,
//! not a reachability problem.
//!
//! ```rust,ignore
//! use syslog_fleet::mcp::error::{classify_failure, RemoteError};
//!
//! assert!(matches!(classify_failure("Permission denied"), RemoteError::AuthFailed(_)));
//! assert!(matches!(classify_failure("Connection refused"), RemoteError::Unreachable(_)));
//! assert!(matches!(classify_failure("SSH version mismatch"), RemoteError::Unexpected(_)));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading the credential document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PATH_CONFIG is not set and no configuration path was given")]
    NotConfigured,

    #[error("configuration file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("configuration file {path:?} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file {path:?} is not valid YAML: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("configuration is missing required key '{0}'")]
    MissingKey(&'static str),
}

/// Errors raised when a requested host id cannot be turned into a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostResolutionError {
    #[error("host invalid: '{0}' is not a host id")]
    Invalid(String),

    #[error("host not found: no host with id {0}")]
    NotFound(u32),
}

/// Per-host failure of a remote log fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("host unreachable: {0}; is it online and is the SSH port open?")]
    Unreachable(String),

    #[error("authentication failed: {0}; is the collector key installed on this host?")]
    AuthFailed(String),

    #[error("timed out during {stage} after {}s", .limit.as_secs_f32())]
    Timeout { stage: Stage, limit: Duration },

    #[error(
        "command failed with exit status {0}; is the log reader allowed to run sudo tail on this host?"
    )]
    CommandFailed(u32),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl RemoteError {
    /// Whether retrying the fetch could plausibly succeed.
    ///
    /// Authentication and command failures will fail the same way again, and
    /// retrying auth risks account lockouts.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Unreachable(_) | RemoteError::Timeout { .. })
    }
}

/// Phase of a remote fetch, used to label timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Authenticate,
    Command,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Connect => write!(f, "connection"),
            Stage::Authenticate => write!(f, "authentication"),
            Stage::Command => write!(f, "command execution"),
        }
    }
}

/// Patterns indicating the server rejected our identity.
const AUTH_ERRORS: &[&str] = &[
    "authentication failed",
    "key authentication failed",
    "permission denied",
    "publickey",
    "auth fail",
    "no authentication",
    "all authentication methods failed",
];

/// Patterns indicating the host could not be reached at all.
const UNREACHABLE_ERRORS: &[&str] = &[
    "connection refused",
    "connection reset",
    "network is unreachable",
    "no route to host",
    "host is down",
    "temporary failure",
    "name or service not known",
    "failed to lookup address",
    "broken pipe",
];

/// Map a free-form failure message onto the [`RemoteError`] taxonomy.
///
/// Auth patterns win over connection patterns. Messages mentioning a timeout
/// without a known stage are treated as unreachable hosts, since callers
/// construct [`RemoteError::Timeout`] directly when they own the deadline.
pub fn classify_failure(detail: &str) -> RemoteError {
    let lower = detail.to_lowercase();

    if AUTH_ERRORS.iter().any(|p| lower.contains(p)) {
        return RemoteError::AuthFailed(detail.to_string());
    }

    if UNREACHABLE_ERRORS.iter().any(|p| lower.contains(p))
        || lower.contains("timed out")
        || lower.contains("timeout")
    {
        return RemoteError::Unreachable(detail.to_string());
    }

    RemoteError::Unexpected(detail.to_string())
}
