//! Runtime settings for log fetches.
//!
//! Values are resolved with a three-tier priority system:
//!
//! 1. **Parameter** - Explicitly provided value (highest priority)
//! 2. **Environment Variable** - Value from environment variable
//! 3. **Default** - Built-in default value (lowest priority)
//!
//! Unparseable environment values are ignored and the default is used.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PATH_CONFIG` | - | Path of the YAML credential/inventory document |
//! | `SSH_CONNECT_TIMEOUT` | 5s | TCP connect and SSH handshake timeout in seconds |
//! | `SSH_AUTH_TIMEOUT` | 5s | Public-key authentication timeout in seconds |
//! | `SSH_COMMAND_TIMEOUT` | 8s | Remote `tail` execution timeout in seconds |
//! | `LOG_FETCH_MAX_RETRIES` | 0 | Retries of transient per-host failures |
//! | `LOG_FETCH_RETRY_DELAY_MS` | 500ms | Initial retry delay in milliseconds |
//! | `SSH_COMPRESSION` | true | Negotiate zlib compression for log transfer |
//! | `LOG_FETCH_CONCURRENT` | true | Fetch hosts concurrently instead of one by one |

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Lines fetched per host when the caller gives no usable count
pub const DEFAULT_LINE_COUNT: u32 = 100;

/// Upper bound on lines fetched per host
pub const MAX_LINE_COUNT: u32 = 10_000;

/// Default connection timeout in seconds
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default authentication timeout in seconds
pub(crate) const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 5;

/// Default command execution timeout in seconds
pub(crate) const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 8;

/// Default retries per host; a single attempt
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 0;

/// Default initial retry delay in milliseconds
pub(crate) const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Maximum retry delay cap
pub(crate) const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

pub const PATH_CONFIG_ENV_VAR: &str = "PATH_CONFIG";
pub(crate) const CONNECT_TIMEOUT_ENV_VAR: &str = "SSH_CONNECT_TIMEOUT";
pub(crate) const AUTH_TIMEOUT_ENV_VAR: &str = "SSH_AUTH_TIMEOUT";
pub(crate) const COMMAND_TIMEOUT_ENV_VAR: &str = "SSH_COMMAND_TIMEOUT";
pub(crate) const MAX_RETRIES_ENV_VAR: &str = "LOG_FETCH_MAX_RETRIES";
pub(crate) const RETRY_DELAY_MS_ENV_VAR: &str = "LOG_FETCH_RETRY_DELAY_MS";
pub(crate) const CONCURRENT_ENV_VAR: &str = "LOG_FETCH_CONCURRENT";
pub(crate) const COMPRESSION_ENV_VAR: &str = "SSH_COMPRESSION";

/// Timeouts applied to each remote session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    pub connect: Duration,
    pub auth: Duration,
    pub command: Duration,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            auth: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
            command: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
        }
    }
}

/// How the aggregator schedules and retries per-host fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub concurrent: bool,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            concurrent: true,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Resolve a value with priority: parameter -> env var -> default
fn resolve<T: FromStr>(param: Option<T>, env_var: &str, default: T) -> T {
    if let Some(value) = param {
        return value;
    }

    if let Ok(raw) = env::var(env_var)
        && let Ok(value) = raw.trim().parse::<T>()
    {
        return value;
    }

    default
}

pub(crate) fn resolve_connect_timeout(timeout_param: Option<u64>) -> Duration {
    Duration::from_secs(resolve(
        timeout_param,
        CONNECT_TIMEOUT_ENV_VAR,
        DEFAULT_CONNECT_TIMEOUT_SECS,
    ))
}

pub(crate) fn resolve_auth_timeout(timeout_param: Option<u64>) -> Duration {
    Duration::from_secs(resolve(
        timeout_param,
        AUTH_TIMEOUT_ENV_VAR,
        DEFAULT_AUTH_TIMEOUT_SECS,
    ))
}

pub(crate) fn resolve_command_timeout(timeout_param: Option<u64>) -> Duration {
    Duration::from_secs(resolve(
        timeout_param,
        COMMAND_TIMEOUT_ENV_VAR,
        DEFAULT_COMMAND_TIMEOUT_SECS,
    ))
}

pub(crate) fn resolve_max_retries(max_retries_param: Option<u32>) -> u32 {
    resolve(max_retries_param, MAX_RETRIES_ENV_VAR, DEFAULT_MAX_RETRIES)
}

pub(crate) fn resolve_retry_delay(retry_delay_param: Option<u64>) -> Duration {
    Duration::from_millis(resolve(
        retry_delay_param,
        RETRY_DELAY_MS_ENV_VAR,
        DEFAULT_RETRY_DELAY_MS,
    ))
}

/// Resolve a boolean flag with priority: parameter -> env var -> default.
/// Accepts `true`/`1` as true; any other set value is false.
fn resolve_flag(param: Option<bool>, env_var: &str, default: bool) -> bool {
    if let Some(flag) = param {
        return flag;
    }

    if let Ok(raw) = env::var(env_var) {
        let raw = raw.trim();
        return raw.eq_ignore_ascii_case("true") || raw == "1";
    }

    default
}

pub(crate) fn resolve_concurrent(concurrent_param: Option<bool>) -> bool {
    resolve_flag(concurrent_param, CONCURRENT_ENV_VAR, true)
}

pub(crate) fn resolve_compression(compress_param: Option<bool>) -> bool {
    resolve_flag(compress_param, COMPRESSION_ENV_VAR, true)
}

/// Session timeouts from the environment.
pub fn session_timeouts_from_env() -> SessionTimeouts {
    SessionTimeouts {
        connect: resolve_connect_timeout(None),
        auth: resolve_auth_timeout(None),
        command: resolve_command_timeout(None),
    }
}

/// Fetch scheduling from the environment.
pub fn fetch_settings_from_env() -> FetchSettings {
    FetchSettings {
        concurrent: resolve_concurrent(None),
        max_retries: resolve_max_retries(None),
        retry_delay: resolve_retry_delay(None),
    }
}

/// Path of the configuration document, if `PATH_CONFIG` is set and non-empty.
pub fn config_path_from_env() -> Option<std::path::PathBuf> {
    env::var_os(PATH_CONFIG_ENV_VAR)
        .filter(|p| !p.is_empty())
        .map(std::path::PathBuf::from)
}
