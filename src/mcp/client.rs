//! Remote session client: one SSH session, one bounded `tail`, per call.
//!
//! ## Session Lifecycle
//!
//! 1. **Address Parsing**: `host`, `host:port`, `[v6]:port` or a bare IP. Port
//!    defaults to 22.
//!
//! 2. **Connection**: TCP connect plus SSH handshake, bounded by the connect
//!    timeout.
//!
//! 3. **Authentication**: public-key authentication with the identity from
//!    [`Credentials`], bounded by the auth timeout.
//!
//! 4. **Command Execution**: `sudo -n tail -n <N> /var/log/syslog`, bounded by the
//!    command timeout. `N` is the only variable part of the command; host and
//!    user only ever travel as connection parameters.
//!
//! 5. **Close**: the session is disconnected on every path once a handle
//!    exists. Disconnect failures are logged and swallowed.
//!
//! There are no retries here. Each call is one attempt; retry policy belongs to
//! the caller.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::{ChannelMsg, Disconnect, client};
use tracing::{debug, warn};

use crate::mcp::auth::{AuthStrategy, KeyAuth};
use crate::mcp::config::{SessionTimeouts, resolve_compression, session_timeouts_from_env};
use crate::mcp::credentials::Credentials;
use crate::mcp::error::{RemoteError, Stage, classify_failure};
use crate::mcp::session::SshClientHandler;
use crate::mcp::types::HostTarget;

/// Log file read on every host.
pub const SYSLOG_PATH: &str = "/var/log/syslog";

/// Upper bound on how long a disconnect may take before it is abandoned.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Something that can fetch the tail of a host's system log.
///
/// The aggregator only depends on this trait, which keeps it independent of
/// the SSH transport.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Return the raw output of the last `line_count` lines of the system log.
    async fn fetch_tail(
        &self,
        host: &HostTarget,
        line_count: u32,
        credentials: &Credentials,
    ) -> Result<String, RemoteError>;
}

/// The only command ever sent to a host.
pub fn tail_command(line_count: u32) -> String {
    format!("sudo -n tail -n {} {}", line_count, SYSLOG_PATH)
}

/// Build russh client configuration.
///
/// The inactivity timeout matches the command budget so a stalled server is
/// dropped even if a caller forgets the outer timeout.
pub(crate) fn build_client_config(inactivity: Duration, compress: bool) -> Arc<client::Config> {
    let compression = if compress {
        (&[russh::compression::ZLIB, russh::compression::NONE][..]).into()
    } else {
        (&[russh::compression::NONE][..]).into()
    };

    let preferred = russh::Preferred {
        compression,
        ..Default::default()
    };

    Arc::new(client::Config {
        inactivity_timeout: Some(inactivity),
        keepalive_interval: Some(Duration::from_secs(30)),
        keepalive_max: 3,
        preferred,
        ..Default::default()
    })
}

/// Parse an address into host and port components.
///
/// Bare IPv6 addresses are accepted without brackets; with a port they must be
/// bracketed (`[::1]:2222`).
pub(crate) fn parse_address(address: &str) -> Result<(String, u16), String> {
    let address = address.trim();

    if address.is_empty() {
        return Err("Empty host address".to_string());
    }

    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok((ip.to_string(), 22));
    }

    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| format!("Invalid bracketed address: {}", address))?;
        let port = match tail.strip_prefix(':') {
            Some(port_str) => port_str
                .parse::<u16>()
                .map_err(|e| format!("Invalid port number: {}", e))?,
            None if tail.is_empty() => 22,
            None => return Err(format!("Invalid bracketed address: {}", address)),
        };
        return Ok((host.to_string(), port));
    }

    match address.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str
                .parse::<u16>()
                .map_err(|e| format!("Invalid port number: {}", e))?;
            Ok((host.to_string(), port))
        }
        None => Ok((address.to_string(), 22)),
    }
}

/// SSH implementation of [`RemoteClient`].
#[derive(Debug, Clone)]
pub struct SshRemoteClient {
    timeouts: SessionTimeouts,
    compress: bool,
}

impl SshRemoteClient {
    pub fn new(timeouts: SessionTimeouts) -> Self {
        Self {
            timeouts,
            compress: true,
        }
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Client configured from `SSH_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(session_timeouts_from_env()).with_compression(resolve_compression(None))
    }

    async fn connect(
        &self,
        address: &str,
    ) -> Result<client::Handle<SshClientHandler>, RemoteError> {
        let (host, port) = parse_address(address).map_err(RemoteError::Unreachable)?;
        let config = build_client_config(self.timeouts.command, self.compress);
        let handler = SshClientHandler::new(address);

        let connect_future = client::connect(config, (host.as_str(), port), handler);

        tokio::time::timeout(self.timeouts.connect, connect_future)
            .await
            .map_err(|_| RemoteError::Timeout {
                stage: Stage::Connect,
                limit: self.timeouts.connect,
            })?
            .map_err(|e| classify_failure(&e.to_string()))
    }

    async fn authenticate(
        &self,
        handle: &mut client::Handle<SshClientHandler>,
        credentials: &Credentials,
    ) -> Result<(), RemoteError> {
        let strategy = KeyAuth::new(&credentials.private_key_path);

        let accepted = tokio::time::timeout(
            self.timeouts.auth,
            strategy.authenticate(handle, &credentials.remote_user),
        )
        .await
        .map_err(|_| RemoteError::Timeout {
            stage: Stage::Authenticate,
            limit: self.timeouts.auth,
        })??;

        if !accepted {
            return Err(RemoteError::AuthFailed(format!(
                "server rejected {} authentication for user {}",
                strategy.name(),
                credentials.remote_user
            )));
        }

        Ok(())
    }

    async fn run_tail(
        &self,
        handle: &mut client::Handle<SshClientHandler>,
        line_count: u32,
        credentials: &Credentials,
    ) -> Result<String, RemoteError> {
        self.authenticate(handle, credentials).await?;
        execute_command(handle, &tail_command(line_count), self.timeouts.command).await
    }
}

#[async_trait]
impl RemoteClient for SshRemoteClient {
    async fn fetch_tail(
        &self,
        host: &HostTarget,
        line_count: u32,
        credentials: &Credentials,
    ) -> Result<String, RemoteError> {
        let mut handle = self.connect(&host.address).await?;

        let result = self.run_tail(&mut handle, line_count, credentials).await;

        close_session(&handle, host).await;

        result
    }
}

/// Run `command` on a fresh channel and return stdout if it exits with status 0.
///
/// Channel open, exec and output collection share one deadline.
async fn execute_command(
    handle: &client::Handle<SshClientHandler>,
    command: &str,
    timeout: Duration,
) -> Result<String, RemoteError> {
    let run = async {
        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;

        // Pre-allocate buffers to reduce reallocations during output collection
        let mut stdout = Vec::with_capacity(16 * 1024);
        let mut stderr = Vec::with_capacity(1024);
        let mut exit_code: Option<u32> = None;

        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    stdout.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    // ext == 1 is stderr in SSH protocol
                    if ext == 1 {
                        stderr.extend_from_slice(&data);
                    }
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    exit_code = Some(exit_status);
                }
                Some(ChannelMsg::Eof) => {
                    // Continue to wait for exit status if not received yet
                    if exit_code.is_some() {
                        break;
                    }
                }
                Some(ChannelMsg::Close) | None => break,
                Some(_) => {}
            }
        }

        let _ = channel.close().await;

        Ok::<_, RemoteError>((stdout, stderr, exit_code))
    };

    let (stdout, stderr, exit_code) = tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| RemoteError::Timeout {
            stage: Stage::Command,
            limit: timeout,
        })??;

    match exit_code {
        Some(0) => Ok(String::from_utf8_lossy(&stdout).into_owned()),
        Some(code) => {
            debug!(
                "Command exited with {}: {}",
                code,
                String::from_utf8_lossy(&stderr).trim()
            );
            Err(RemoteError::CommandFailed(code))
        }
        None => Err(RemoteError::Unexpected(
            "remote command ended without an exit status".to_string(),
        )),
    }
}

/// Disconnect a session, swallowing any failure.
async fn close_session(handle: &client::Handle<SshClientHandler>, host: &HostTarget) {
    let disconnect = handle.disconnect(Disconnect::ByApplication, "log fetch complete", "en");

    match tokio::time::timeout(CLOSE_TIMEOUT, disconnect).await {
        Ok(Ok(())) => debug!("Closed session to {}", host),
        Ok(Err(e)) => debug!("Ignoring error while closing session to {}: {}", host, e),
        Err(_) => warn!("Abandoning session close to {} after {:?}", host, CLOSE_TIMEOUT),
    }
}
