//! Fan-out aggregation of syslog tails across hosts.
//!
//! One fetch is a best-effort batch: every requested host is resolved,
//! fetched and merged independently, and the caller always receives whatever
//! entries could be gathered alongside one message per problem host.
//!
//! # Algorithm
//!
//! 1. The requested line count is validated when the [`FetchRequest`] is built
//!    (default 100, one warning on bad input).
//! 2. Each host id is resolved against the inventory. Failures become errors
//!    in the host's slot.
//! 3. Each resolved host is fetched in its own task, owning its own session.
//!    In concurrent mode all tasks are spawned first and then joined; in
//!    sequential mode each task is awaited before the next starts.
//! 4. Results are merged in request order: output is split into lines,
//!    reversed, and each non-empty line is tagged with the host name and its
//!    parsed timestamp.
//! 5. All entries are stable-sorted by timestamp.
//!
//! Only a [`ConfigError`] aborts a fetch, and that happens before any host is
//! contacted (see [`fetch_logs`]).

use std::sync::Arc;

use backon::{ExponentialBuilder, Retryable};
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::mcp::client::{RemoteClient, SshRemoteClient};
use crate::mcp::config::{
    DEFAULT_LINE_COUNT, FetchSettings, MAX_LINE_COUNT, MAX_RETRY_DELAY, fetch_settings_from_env,
};
use crate::mcp::credentials::{self, Credentials};
use crate::mcp::error::{ConfigError, HostResolutionError, RemoteError};
use crate::mcp::inventory::HostInventory;
use crate::mcp::timestamp;
use crate::mcp::types::{AggregatedView, HostTarget, LogEntry, RemoteResult};

/// A validated request for log tails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Host ids in request order; duplicates are fetched independently
    pub host_ids: Vec<String>,
    pub line_count: u32,
    /// Problems found while validating the input
    pub warnings: Vec<String>,
}

impl FetchRequest {
    /// Build a request from raw caller input.
    pub fn from_raw(host_ids: Vec<String>, raw_line_count: Option<&str>) -> Self {
        let (line_count, warning) = parse_line_count(raw_line_count);
        Self {
            host_ids,
            line_count,
            warnings: warning.into_iter().collect(),
        }
    }
}

/// Validate a raw line count.
///
/// Missing, blank, non-numeric and zero values become [`DEFAULT_LINE_COUNT`];
/// values above [`MAX_LINE_COUNT`] are clamped. Either correction yields
/// exactly one warning.
pub fn parse_line_count(raw: Option<&str>) -> (u32, Option<String>) {
    let raw = raw.unwrap_or("").trim();

    match raw.parse::<u64>() {
        Ok(0) | Err(_) => (
            DEFAULT_LINE_COUNT,
            Some(format!(
                "Invalid line count '{}', {} lines will be shown.",
                raw, DEFAULT_LINE_COUNT
            )),
        ),
        Ok(n) if n > u64::from(MAX_LINE_COUNT) => (
            MAX_LINE_COUNT,
            Some(format!(
                "Line count {} exceeds the maximum, {} lines will be shown.",
                n, MAX_LINE_COUNT
            )),
        ),
        Ok(n) => (n as u32, None),
    }
}

/// Split raw `tail` output into lines, dropping the empty element left by the
/// final newline, and reverse them.
///
/// Applying the reversal twice restores the remote order.
pub fn reverse_tail(raw: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines.reverse();
    lines
}

/// Tag each non-empty line of `raw` with `host` and its parsed timestamp.
pub fn entries_from_output(host: &str, raw: &str) -> Vec<LogEntry> {
    reverse_tail(raw)
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(|line| LogEntry {
            host: host.to_string(),
            line: line.to_string(),
            timestamp: timestamp::parse(line),
        })
        .collect()
}

/// Outcome for one requested host id, kept in request order.
enum HostSlot {
    Unresolved(HostResolutionError),
    Fetched(RemoteResult),
}

/// Orchestrates per-host fetches and merges their output.
pub struct Aggregator<C, I> {
    client: Arc<C>,
    inventory: Arc<I>,
    settings: FetchSettings,
}

impl<C, I> Aggregator<C, I>
where
    C: RemoteClient + 'static,
    I: HostInventory,
{
    pub fn new(client: Arc<C>, inventory: Arc<I>, settings: FetchSettings) -> Self {
        Self {
            client,
            inventory,
            settings,
        }
    }

    /// Fetch and merge logs for every host in `request`. Never fails as a whole.
    pub async fn aggregate(
        &self,
        request: FetchRequest,
        credentials: Arc<Credentials>,
    ) -> AggregatedView {
        let FetchRequest {
            host_ids,
            line_count,
            warnings,
        } = request;

        info!(
            "Fetching {} line(s) from {} host(s) ({})",
            line_count,
            host_ids.len(),
            if self.settings.concurrent {
                "concurrent"
            } else {
                "sequential"
            }
        );

        let resolved: Vec<Result<HostTarget, HostResolutionError>> = host_ids
            .iter()
            .map(|id| self.inventory.resolve_host(id))
            .collect();

        let slots = if self.settings.concurrent {
            self.fetch_concurrent(resolved, line_count, &credentials).await
        } else {
            self.fetch_sequential(resolved, line_count, &credentials).await
        };

        let mut view = AggregatedView {
            warnings,
            ..Default::default()
        };
        for slot in slots {
            merge_slot(&mut view, slot);
        }

        // Vec::sort_by_key is stable: ties keep host order, then line order
        view.entries.sort_by_key(|entry| entry.timestamp);

        info!(
            "Fetch finished: {} entries, {} error(s)",
            view.entries.len(),
            view.errors.len()
        );

        view
    }

    async fn fetch_concurrent(
        &self,
        resolved: Vec<Result<HostTarget, HostResolutionError>>,
        line_count: u32,
        credentials: &Arc<Credentials>,
    ) -> Vec<HostSlot> {
        // Spawn everything before awaiting anything
        let pending: Vec<_> = resolved
            .into_iter()
            .map(|slot| {
                slot.map(|host| {
                    let task = self.spawn_fetch(host.clone(), line_count, credentials);
                    (host, task)
                })
            })
            .collect();

        join_all(pending.into_iter().map(|slot| async move {
            match slot {
                Ok((host, task)) => HostSlot::Fetched(RemoteResult {
                    outcome: join_fetch(task).await,
                    host,
                }),
                Err(e) => HostSlot::Unresolved(e),
            }
        }))
        .await
    }

    async fn fetch_sequential(
        &self,
        resolved: Vec<Result<HostTarget, HostResolutionError>>,
        line_count: u32,
        credentials: &Arc<Credentials>,
    ) -> Vec<HostSlot> {
        let mut slots = Vec::with_capacity(resolved.len());
        for slot in resolved {
            slots.push(match slot {
                Ok(host) => {
                    let task = self.spawn_fetch(host.clone(), line_count, credentials);
                    HostSlot::Fetched(RemoteResult {
                        outcome: join_fetch(task).await,
                        host,
                    })
                }
                Err(e) => HostSlot::Unresolved(e),
            });
        }
        slots
    }

    fn spawn_fetch(
        &self,
        host: HostTarget,
        line_count: u32,
        credentials: &Arc<Credentials>,
    ) -> JoinHandle<Result<String, RemoteError>> {
        let client = Arc::clone(&self.client);
        let credentials = Arc::clone(credentials);
        let settings = self.settings;

        tokio::spawn(async move {
            fetch_with_retry(client.as_ref(), &host, line_count, &credentials, settings).await
        })
    }
}

/// One host's fetch, retried on transient errors up to `settings.max_retries`.
async fn fetch_with_retry<C: RemoteClient + ?Sized>(
    client: &C,
    host: &HostTarget,
    line_count: u32,
    credentials: &Credentials,
    settings: FetchSettings,
) -> Result<String, RemoteError> {
    let backoff = ExponentialBuilder::default()
        .with_min_delay(settings.retry_delay)
        .with_max_delay(MAX_RETRY_DELAY)
        .with_max_times(settings.max_retries as usize)
        .with_jitter();

    (|| client.fetch_tail(host, line_count, credentials))
        .retry(backoff)
        .when(RemoteError::is_retryable)
        .notify(|err, dur| {
            warn!("Fetch from {} failed: {}. Retrying in {:?}", host, err, dur);
        })
        .await
}

async fn join_fetch(task: JoinHandle<Result<String, RemoteError>>) -> Result<String, RemoteError> {
    task.await
        .unwrap_or_else(|e| Err(RemoteError::Unexpected(format!("fetch task failed: {}", e))))
}

fn merge_slot(view: &mut AggregatedView, slot: HostSlot) {
    match slot {
        HostSlot::Unresolved(e) => {
            warn!("Skipping host: {}", e);
            view.errors.push(e.to_string());
        }
        HostSlot::Fetched(RemoteResult {
            host,
            outcome: Ok(raw),
        }) => {
            let entries = entries_from_output(&host.name, &raw);
            if entries.is_empty() {
                view.errors.push(format!("{}: no log lines returned", host));
            }
            view.entries.extend(entries);
        }
        HostSlot::Fetched(RemoteResult {
            host,
            outcome: Err(e),
        }) => {
            warn!("Fetch from {} failed: {}", host, e);
            view.errors.push(format!("{}: {}", host, e));
        }
    }
}

/// Fetch logs with credentials, inventory and settings taken from the environment.
///
/// Fails only when the configuration document cannot be loaded.
pub async fn fetch_logs(request: FetchRequest) -> Result<AggregatedView, ConfigError> {
    let config = credentials::load_from_env()?;

    let aggregator = Aggregator::new(
        Arc::new(SshRemoteClient::from_env()),
        Arc::new(config.inventory),
        fetch_settings_from_env(),
    );

    Ok(aggregator
        .aggregate(request, Arc::new(config.credentials))
        .await)
}
