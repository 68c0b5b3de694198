//! MCP log retrieval tools.
//!
//! - `fetch_logs`: Fetch and merge the recent syslog tail of one or more hosts
//! - `list_hosts`: List the hosts known to the configured inventory

use poem_mcpserver::{Tools, tool::StructuredContent};
use tracing::{error, info};
use uuid::Uuid;

use super::aggregate::{self, FetchRequest};
use super::credentials;
use super::inventory::HostInventory;
use super::message::FetchMessageBuilder;
use super::types::{AggregatedView, FetchLogsResponse, HostListResponse, LogEntryView};

/// MCP log retrieval tool implementation.
pub struct McpLogCommands;

#[Tools]
impl McpLogCommands {
    /// Fetch the last lines of /var/log/syslog from each requested host and
    /// merge them into one time-ordered list.
    ///
    /// Hosts are contacted independently: a host that is down, rejects the
    /// key, or fails the command is reported in `errors` while the other
    /// hosts' lines are still returned. Lines without a leading ISO-8601
    /// timestamp are listed first and carry no `timestamp`.
    async fn fetch_logs(
        &self,
        /// Inventory ids of the hosts to read (see list_hosts)
        host_ids: Vec<String>,
        /// Lines to read per host (default: 100, max: 10000). Invalid values fall back to the default with a warning.
        line_count: Option<String>,
    ) -> Result<StructuredContent<FetchLogsResponse>, String> {
        let request_id = Uuid::new_v4().to_string();
        let request = FetchRequest::from_raw(host_ids, line_count.as_deref());
        let host_count = request.host_ids.len();
        let line_count = request.line_count;

        info!(
            "[{}] fetch_logs for {} host(s), {} line(s) each",
            request_id, host_count, line_count
        );

        match aggregate::fetch_logs(request).await {
            Ok(view) => Ok(StructuredContent(build_fetch_response(
                request_id,
                chrono::Utc::now().to_rfc3339(),
                line_count,
                host_count,
                view,
            ))),
            Err(e) => {
                error!("[{}] Configuration error: {}", request_id, e);
                Err(format!("Configuration error: {}", e))
            }
        }
    }

    /// List the hosts logs can be fetched from, ordered by id.
    async fn list_hosts(&self) -> Result<StructuredContent<HostListResponse>, String> {
        let config = credentials::load_from_env().map_err(|e| {
            error!("Configuration error: {}", e);
            format!("Configuration error: {}", e)
        })?;

        let hosts = config.inventory.hosts();
        Ok(StructuredContent(HostListResponse {
            count: hosts.len(),
            hosts,
        }))
    }
}

fn build_fetch_response(
    request_id: String,
    fetched_at: String,
    line_count: u32,
    host_count: usize,
    view: AggregatedView,
) -> FetchLogsResponse {
    let message = FetchMessageBuilder::new(request_id.as_str(), host_count, line_count)
        .with_entries(view.entries.len())
        .with_failed_hosts(view.errors.len())
        .with_warnings(view.warnings.len())
        .build();

    FetchLogsResponse {
        request_id,
        fetched_at,
        line_count,
        entry_count: view.entries.len(),
        entries: view.entries.into_iter().map(LogEntryView::from).collect(),
        errors: view.errors,
        warnings: view.warnings,
        host_count,
        message,
    }
}
