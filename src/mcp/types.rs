//! Data model for log retrieval and the serializable responses of the MCP tools.
//!
//! The engine-side types (`HostTarget`, `RemoteResult`, `LogEntry`,
//! `AggregatedView`) are plain Rust values. The response types at the bottom
//! implement `Serialize`, `Deserialize`, and `JsonSchema` for MCP protocol
//! compatibility.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::error::RemoteError;

/// A named, addressable remote machine subject to log retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HostTarget {
    /// Inventory identifier
    #[schemars(schema_with = "crate::mcp::schema::uint")]
    pub id: u32,
    /// Display name used to tag log lines
    pub name: String,
    /// Network address in `host` or `host:port` format
    pub address: String,
}

impl HostTarget {
    pub fn new(id: u32, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
        }
    }
}

impl std::fmt::Display for HostTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// Outcome of one remote fetch for one host.
///
/// Exactly one of raw output or error is present, carried as a `Result`.
#[derive(Debug)]
pub struct RemoteResult {
    pub host: HostTarget,
    pub outcome: Result<String, RemoteError>,
}

/// One log line tagged with its host and parsed timestamp.
///
/// Lines without a parseable timestamp carry [`crate::mcp::timestamp::SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub host: String,
    pub line: String,
    pub timestamp: NaiveDateTime,
}

/// Globally time-ordered log entries plus per-host diagnostics for one request.
#[derive(Debug, Default)]
pub struct AggregatedView {
    pub entries: Vec<LogEntry>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// A log line as rendered to callers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LogEntryView {
    pub host: String,
    pub line: String,
    /// ISO-8601 local time without offset; absent when the line carried no parseable timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<LogEntry> for LogEntryView {
    fn from(entry: LogEntry) -> Self {
        let timestamp = (!crate::mcp::timestamp::is_sentinel(&entry.timestamp))
            .then(|| entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        Self {
            host: entry.host,
            line: entry.line,
            timestamp,
        }
    }
}

/// Response from fetch_logs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FetchLogsResponse {
    /// Unique identifier for this fetch, also present in server logs
    pub request_id: String,
    /// When the fetch completed (RFC3339 format)
    pub fetched_at: String,
    /// Number of lines requested per host after validation
    #[schemars(schema_with = "crate::mcp::schema::uint")]
    pub line_count: u32,
    /// Log lines from all hosts, oldest first
    pub entries: Vec<LogEntryView>,
    /// One message per host that could not be read
    pub errors: Vec<String>,
    /// Input problems that were corrected (e.g. an invalid line count)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[schemars(schema_with = "crate::mcp::schema::uint")]
    pub host_count: usize,
    #[schemars(schema_with = "crate::mcp::schema::uint")]
    pub entry_count: usize,
    /// Human-readable summary
    pub message: String,
}

/// Response from list_hosts
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HostListResponse {
    /// Hosts known to the inventory
    pub hosts: Vec<HostTarget>,
    /// Total number of hosts
    #[schemars(schema_with = "crate::mcp::schema::uint")]
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::timestamp::SENTINEL;
    use chrono::NaiveDate;

    mod log_entry_view {
        use super::*;

        #[test]
        fn test_real_timestamp_is_rendered() {
            let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 5, 0)
                .unwrap();
            let view = LogEntryView::from(LogEntry {
                host: "A".to_string(),
                line: "2024-01-01T10:05:00 cron run".to_string(),
                timestamp: ts,
            });
            assert_eq!(view.timestamp.as_deref(), Some("2024-01-01T10:05:00"));
        }

        #[test]
        fn test_sentinel_timestamp_is_omitted() {
            let view = LogEntryView::from(LogEntry {
                host: "A".to_string(),
                line: "garbled line no date".to_string(),
                timestamp: SENTINEL,
            });
            assert!(view.timestamp.is_none());

            let json = serde_json::to_value(&view).unwrap();
            assert!(json.get("timestamp").is_none());
        }
    }

    mod response_serialization {
        use super::*;

        #[test]
        fn test_fetch_logs_response_json_structure() {
            let response = FetchLogsResponse {
                request_id: "req-1".to_string(),
                fetched_at: "2024-01-01T00:00:00+00:00".to_string(),
                line_count: 100,
                entries: vec![],
                errors: vec!["B (10.0.0.2): authentication failed".to_string()],
                warnings: vec![],
                host_count: 2,
                entry_count: 0,
                message: "msg".to_string(),
            };

            let json = serde_json::to_value(&response).unwrap();
            assert_eq!(json["line_count"], 100);
            assert_eq!(json["errors"][0], "B (10.0.0.2): authentication failed");
            assert!(json.get("warnings").is_none());
        }

        #[test]
        fn test_host_list_response_roundtrip() {
            let response = HostListResponse {
                hosts: vec![HostTarget::new(3, "db", "10.0.0.3:2222")],
                count: 1,
            };
            let json = serde_json::to_string(&response).unwrap();
            let back: HostListResponse = serde_json::from_str(&json).unwrap();
            assert_eq!(back.hosts[0], HostTarget::new(3, "db", "10.0.0.3:2222"));
            assert_eq!(back.count, 1);
        }
    }
}
