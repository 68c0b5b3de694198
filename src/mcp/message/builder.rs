//! Builder for the human-readable summary attached to fetch responses.

/// Builder for log fetch summary messages.
///
/// # Example
///
/// ```ignore
/// let message = FetchMessageBuilder::new("req-123", 3, 100)
///     .with_entries(250)
///     .with_failed_hosts(1)
///     .with_warnings(0)
///     .build();
/// ```
pub struct FetchMessageBuilder {
    request_id: String,
    host_count: usize,
    line_count: u32,
    entry_count: usize,
    failed_hosts: usize,
    warnings: usize,
}

impl FetchMessageBuilder {
    /// Create a new fetch message builder with required fields.
    pub fn new(request_id: impl Into<String>, host_count: usize, line_count: u32) -> Self {
        Self {
            request_id: request_id.into(),
            host_count,
            line_count,
            entry_count: 0,
            failed_hosts: 0,
            warnings: 0,
        }
    }

    pub fn with_entries(mut self, entry_count: usize) -> Self {
        self.entry_count = entry_count;
        self
    }

    /// Number of entries in the error list.
    pub fn with_failed_hosts(mut self, failed_hosts: usize) -> Self {
        self.failed_hosts = failed_hosts;
        self
    }

    pub fn with_warnings(mut self, warnings: usize) -> Self {
        self.warnings = warnings;
        self
    }

    /// Build the message string.
    pub fn build(&self) -> String {
        let header = match (self.entry_count, self.failed_hosts) {
            (_, 0) => "LOGS FETCHED",
            (0, _) => "NO LOGS FETCHED",
            _ => "LOGS PARTIALLY FETCHED",
        };

        let mut lines = vec![format!("{} (request_id: '{}')", header, self.request_id)];
        lines.push(format!("• hosts requested: {}", self.host_count));
        lines.push(format!("• lines per host: {}", self.line_count));
        lines.push(format!("• entries: {}", self.entry_count));
        if self.failed_hosts > 0 {
            lines.push(format!("• problems: {} (see errors)", self.failed_hosts));
        }
        if self.warnings > 0 {
            lines.push(format!("• warnings: {} (see warnings)", self.warnings));
        }

        lines.join("\n")
    }
}
