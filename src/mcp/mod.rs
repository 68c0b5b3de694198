//! MCP syslog fleet module: fetch recent syslog tails from many hosts over SSH
//! and merge them into one time-ordered view.
//!
//! This module is organized into the following submodules:
//!
//! - `types`: Engine data model and serializable response types for MCP tools
//! - `config`: Configuration resolution with environment variable support
//! - `credentials`: Loading of the YAML credential and inventory document
//! - `error`: Error types and failure classification for retry logic
//! - `inventory`: Host id resolution
//! - `session`: SSH client handler
//! - `auth`: SSH authentication strategies
//! - `client`: One-shot remote tail over SSH
//! - `timestamp`: Leading ISO-8601 timestamp extraction
//! - `aggregate`: Concurrent fan-out, merge and ordering
//! - `message`: Human-readable fetch summaries
//! - `commands`: MCP tool implementations

pub mod aggregate;
pub mod auth;
pub mod client;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod inventory;
pub(crate) mod message;
pub(crate) mod schema;
pub mod session;
pub mod timestamp;
pub mod types;

pub use commands::McpLogCommands;
