//! Message building utilities for MCP responses.
//!
//! Summaries are plain text so that both humans and LLM clients can read the
//! outcome of a fetch without parsing the structured payload.

mod builder;

pub use builder::FetchMessageBuilder;
