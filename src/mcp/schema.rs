//! JSON Schema helpers for MCP-compliant schemas.
//!
//! Counts and identifiers are emitted as plain integers, without the
//! Rust-specific "uint32"/"uint" formats schemars produces by default.

use schemars::Schema;
use schemars::json_schema;

/// Unsigned integer schema: `{"type": "integer", "minimum": 0}`
///
/// Use with `#[schemars(schema_with = "crate::mcp::schema::uint")]` on unsigned fields.
pub fn uint(_generator: &mut schemars::SchemaGenerator) -> Schema {
    json_schema!({
        "type": "integer",
        "minimum": 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::SchemaGenerator;

    fn root_schema_json<T: schemars::JsonSchema>() -> String {
        let schema = SchemaGenerator::default().into_root_schema_for::<T>();
        serde_json::to_string(&schema).expect("Failed to serialize schema")
    }

    #[test]
    fn test_uint_schema_structure() {
        let mut generator = SchemaGenerator::default();
        let schema = uint(&mut generator);

        let json = serde_json::to_value(&schema).expect("Failed to serialize schema");

        assert_eq!(json.get("type"), Some(&serde_json::json!("integer")));
        assert_eq!(json.get("minimum"), Some(&serde_json::json!(0)));
        assert!(json.get("format").is_none(), "Should not have format field");
    }

    #[test]
    fn test_fetch_logs_response_schema_no_uint() {
        let json_str = root_schema_json::<crate::mcp::types::FetchLogsResponse>();
        assert!(
            !json_str.contains("\"uint"),
            "FetchLogsResponse schema should not contain 'uint' format: {}",
            json_str
        );
    }

    #[test]
    fn test_host_list_response_schema_no_uint() {
        let json_str = root_schema_json::<crate::mcp::types::HostListResponse>();
        assert!(
            !json_str.contains("\"uint"),
            "HostListResponse schema should not contain 'uint' format: {}",
            json_str
        );
    }
}
