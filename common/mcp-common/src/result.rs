//! Result envelope helpers for MCP tool responses
//!
//! Every tool answers with a `CallToolResult`: a list of content items plus
//! an error flag. These helpers build and inspect the single-text variant.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Successful envelope carrying one text item (error flag clear)
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Failed envelope carrying one text item (error flag set)
///
/// Use this when the tool ran but could not do its job; protocol-level
/// problems should still be reported as `McpError`.
pub fn text_error(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// Pretty-print any serializable value as JSON text
pub fn json_text<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Whether the envelope has its error flag set
pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

/// Concatenated text of all text items in the envelope
pub fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}
