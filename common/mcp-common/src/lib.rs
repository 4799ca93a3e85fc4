//! MCP Common - shared plumbing for the MCP servers in this workspace
//!
//! - **Tracing**: [`init_tracing`] sets up stderr logging (stdout carries the protocol)
//! - **Results**: helpers for building `CallToolResult` envelopes
//! - **Embeddable**: [`EmbeddableMcp`] for calling a server's tools in-process
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{text_error, text_success};
//!
//! fn finish(outcome: Result<String, String>) -> CallToolResult {
//!     match outcome {
//!         Ok(text) => text_success(text),
//!         Err(reason) => text_error(format!("Request failed: {}", reason)),
//!     }
//! }
//! ```

pub mod embeddable;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use init::init_tracing;
pub use result::{is_error, json_text, text_error, text_of, text_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
