//! In-process tool invocation
//!
//! [`EmbeddableMcp`] lets a host (or a test) call a server's tools directly
//! by name with JSON arguments, skipping the stdio transport entirely.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let result = server
//!     .call_tool("send_text_message", serde_json::json!({ "title": "hi", "content": "there" }))
//!     .await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Errors raised before or around an in-process tool call
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments did not deserialize into the tool's parameter type
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// The tool returned a protocol-level error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server whose tools can be called without a transport
///
/// Servers built on rmcp's `#[tool_router]` typically answer `list_tools`
/// from their router and dispatch `call_tool` with a `match` on the name.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used to identify the server in host configuration
    fn server_name(&self) -> &str;

    /// All tools with their names, descriptions and input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Invoke a tool by name; `params` must be a JSON object
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoServer;

    #[async_trait]
    impl EmbeddableMcp for EchoServer {
        fn server_name(&self) -> &str {
            "echo"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
            match name {
                "echo" => {
                    let text: String = serde_json::from_value(params)?;
                    Ok(crate::text_success(text))
                }
                _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_call_known_tool() {
        let result = EchoServer
            .call_tool("echo", serde_json::json!("hello"))
            .await
            .unwrap();
        assert_eq!(crate::text_of(&result), "hello");
        assert!(EchoServer.server_description().is_none());
    }

    #[tokio::test]
    async fn test_bad_params_are_reported() {
        let result = EchoServer.call_tool("echo", serde_json::json!(42)).await;
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let result = EchoServer.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }
}
