//! MCP Server implementation for PushPlus notifications
//!
//! Tools delegate to the handlers module; resources to the resources module.

use std::sync::Arc;

use mcp_common::{async_trait, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Implementation, ListResourcesResult, PaginatedRequestParam,
        ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer,
};
use serde_json::Value;

use crate::client::PushPlusClient;
use crate::config::Config;
use crate::handlers;
use crate::params::*;
use crate::resources;
use crate::schema::Template;

const INSTRUCTIONS: &str = "PushPlus notification MCP server. Sends messages to WeChat, WeCom, \
     email, SMS, webhooks and more through PushPlus. A successful send returns a serial \
     number that query_message_status accepts. A result flagged as error means the request \
     never completed; a failure banner without the error flag means PushPlus received the \
     request and rejected it.";

/// The PushPlus MCP Server
#[derive(Clone)]
pub struct PushPlusMcpServer {
    client: PushPlusClient,
    config: Arc<Config>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl PushPlusMcpServer {
    /// Create a server whose client uses the configured API and token
    pub fn new(config: Config) -> Self {
        let client = PushPlusClient::from_config(&config);
        Self::with_client(config, client)
    }

    /// Create a server around an existing client
    pub fn with_client(config: Config, client: PushPlusClient) -> Self {
        Self {
            client,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    pub fn client(&self) -> &PushPlusClient {
        &self.client
    }

    #[tool(
        description = "Send a push message through PushPlus to WeChat, WeCom, email, SMS, webhook or other channels. Template and channel default to the server configuration."
    )]
    async fn send_push_message(
        &self,
        Parameters(params): Parameters<SendPushParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::send_push_message(&self.client, &self.config, params).await)
    }

    #[tool(description = "Send a plain text push message")]
    async fn send_text_message(
        &self,
        Parameters(params): Parameters<QuickSendParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::send_templated(&self.client, Template::Txt, params).await)
    }

    #[tool(description = "Send an HTML push message")]
    async fn send_html_message(
        &self,
        Parameters(params): Parameters<QuickSendParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::send_templated(&self.client, Template::Html, params).await)
    }

    #[tool(description = "Send a Markdown push message")]
    async fn send_markdown_message(
        &self,
        Parameters(params): Parameters<QuickSendParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::send_templated(&self.client, Template::Markdown, params).await)
    }

    #[tool(description = "Send a JSON push message")]
    async fn send_json_message(
        &self,
        Parameters(params): Parameters<QuickSendParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::send_templated(&self.client, Template::Json, params).await)
    }

    #[tool(description = "Query the delivery status of a sent message by its serial number")]
    async fn query_message_status(
        &self,
        Parameters(params): Parameters<QueryStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::query_message_status(&self.client, params).await)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
#[allow(deprecated)]
impl rmcp::ServerHandler for PushPlusMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.config.server_name.clone(),
                version: self.config.server_version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources::list())))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        std::future::ready(resources::read(&request.uri, &self.config, &self.client))
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for PushPlusMcpServer {
    fn server_name(&self) -> &str {
        "pushplus"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "send_push_message" => {
                let params: SendPushParams = serde_json::from_value(params)?;
                self.send_push_message(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "send_text_message" => {
                let params: QuickSendParams = serde_json::from_value(params)?;
                self.send_text_message(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "send_html_message" => {
                let params: QuickSendParams = serde_json::from_value(params)?;
                self.send_html_message(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "send_markdown_message" => {
                let params: QuickSendParams = serde_json::from_value(params)?;
                self.send_markdown_message(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "send_json_message" => {
                let params: QuickSendParams = serde_json::from_value(params)?;
                self.send_json_message(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "query_message_status" => {
                let params: QueryStatusParams = serde_json::from_value(params)?;
                self.query_message_status(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
