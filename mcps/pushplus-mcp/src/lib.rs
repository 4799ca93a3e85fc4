//! PushPlus MCP Library
//!
//! Validated message relay to the PushPlus push service, with delivery
//! status queries and read-only catalog resources.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use pushplus_mcp::{Config, PushPlusMcpServer};
//!
//! let server = PushPlusMcpServer::new(Config::load()?);
//! // Use with in-memory transport or serve via stdio
//! ```
//!
//! The client can also be used without the MCP layer:
//!
//! ```rust,ignore
//! use pushplus_mcp::{PushPlusClient, SendOptions};
//!
//! let client = PushPlusClient::new(Some(token));
//! let response = client.send_markdown("Deploy", "**done**", SendOptions::default()).await?;
//! ```
//!
//! # Configuration
//! Set `PUSHPLUS_TOKEN`, or configure in `./pushplus-mcp.toml`.

pub mod client;
pub mod config;
pub mod handlers;
pub mod params;
pub mod resources;
pub mod schema;
pub mod server;

// Re-export main server type
pub use server::PushPlusMcpServer;

pub use client::{PushError, PushPlusClient, SendOptions};
pub use config::{Config, ConfigError};

// Re-export parameter types for direct API usage
pub use params::{QueryStatusParams, QuickSendParams, SendPushParams};
pub use schema::{
    Channel, FieldViolation, MessageDraft, PushMessage, PushResponse, Template, ValidationErrors,
};

pub use mcp_common::EmbeddableMcp;
