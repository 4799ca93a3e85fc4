//! Parameter types for PushPlus MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendPushParams {
    #[schemars(description = "Message title (at most 100 characters)")]
    pub title: String,

    #[schemars(description = "Message content, rendered according to the template (HTML, text, Markdown, ...)")]
    pub content: String,

    #[schemars(
        description = "Message template: html, txt, json, markdown, cloudMonitor, jenkins, route or pay (default from server configuration)"
    )]
    #[serde(default)]
    pub template: Option<String>,

    #[schemars(
        description = "Delivery channel: wechat, webhook, cp, mail, sms, voice or extension (default from server configuration)"
    )]
    #[serde(default)]
    pub channel: Option<String>,

    #[schemars(description = "Group code; leave empty to send only to yourself")]
    #[serde(default)]
    pub topic: Option<String>,

    #[schemars(
        description = "Recipients: friend tokens for WeChat, user ids for WeCom; comma-separated for several"
    )]
    #[serde(default)]
    pub to: Option<String>,

    #[schemars(description = "Preprocessing code (members only), rewrites the content before delivery")]
    #[serde(default)]
    pub pre: Option<String>,

    #[schemars(description = "Third-party webhook URL (required when channel is webhook)")]
    #[serde(default)]
    pub webhook: Option<String>,

    #[schemars(description = "Callback URL notified with the delivery result")]
    #[serde(default, alias = "callback_url")]
    pub callback_url: Option<String>,
}

/// Input of the fixed-template send tools
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuickSendParams {
    #[schemars(description = "Message title (at most 100 characters)")]
    pub title: String,

    #[schemars(description = "Message content")]
    pub content: String,

    #[schemars(description = "Group code; leave empty to send only to yourself")]
    #[serde(default)]
    pub topic: Option<String>,

    #[schemars(description = "Recipient friend tokens, comma-separated for several")]
    #[serde(default)]
    pub to: Option<String>,

    #[schemars(description = "Preprocessing code (members only)")]
    #[serde(default)]
    pub pre: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryStatusParams {
    #[schemars(description = "Serial number returned by a previous send")]
    #[serde(alias = "message_id")]
    pub message_id: String,
}
