//! Tool handlers
//!
//! Each handler merges caller input with configured defaults, delegates to
//! the client, and renders the outcome with [`render_outcome`]. Handlers
//! never fail: every `PushError` becomes an error-flagged envelope.

use std::fmt::Write as _;

use mcp_common::{text_error, text_success, CallToolResult};

use crate::client::{PushError, PushPlusClient, SendOptions};
use crate::config::Config;
use crate::params::{QueryStatusParams, QuickSendParams, SendPushParams};
use crate::schema::{MessageDraft, PushResponse, Template};

/// The operation an outcome belongs to; picks the banner wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Send,
    Templated(Template),
    Query,
}

impl Operation {
    fn label(&self) -> &'static str {
        match self {
            Operation::Send => "Message",
            Operation::Templated(template) => template.label(),
            Operation::Query => "Status query",
        }
    }
}

// ============================================================================
// Envelope Formatting
// ============================================================================

/// Turn a client outcome into the uniform result envelope
///
/// A returned response never sets the error flag, whatever its code; only a
/// failed exchange does.
pub fn render_outcome(op: Operation, outcome: Result<PushResponse, PushError>) -> CallToolResult {
    match outcome {
        Ok(response) => {
            if response.is_success() {
                tracing::info!("{} accepted by PushPlus", op.label());
            } else {
                tracing::warn!(
                    code = response.code,
                    "{} rejected by PushPlus: {}",
                    op.label(),
                    response.msg
                );
            }
            text_success(render_response(op, &response))
        }
        Err(err) => {
            match err {
                PushError::MissingCredential | PushError::Validation(_) => {
                    tracing::info!("{} not sent: {}", op.label(), err)
                }
                _ => tracing::warn!("{} failed: {}", op.label(), err),
            }
            text_error(format!("❌ Request failed: {}", err))
        }
    }
}

/// Human-readable report of a well-formed PushPlus reply
pub fn render_response(op: Operation, response: &PushResponse) -> String {
    let banner = if response.is_success() {
        format!("✅ {} request succeeded", op.label())
    } else {
        format!("❌ {} request failed", op.label())
    };

    let mut text = format!(
        "{}\n\n📊 Response details:\n- Status code: {}\n- Message: {}",
        banner, response.code, response.msg
    );

    if let Some(serial) = response.serial() {
        let _ = write!(
            text,
            "\n- 📋 Serial (流水号): {} (important: use it to query the delivery status)",
            serial
        );
    }

    let _ = write!(text, "\n- Count: {}", response.count_or_zero());

    if response.is_success() && op != Operation::Query {
        text.push_str(
            "\n\n⚠️ Note: a successful HTTP request does not mean the message was delivered; \
             delivery may take some time.",
        );
    }

    text
}

// ============================================================================
// Handler Functions
// ============================================================================

pub async fn send_push_message(
    client: &PushPlusClient,
    config: &Config,
    params: SendPushParams,
) -> CallToolResult {
    let draft = MessageDraft {
        token: None,
        title: params.title,
        content: params.content,
        topic: params.topic,
        template: Some(
            params
                .template
                .unwrap_or_else(|| config.default_template.to_string()),
        ),
        channel: Some(
            params
                .channel
                .unwrap_or_else(|| config.default_channel.to_string()),
        ),
        to: params.to,
        pre: params.pre,
        webhook: params.webhook,
        callback_url: params.callback_url,
        timestamp: None,
    };

    render_outcome(Operation::Send, client.send(draft).await)
}

/// Shared body of the text/HTML/Markdown/JSON tools
///
/// No channel is sent, so the client default applies; these tools have no
/// way to carry the webhook URL a configured `webhook` channel would need.
pub async fn send_templated(
    client: &PushPlusClient,
    template: Template,
    params: QuickSendParams,
) -> CallToolResult {
    let options = SendOptions {
        topic: params.topic,
        to: params.to,
        pre: params.pre,
        ..Default::default()
    };

    let outcome = client
        .send_with_template(template, params.title, params.content, options)
        .await;

    render_outcome(Operation::Templated(template), outcome)
}

pub async fn query_message_status(
    client: &PushPlusClient,
    params: QueryStatusParams,
) -> CallToolResult {
    let outcome = client.query(&params.message_id, None).await;
    render_outcome(Operation::Query, outcome)
}
