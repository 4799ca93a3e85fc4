//! PushPlus HTTP client
//!
//! Each send or query is exactly one POST with a JSON body. Network, HTTP
//! status and body-shape problems become [`PushError`]s. A well-formed reply
//! carrying a non-200 application code is returned as a normal value.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, DEFAULT_API_BASE};
use crate::schema::{self, MessageDraft, PushResponse, StatusQuery, Template, ValidationErrors};

const USER_AGENT: &str = concat!("PushPlus-MCP-Server/", env!("CARGO_PKG_VERSION"));

/// Failures of a send or query exchange
#[derive(Debug, Error)]
pub enum PushError {
    /// No token with the call and no default on the client
    #[error("missing PushPlus token: pass one with the request or set a default token")]
    MissingCredential,

    #[error("parameter validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The HTTP exchange itself did not complete
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP request failed: {status}")]
    HttpStatus { status: StatusCode },

    /// The body was not a PushPlus response
    #[error("unexpected response body: {0}")]
    ResponseShape(#[from] serde_json::Error),
}

/// Everything a templated send accepts besides title and content
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub token: Option<String>,
    pub topic: Option<String>,
    pub channel: Option<String>,
    pub to: Option<String>,
    pub pre: Option<String>,
    pub webhook: Option<String>,
    pub callback_url: Option<String>,
    pub timestamp: Option<i64>,
}

impl SendOptions {
    fn into_draft(self, template: Template, title: String, content: String) -> MessageDraft {
        MessageDraft {
            token: self.token,
            title,
            content,
            topic: self.topic,
            template: Some(template.as_str().to_string()),
            channel: self.channel,
            to: self.to,
            pre: self.pre,
            webhook: self.webhook,
            callback_url: self.callback_url,
            timestamp: self.timestamp,
        }
    }
}

/// Client for the PushPlus `send` and `query` endpoints
///
/// Cheap to clone; clones share the HTTP connection pool and the default token.
#[derive(Clone)]
pub struct PushPlusClient {
    http: Client,
    send_url: String,
    query_url: String,
    default_token: Arc<RwLock<Option<String>>>,
}

impl PushPlusClient {
    /// Client for the public PushPlus API
    pub fn new(default_token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, default_token)
    }

    pub fn with_base_url(base_url: &str, default_token: Option<String>) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            http: Client::new(),
            send_url: format!("{}/send", base),
            query_url: format!("{}/query", base),
            default_token: Arc::new(RwLock::new(non_empty(default_token))),
        }
    }

    /// Client pointed at the configured API with the configured token as default
    pub fn from_config(config: &Config) -> Self {
        Self::with_base_url(&config.api_base, Some(config.token.clone()))
    }

    /// Send a message
    ///
    /// The draft's token wins over the client default. Template and channel
    /// fall back to `html` and `wechat`.
    pub async fn send(&self, mut draft: MessageDraft) -> Result<PushResponse, PushError> {
        draft.token = Some(self.resolve_token(draft.token.take())?);
        let message = draft.validate()?;

        tracing::debug!(
            template = %message.template,
            channel = %message.channel,
            topic = message.topic.as_deref().unwrap_or("-"),
            "Sending PushPlus message"
        );

        self.post(&self.send_url, &message).await
    }

    /// Ask PushPlus about a previously sent message by its serial
    pub async fn query(
        &self,
        message_id: &str,
        token: Option<String>,
    ) -> Result<PushResponse, PushError> {
        let token = self.resolve_token(token)?;
        let query = StatusQuery::validate(&token, message_id)?;

        tracing::debug!(message_id, "Querying PushPlus message status");

        self.post(&self.query_url, &query).await
    }

    /// Send with a fixed template; the options cannot override it
    pub async fn send_with_template(
        &self,
        template: Template,
        title: impl Into<String>,
        content: impl Into<String>,
        options: SendOptions,
    ) -> Result<PushResponse, PushError> {
        self.send(options.into_draft(template, title.into(), content.into()))
            .await
    }

    pub async fn send_text(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        options: SendOptions,
    ) -> Result<PushResponse, PushError> {
        self.send_with_template(Template::Txt, title, content, options)
            .await
    }

    pub async fn send_html(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        options: SendOptions,
    ) -> Result<PushResponse, PushError> {
        self.send_with_template(Template::Html, title, content, options)
            .await
    }

    pub async fn send_markdown(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        options: SendOptions,
    ) -> Result<PushResponse, PushError> {
        self.send_with_template(Template::Markdown, title, content, options)
            .await
    }

    pub async fn send_json(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        options: SendOptions,
    ) -> Result<PushResponse, PushError> {
        self.send_with_template(Template::Json, title, content, options)
            .await
    }

    pub fn set_default_token(&self, token: impl Into<String>) {
        let mut guard = self
            .default_token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = non_empty(Some(token.into()));
    }

    /// Default token as `first8***last4`, or `not set`
    pub fn masked_default_token(&self) -> String {
        match self.default_token() {
            Some(token) => schema::mask_token(&token),
            None => "not set".to_string(),
        }
    }

    /// Check a token against the PushPlus format (32 ASCII alphanumerics)
    pub fn is_valid_token(token: &str) -> bool {
        schema::is_valid_token(token)
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    fn default_token(&self) -> Option<String> {
        self.default_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve_token(&self, explicit: Option<String>) -> Result<String, PushError> {
        non_empty(explicit)
            .or_else(|| self.default_token())
            .ok_or(PushError::MissingCredential)
    }

    async fn post<T: Serialize>(&self, url: &str, body: &T) -> Result<PushResponse, PushError> {
        let response = self
            .http
            .post(url)
            .header(header::USER_AGENT, USER_AGENT)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("PushPlus request to {} failed: {}", url, e);
                PushError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("PushPlus returned HTTP {} for {}", status, url);
            return Err(PushError::HttpStatus { status });
        }

        let body = response.bytes().await?;
        let parsed: PushResponse = serde_json::from_slice(&body)?;

        tracing::debug!(code = parsed.code, "PushPlus responded: {}", parsed.msg);
        Ok(parsed)
    }
}

fn non_empty(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
