//! Message schema for the PushPlus API
//!
//! Candidate requests arrive as a [`MessageDraft`] whose template and channel
//! are still plain strings. [`MessageDraft::validate`] turns a draft into a
//! fully typed [`PushMessage`] or reports every violated field at once.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Longest title PushPlus accepts, in characters
pub const MAX_TITLE_CHARS: usize = 100;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{32}$").expect("token pattern is a valid regex"));

/// Check a credential against the PushPlus token format (32 ASCII alphanumerics)
pub fn is_valid_token(token: &str) -> bool {
    TOKEN_PATTERN.is_match(token)
}

/// Mask a credential for display: first 8 chars, `***`, last 4 chars
///
/// Short tokens produce overlapping slices; that is accepted.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let head: String = chars.iter().take(8).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}***{}", head, tail)
}

// ============================================================================
// Enumerations
// ============================================================================

/// A value did not name any known template or channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Content rendering mode applied by PushPlus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Template {
    #[default]
    Html,
    Txt,
    Json,
    Markdown,
    CloudMonitor,
    Jenkins,
    Route,
    Pay,
}

impl Template {
    pub const ALL: [Template; 8] = [
        Template::Html,
        Template::Txt,
        Template::Json,
        Template::Markdown,
        Template::CloudMonitor,
        Template::Jenkins,
        Template::Route,
        Template::Pay,
    ];

    /// Wire name sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Html => "html",
            Template::Txt => "txt",
            Template::Json => "json",
            Template::Markdown => "markdown",
            Template::CloudMonitor => "cloudMonitor",
            Template::Jenkins => "jenkins",
            Template::Route => "route",
            Template::Pay => "pay",
        }
    }

    /// Human label used in result banners
    pub fn label(&self) -> &'static str {
        match self {
            Template::Html => "HTML message",
            Template::Txt => "Text message",
            Template::Json => "JSON message",
            Template::Markdown => "Markdown message",
            Template::CloudMonitor => "Cloud monitor message",
            Template::Jenkins => "Jenkins message",
            Template::Route => "Route message",
            Template::Pay => "Payment message",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Html => "HTML content, supports tags and inline styles",
            Template::Txt => "Plain text, rendered as-is",
            Template::Json => "JSON content, suited to structured data",
            Template::Markdown => "Markdown content, supports Markdown syntax",
            Template::CloudMonitor => "Cloud monitoring format, suited to alerts",
            Template::Jenkins => "Jenkins build notification format",
            Template::Route => "Route notification format",
            Template::Pay => "Payment notification format",
        }
    }

    pub fn example(&self) -> Option<&'static str> {
        match self {
            Template::Html => Some("<h1>Title</h1><p>Body</p>"),
            Template::Txt => Some("Title\nBody"),
            Template::Json => Some(r#"{"title": "Title", "content": "Body"}"#),
            Template::Markdown => Some("# Title\n\nBody"),
            Template::CloudMonitor => Some("Alert: server CPU usage too high"),
            Template::Jenkins | Template::Route | Template::Pay => None,
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "template",
                value: s.to_string(),
                expected: join_names(Template::ALL.iter().map(Template::as_str)),
            })
    }
}

/// Delivery medium used by PushPlus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    #[default]
    Wechat,
    Webhook,
    Cp,
    Mail,
    Sms,
    Voice,
    Extension,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Wechat,
        Channel::Webhook,
        Channel::Cp,
        Channel::Mail,
        Channel::Sms,
        Channel::Voice,
        Channel::Extension,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Wechat => "wechat",
            Channel::Webhook => "webhook",
            Channel::Cp => "cp",
            Channel::Mail => "mail",
            Channel::Sms => "sms",
            Channel::Voice => "voice",
            Channel::Extension => "extension",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Channel::Wechat => "WeChat official account push",
            Channel::Webhook => "Third-party webhook push",
            Channel::Cp => "WeCom (enterprise WeChat) push",
            Channel::Mail => "Email push",
            Channel::Sms => "SMS push",
            Channel::Voice => "Voice call push",
            Channel::Extension => "Browser extension push",
        }
    }

    /// Setup the account needs before this channel can deliver
    pub fn note(&self) -> Option<&'static str> {
        match self {
            Channel::Cp => Some("requires a configured WeCom application"),
            Channel::Mail => Some("requires a bound email address"),
            Channel::Sms | Channel::Voice => Some("requires a bound phone number"),
            Channel::Wechat | Channel::Webhook | Channel::Extension => None,
        }
    }

    /// Whether messages on this channel must carry a webhook URL
    pub fn requires_webhook(&self) -> bool {
        matches!(self, Channel::Webhook)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "channel",
                value: s.to_string(),
                expected: join_names(Channel::ALL.iter().map(Channel::as_str)),
            })
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

// ============================================================================
// Validation Errors
// ============================================================================

/// One violated rule, qualified by the wire field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: String,
    pub reason: String,
}

impl FieldViolation {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Every rule a candidate request broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Field paths in the order they were checked
    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.path.as_str()).collect()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Push Request
// ============================================================================

/// A send request as supplied by a caller, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub token: Option<String>,
    pub title: String,
    pub content: String,
    pub topic: Option<String>,
    pub template: Option<String>,
    pub channel: Option<String>,
    pub to: Option<String>,
    pub pre: Option<String>,
    pub webhook: Option<String>,
    pub callback_url: Option<String>,
    pub timestamp: Option<i64>,
}

impl MessageDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Check every rule and build the outbound payload
    ///
    /// Absent template and channel fall back to `html` and `wechat`.
    pub fn validate(&self) -> Result<PushMessage, ValidationErrors> {
        let mut violations = Vec::new();

        let token = self.token.clone().unwrap_or_default();
        if token.trim().is_empty() {
            violations.push(FieldViolation::new("token", "token is required"));
        }

        // Title and content may be blank; PushPlus decides what to do with them
        if self.title.chars().count() > MAX_TITLE_CHARS {
            violations.push(FieldViolation::new(
                "title",
                format!("title must be at most {} characters", MAX_TITLE_CHARS),
            ));
        }

        let template: Option<Template> =
            parse_or_default("template", self.template.as_deref(), &mut violations);
        let channel: Option<Channel> =
            parse_or_default("channel", self.channel.as_deref(), &mut violations);

        match self.webhook.as_deref() {
            Some(url) => check_url("webhook", url, &mut violations),
            None if channel.is_some_and(|c| c.requires_webhook()) => {
                violations.push(FieldViolation::new(
                    "webhook",
                    "webhook is required when channel is webhook",
                ));
            }
            None => {}
        }

        if let Some(url) = self.callback_url.as_deref() {
            check_url("callbackUrl", url, &mut violations);
        }

        ValidationErrors(violations).into_result(|| PushMessage {
            token,
            title: self.title.clone(),
            content: self.content.clone(),
            topic: self.topic.clone(),
            template: template.unwrap_or_default(),
            channel: channel.unwrap_or_default(),
            to: self.to.clone(),
            pre: self.pre.clone(),
            webhook: self.webhook.clone(),
            callback_url: self.callback_url.clone(),
            timestamp: self.timestamp,
        })
    }
}

/// Parse an optional enumerated field; `None` in the result means invalid
fn parse_or_default<T>(
    path: &str,
    raw: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<T>
where
    T: FromStr<Err = UnknownVariant> + Default,
{
    match raw {
        None => Some(T::default()),
        Some(value) => match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                violations.push(FieldViolation::new(path, e.to_string()));
                None
            }
        },
    }
}

fn check_url(path: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => violations.push(FieldViolation::new(
            path,
            format!("unsupported URL scheme '{}'", url.scheme()),
        )),
        Err(e) => violations.push(FieldViolation::new(path, format!("invalid URL: {}", e))),
    }
}

/// A validated send payload, serialized as the PushPlus `send` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub template: Template,
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

// ============================================================================
// Status Query
// ============================================================================

/// A validated status query, serialized as the PushPlus `query` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub token: String,
    pub message_id: String,
}

impl StatusQuery {
    pub fn validate(token: &str, message_id: &str) -> Result<Self, ValidationErrors> {
        let mut violations = Vec::new();
        if token.trim().is_empty() {
            violations.push(FieldViolation::new("token", "token is required"));
        }
        if message_id.trim().is_empty() {
            violations.push(FieldViolation::new("messageId", "messageId is required"));
        }
        ValidationErrors(violations).into_result(|| StatusQuery {
            token: token.to_string(),
            message_id: message_id.to_string(),
        })
    }
}

// ============================================================================
// Push Response
// ============================================================================

/// Normalized reply of the `send` and `query` endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushResponse {
    pub code: i64,
    pub msg: String,
    /// Tracking identifier (serial) of the message
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
}

impl PushResponse {
    /// Code 200 is the only application-level success
    pub fn is_success(&self) -> bool {
        self.code == 200
    }

    pub fn serial(&self) -> Option<&str> {
        self.data.as_deref().filter(|s| !s.is_empty())
    }

    pub fn count_or_zero(&self) -> i64 {
        self.count.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0123456789abcdefABCDEF0123456789";

    fn draft() -> MessageDraft {
        MessageDraft {
            token: Some(TOKEN.to_string()),
            ..MessageDraft::new("Deploy finished", "All services healthy")
        }
    }

    #[test]
    fn test_every_template_and_channel_is_accepted() {
        for template in Template::ALL {
            for channel in Channel::ALL {
                let mut d = draft();
                d.template = Some(template.as_str().to_string());
                d.channel = Some(channel.as_str().to_string());
                if channel.requires_webhook() {
                    d.webhook = Some("https://hooks.example.com/notify".to_string());
                }
                let msg = d.validate().unwrap();
                assert_eq!(msg.template, template);
                assert_eq!(msg.channel, channel);
            }
        }
    }

    #[test]
    fn test_unknown_template_and_channel_are_rejected() {
        let mut d = draft();
        d.template = Some("pdf".to_string());
        d.channel = Some("Wechat".to_string());
        let err = d.validate().unwrap_err();
        assert_eq!(err.paths(), vec!["template", "channel"]);
        assert!(err.to_string().contains("template: unknown template 'pdf'"));
        assert!(err.to_string().contains("channel: unknown channel 'Wechat'"));
    }

    #[test]
    fn test_defaults_when_template_and_channel_absent() {
        let msg = draft().validate().unwrap();
        assert_eq!(msg.template, Template::Html);
        assert_eq!(msg.channel, Channel::Wechat);
    }

    #[test]
    fn test_webhook_channel_requires_url() {
        let mut d = draft();
        d.channel = Some("webhook".to_string());
        let err = d.validate().unwrap_err();
        assert_eq!(err.paths(), vec!["webhook"]);

        d.webhook = Some("not a url".to_string());
        let err = d.validate().unwrap_err();
        assert_eq!(err.paths(), vec!["webhook"]);
        assert!(err.violations()[0].reason.starts_with("invalid URL"));

        d.webhook = Some("https://hooks.example.com/notify".to_string());
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_webhook_not_required_for_other_channels() {
        for channel in Channel::ALL.into_iter().filter(|c| !c.requires_webhook()) {
            let mut d = draft();
            d.channel = Some(channel.to_string());
            assert!(d.validate().is_ok(), "{} should not need a webhook", channel);
        }
    }

    #[test]
    fn test_all_violations_are_reported() {
        let d = MessageDraft {
            title: "x".repeat(MAX_TITLE_CHARS + 1),
            content: String::new(),
            callback_url: Some("ftp://example.com/cb".to_string()),
            ..Default::default()
        };
        let err = d.validate().unwrap_err();
        assert_eq!(err.paths(), vec!["token", "title", "callbackUrl"]);
    }

    #[test]
    fn test_blank_title_and_content_pass_through() {
        for (title, content) in [("", ""), (" ", " "), ("Deploy", "")] {
            let mut d = draft();
            d.title = title.to_string();
            d.content = content.to_string();
            let msg = d.validate().unwrap();
            assert_eq!(msg.title, title);
            assert_eq!(msg.content, content);
        }
    }

    #[test]
    fn test_title_limit_counts_characters() {
        let mut d = draft();
        d.title = "通".repeat(MAX_TITLE_CHARS);
        assert!(d.validate().is_ok());
        d.title.push('知');
        assert_eq!(d.validate().unwrap_err().paths(), vec!["title"]);
    }

    #[test]
    fn test_payload_wire_format() {
        let mut d = draft();
        d.template = Some("cloudMonitor".to_string());
        d.callback_url = Some("https://example.com/cb".to_string());
        d.timestamp = Some(1_700_000_000_000);
        let body = serde_json::to_value(d.validate().unwrap()).unwrap();

        assert_eq!(body["template"], "cloudMonitor");
        assert_eq!(body["channel"], "wechat");
        assert_eq!(body["callbackUrl"], "https://example.com/cb");
        assert_eq!(body["timestamp"], 1_700_000_000_000_i64);
        assert!(body.get("topic").is_none());
        assert!(body.get("webhook").is_none());
    }

    #[test]
    fn test_status_query_validation() {
        let q = StatusQuery::validate(TOKEN, "abc123").unwrap();
        let body = serde_json::to_value(&q).unwrap();
        assert_eq!(body["messageId"], "abc123");

        let err = StatusQuery::validate("", " ").unwrap_err();
        assert_eq!(err.paths(), vec!["token", "messageId"]);
    }

    #[test]
    fn test_is_valid_token() {
        assert!(is_valid_token(TOKEN));
        assert!(!is_valid_token(&TOKEN[..31]));
        assert!(!is_valid_token(&format!("{}a", TOKEN)));
        assert!(!is_valid_token("0123456789abcdefABCDEF012345678-"));
        assert!(!is_valid_token("0123456789abcdefABCDEF01234567 9"));
        assert!(!is_valid_token(""));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(TOKEN), "01234567***6789");
        assert_eq!(mask_token("AB12cdef99990000zzzzCD34"), "AB12cdef***CD34");
        // overlapping slices for short credentials
        assert_eq!(mask_token("abcdef"), "abcdef***cdef");
    }

    #[test]
    fn test_response_shape_defaults() {
        let resp: PushResponse = serde_json::from_str(r#"{"code":400,"msg":"bad token"}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.serial(), None);
        assert_eq!(resp.count_or_zero(), 0);

        let resp: PushResponse =
            serde_json::from_str(r#"{"code":200,"msg":"ok","data":null,"count":null}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.serial(), None);

        assert!(serde_json::from_str::<PushResponse>(r#"{"msg":"ok"}"#).is_err());
        assert!(serde_json::from_str::<PushResponse>(r#"{"code":"200","msg":"ok"}"#).is_err());
    }
}
