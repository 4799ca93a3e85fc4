//! Read-only MCP resources: server status and the template/channel catalogs

use mcp_common::{json_text, McpError};
use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};
use serde_json::{json, Value};

use crate::client::PushPlusClient;
use crate::config::Config;
use crate::schema::{Channel, Template};

pub const STATUS_URI: &str = "pushplus://status";
pub const TEMPLATES_URI: &str = "pushplus://templates";
pub const CHANNELS_URI: &str = "pushplus://channels";

const JSON_MIME: &str = "application/json";

/// All resources the server advertises
pub fn list() -> Vec<Resource> {
    [
        (STATUS_URI, "server_status", "Server status and configuration summary"),
        (TEMPLATES_URI, "templates", "Message templates supported by PushPlus"),
        (CHANNELS_URI, "channels", "Delivery channels supported by PushPlus"),
    ]
    .into_iter()
    .map(|(uri, name, description)| {
        let mut raw = RawResource::new(uri, name);
        raw.description = Some(description.to_string());
        raw.mime_type = Some(JSON_MIME.to_string());
        raw.no_annotation()
    })
    .collect()
}

/// Resolve a resource URI to its current JSON document
pub fn read(uri: &str, config: &Config, client: &PushPlusClient) -> Result<ReadResourceResult, McpError> {
    let document = match uri {
        STATUS_URI => status_snapshot(config, client),
        TEMPLATES_URI => template_catalog(),
        CHANNELS_URI => channel_catalog(config.default_channel),
        _ => {
            return Err(McpError::resource_not_found(
                format!("unknown resource: {}", uri),
                Some(json!({ "uri": uri })),
            ))
        }
    };

    let text = json_text(&document).map_err(|e| McpError::internal_error(e.to_string(), None))?;

    let mut contents = ResourceContents::text(text, uri);
    if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
        *mime_type = Some(JSON_MIME.to_string());
    }

    Ok(ReadResourceResult {
        contents: vec![contents],
    })
}

/// Snapshot of the running server; the token is always masked
pub fn status_snapshot(config: &Config, client: &PushPlusClient) -> Value {
    json!({
        "server": {
            "name": config.server_name,
            "version": config.server_version,
            "status": "running",
        },
        "pushplus": {
            "token": client.masked_default_token(),
            "api_endpoint": client.send_url(),
        },
        "config": {
            "default_template": config.default_template,
            "default_channel": config.default_channel,
            "debug_mode": config.debug,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
}

pub fn template_catalog() -> Value {
    let templates: Vec<Value> = Template::ALL
        .into_iter()
        .map(|t| {
            let mut entry = json!({
                "name": t.as_str(),
                "description": t.description(),
            });
            if let Some(example) = t.example() {
                entry["example"] = json!(example);
            }
            entry
        })
        .collect();

    json!({ "templates": templates })
}

pub fn channel_catalog(default_channel: Channel) -> Value {
    let channels: Vec<Value> = Channel::ALL
        .into_iter()
        .map(|c| {
            let mut entry = json!({
                "name": c.as_str(),
                "description": c.description(),
                "default": c == default_channel,
            });
            if c.requires_webhook() {
                entry["requires"] = json!(["webhook"]);
            }
            if let Some(note) = c.note() {
                entry["note"] = json!(note);
            }
            entry
        })
        .collect();

    json!({ "channels": channels })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0123456789abcdefABCDEF0123456789";

    fn text_of(result: &ReadResourceResult) -> String {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, mime_type, .. } => {
                assert_eq!(mime_type.as_deref(), Some(JSON_MIME));
                text.clone()
            }
            _ => panic!("expected text contents"),
        }
    }

    #[test]
    fn test_list_advertises_three_resources() {
        let uris: Vec<String> = list().iter().map(|r| r.raw.uri.clone()).collect();
        assert_eq!(uris, vec![STATUS_URI, TEMPLATES_URI, CHANNELS_URI]);
    }

    #[test]
    fn test_status_masks_token() {
        let config = Config {
            token: TOKEN.to_string(),
            ..Config::default()
        };
        let client = PushPlusClient::from_config(&config);
        let text = text_of(&read(STATUS_URI, &config, &client).unwrap());

        assert!(text.contains("01234567***6789"));
        assert!(!text.contains(TOKEN));

        let status: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(status["server"]["name"], "pushplus-mcp-server");
        assert_eq!(status["pushplus"]["api_endpoint"], "https://www.pushplus.plus/send");
        assert_eq!(status["config"]["default_template"], "html");
        assert_eq!(status["config"]["default_channel"], "wechat");
    }

    #[test]
    fn test_template_catalog_lists_every_template() {
        let catalog = template_catalog();
        let names: Vec<&str> = catalog["templates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["html", "txt", "json", "markdown", "cloudMonitor", "jenkins", "route", "pay"]
        );
        assert!(catalog["templates"][5].get("example").is_none());
    }

    #[test]
    fn test_channel_catalog_marks_default_and_webhook() {
        let catalog = channel_catalog(Channel::Mail);
        let channels = catalog["channels"].as_array().unwrap();
        assert_eq!(channels.len(), Channel::ALL.len());

        let webhook = channels.iter().find(|c| c["name"] == "webhook").unwrap();
        assert_eq!(webhook["requires"], json!(["webhook"]));

        let defaults: Vec<&str> = channels
            .iter()
            .filter(|c| c["default"] == true)
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(defaults, vec!["mail"]);
    }

    #[test]
    fn test_unknown_uri_is_rejected() {
        let config = Config::default();
        let client = PushPlusClient::from_config(&config);
        assert!(read("pushplus://history", &config, &client).is_err());
    }
}
