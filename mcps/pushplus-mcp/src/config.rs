//! Configuration loading for pushplus-mcp
//!
//! Configuration is resolved once at startup from, lowest priority first:
//! 1. Built-in defaults
//! 2. TOML file at `PUSHPLUS_CONFIG_PATH`, or `./pushplus-mcp.toml`
//! 3. Environment variables (a `.env` file in the working directory is loaded
//!    into the environment first, without overriding existing variables)

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::schema::{is_valid_token, mask_token, Channel, Template, UnknownVariant};

pub const DEFAULT_API_BASE: &str = "https://www.pushplus.plus";
pub const DEFAULT_SERVER_NAME: &str = "pushplus-mcp-server";
pub const DEFAULT_SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration errors, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid default: {0}")]
    UnknownDefault(#[from] UnknownVariant),

    #[error("configuration validation failed:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

/// Process-wide settings, immutable once loaded
#[derive(Clone)]
pub struct Config {
    /// PushPlus API token
    pub token: String,
    pub server_name: String,
    pub server_version: String,
    /// Template for `send_push_message` when the caller gives none
    pub default_template: Template,
    /// Channel for every send when the caller gives none
    pub default_channel: Channel,
    pub debug: bool,
    /// Base URL of the PushPlus API, without trailing slash
    pub api_base: String,
}

/// Shape of the optional TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    token: Option<String>,
    server_name: Option<String>,
    server_version: Option<String>,
    default_template: Option<String>,
    default_channel: Option<String>,
    debug: Option<bool>,
    api_base: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            server_name: DEFAULT_SERVER_NAME.to_string(),
            server_version: DEFAULT_SERVER_VERSION.to_string(),
            default_template: Template::default(),
            default_channel: Channel::default(),
            debug: false,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `.env`, the config file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let file = match Self::find_config_path() {
            Some(path) => {
                tracing::info!("Loading config from: {}", path.display());
                read_file(&path)?
            }
            None => FileConfig::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key source instead of the environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(FileConfig::default(), lookup)
    }

    fn find_config_path() -> Option<PathBuf> {
        // 1. Explicit path, even if missing, so a typo is reported
        if let Ok(path) = std::env::var("PUSHPLUS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Local file
        let local = PathBuf::from("pushplus-mcp.toml");
        local.exists().then_some(local)
    }

    fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, from_file: Option<String>| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .or(from_file)
                .filter(|v| !v.trim().is_empty())
        };

        let default_template = match pick("DEFAULT_TEMPLATE", file.default_template) {
            Some(raw) => raw.trim().parse()?,
            None => Template::default(),
        };
        let default_channel = match pick("DEFAULT_CHANNEL", file.default_channel) {
            Some(raw) => raw.trim().parse()?,
            None => Channel::default(),
        };

        let debug = match lookup("DEBUG") {
            Some(raw) => parse_flag(&raw),
            None => file.debug.unwrap_or(false),
        };

        let api_base = pick("PUSHPLUS_API_BASE", file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            token: pick("PUSHPLUS_TOKEN", file.token)
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
            server_name: pick("MCP_SERVER_NAME", file.server_name)
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            server_version: pick("MCP_SERVER_VERSION", file.server_version)
                .unwrap_or_else(|| DEFAULT_SERVER_VERSION.to_string()),
            default_template,
            default_channel,
            debug,
            api_base,
        })
    }

    /// Problems that prevent the server from starting
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.token.is_empty() {
            errors.push("missing PUSHPLUS_TOKEN environment variable".to_string());
        } else if !is_valid_token(&self.token) {
            errors.push(
                "PUSHPLUS_TOKEN is malformed, expected 32 alphanumeric characters".to_string(),
            );
        }

        errors
    }

    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    pub fn masked_token(&self) -> String {
        if self.token.is_empty() {
            "not set".to_string()
        } else {
            mask_token(&self.token)
        }
    }

    /// Multi-line, credential-safe description of the configuration
    pub fn summary(&self) -> String {
        format!(
            "PushPlus MCP Server configuration:\n\
             \x20  Server name:      {}\n\
             \x20  Server version:   {}\n\
             \x20  PushPlus token:   {}\n\
             \x20  API base:         {}\n\
             \x20  Default template: {}\n\
             \x20  Default channel:  {}\n\
             \x20  Debug mode:       {}",
            self.server_name,
            self.server_version,
            self.masked_token(),
            self.api_base,
            self.default_template,
            self.default_channel,
            if self.debug { "on" } else { "off" },
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.masked_token())
            .field("server_name", &self.server_name)
            .field("server_version", &self.server_version)
            .field("default_template", &self.default_template)
            .field("default_channel", &self.default_channel)
            .field("debug", &self.debug)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Whether `DEBUG` is set in the environment or `.env`
///
/// Lets the binary pick its log level before [`Config::load`] runs, so the
/// loading itself is logged.
pub fn debug_requested() -> bool {
    dotenvy::var("DEBUG")
        .map(|raw| parse_flag(&raw))
        .unwrap_or(false)
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
