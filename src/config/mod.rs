//! Configuration management for feedhook.
//!
//! Settings are read from an optional TOML file (by default
//! `~/.config/feedhook/config.toml`), then overridden by environment
//! variables. Per-run choices come from the command line and are resolved
//! into an immutable [`RunConfig`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::app::{FeedhookError, Result};

pub const WEBHOOK_URL_ENV: &str = "SLACK_WEBHOOK_URL";
pub const ACCESS_TOKEN_ENV: &str = "QIITA_ACCESS_TOKEN";
pub const MESSAGE_ENV: &str = "SLACK_MESSAGE";

pub const DEFAULT_API_BASE: &str = "https://qiita.com/api/v2";
pub const DEFAULT_MESSAGE: &str = "Hello from Qiita Slack Bot!";

/// File and environment backed settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Webhook endpoint that receives the message
    pub webhook_url: Option<String>,

    /// Base URL of the tag search API (default: Qiita API v2)
    pub api_base: String,

    /// Optional bearer token for the tag search API
    pub access_token: Option<String>,

    /// Message used in message mode when none is given on the command line
    pub default_message: Option<String>,

    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Heading printed above the feed entry
    pub feed_heading: Option<String>,

    pub retry: RetrySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: None,
            default_message: None,
            timeout_secs: 10,
            user_agent: concat!("feedhook/", env!("CARGO_PKG_VERSION")).to_string(),
            feed_heading: None,
            retry: RetrySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Delivery attempts before giving up (default: 3)
    pub max_attempts: u32,

    /// Pause between delivery attempts in milliseconds (default: 0)
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 0,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`,
    /// then apply environment overrides.
    ///
    /// A missing default file yields defaults. A missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };

        Ok(settings.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FeedhookError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| FeedhookError::ConfigFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/feedhook/config.toml` on Linux.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("feedhook").join("config.toml"))
    }

    /// Apply environment overrides. Empty values are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(WEBHOOK_URL_ENV) {
            self.webhook_url = Some(url);
        }
        if let Some(token) = get(ACCESS_TOKEN_ENV) {
            self.access_token = Some(token);
        }
        if let Some(message) = get(MESSAGE_ENV) {
            self.default_message = Some(message);
        }
        self
    }

    /// The configured webhook endpoint, or a config error when it is unset or blank.
    pub fn require_webhook_url(&self) -> Result<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| FeedhookError::Config(format!("{} is not set", WEBHOOK_URL_ENV)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which producer builds the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Message,
    Aggregate,
    Feed,
}

impl FromStr for Mode {
    type Err = FeedhookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "message" => Ok(Mode::Message),
            "aggregate" => Ok(Mode::Aggregate),
            "rss" | "feed" => Ok(Mode::Feed),
            other => Err(FeedhookError::Config(format!(
                "Unknown mode: {}. Use --help for usage information.",
                other
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Message => "message",
            Mode::Aggregate => "aggregate",
            Mode::Feed => "rss",
        };
        f.write_str(name)
    }
}

/// Unvalidated per-run arguments, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub mode: String,
    pub tag: String,
    pub pages: u32,
    pub feed_url: Option<String>,
    pub limit: u32,
    pub message: Option<String>,
}

/// Validated configuration for one run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    pub tag: String,
    pub max_pages: u32,
    pub feed_url: String,
    pub feed_limit: usize,
    pub message: String,
}

impl RunConfig {
    pub fn resolve(request: &RunRequest, settings: &Settings) -> Result<Self> {
        let mode: Mode = request.mode.parse()?;
        let tag = request.tag.trim().to_string();
        let feed_url = request
            .feed_url
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        match mode {
            Mode::Aggregate => {
                if request.pages < 1 {
                    return Err(FeedhookError::Config(
                        "pages must be at least 1".to_string(),
                    ));
                }
                if tag.is_empty() {
                    return Err(FeedhookError::Config(
                        "a tag is required in aggregate mode".to_string(),
                    ));
                }
            }
            Mode::Feed => {
                if request.limit < 1 {
                    return Err(FeedhookError::Config(
                        "limit must be at least 1".to_string(),
                    ));
                }
                if feed_url.is_empty() {
                    return Err(FeedhookError::Config(
                        "a feed URL (--rss) is required in rss mode".to_string(),
                    ));
                }
            }
            Mode::Message => {}
        }

        let message = request
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| settings.default_message.clone())
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        Ok(Self {
            mode,
            tag,
            max_pages: request.pages,
            feed_url,
            feed_limit: request.limit as usize,
            message,
        })
    }
}
