//! Application configuration structures.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Source page and HTTP settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Markup anchors used to find posts
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Polling loop settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Message rendering and delivery settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.url)
            .map_err(|e| AppError::validation(format!("source.url is invalid: {e}")))?;
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.extractor.anchor_text.trim().is_empty() {
            return Err(AppError::validation("extractor.anchor_text is empty"));
        }
        if self.scheduler.interval_secs == 0 {
            return Err(AppError::validation("scheduler.interval_secs must be > 0"));
        }
        if self.notifier.send_timeout_secs == 0 {
            return Err(AppError::validation(
                "notifier.send_timeout_secs must be > 0",
            ));
        }
        if self.notifier.max_message_length == 0 {
            return Err(AppError::validation(
                "notifier.max_message_length must be > 0",
            ));
        }
        if self.notifier.command_prefix.is_empty() {
            return Err(AppError::validation("notifier.command_prefix is empty"));
        }
        Ok(())
    }
}

/// Source page and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Page listing the curated links
    #[serde(default = "defaults::source_url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::source_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// CSS selectors and text anchors for post extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Selector for the anchor element that precedes the post list
    #[serde(default = "defaults::anchor_selector")]
    pub anchor_selector: String,

    /// Text fragment the anchor element must contain
    #[serde(default = "defaults::anchor_text")]
    pub anchor_text: String,

    /// Selector for each post card
    #[serde(default = "defaults::card_selector")]
    pub card_selector: String,

    /// Selector for the title link within a card
    #[serde(default = "defaults::title_selector")]
    pub title_selector: String,

    /// Selector for the metadata block within a card
    #[serde(default = "defaults::meta_selector")]
    pub meta_selector: String,

    /// Selector for the discussion link within the metadata block
    #[serde(default = "defaults::comments_selector")]
    pub comments_selector: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            anchor_selector: defaults::anchor_selector(),
            anchor_text: defaults::anchor_text(),
            card_selector: defaults::card_selector(),
            title_selector: defaults::title_selector(),
            meta_selector: defaults::meta_selector(),
            comments_selector: defaults::comments_selector(),
        }
    }
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Pause between the end of one cycle and the start of the next
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

/// Message rendering and delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Links on this domain are sent without the discussion link
    #[serde(default = "defaults::primary_domain")]
    pub primary_domain: String,

    /// Maximum message length in graphemes
    #[serde(default = "defaults::max_message_length")]
    pub max_message_length: usize,

    /// Base URL of the Discord REST API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Timeout for a single outbound message in seconds
    #[serde(default = "defaults::send_timeout")]
    pub send_timeout_secs: u64,

    /// Prefix for console commands
    #[serde(default = "defaults::command_prefix")]
    pub command_prefix: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            primary_domain: defaults::primary_domain(),
            max_message_length: defaults::max_message_length(),
            api_base: defaults::api_base(),
            send_timeout_secs: defaults::send_timeout(),
            command_prefix: defaults::command_prefix(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Credentials for the notification platform.
///
/// Read once at startup from `DISCORD_TOKEN` and `CHANNEL_ID`.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub channel_id: u64,
}

impl Credentials {
    pub const TOKEN_VAR: &'static str = "DISCORD_TOKEN";
    pub const CHANNEL_VAR: &'static str = "CHANNEL_ID";

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read credentials through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(Self::TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::config(format!("{} is not set", Self::TOKEN_VAR)))?;

        let raw_channel = lookup(Self::CHANNEL_VAR)
            .ok_or_else(|| AppError::config(format!("{} is not set", Self::CHANNEL_VAR)))?;
        let channel_id = raw_channel.trim().parse::<u64>().map_err(|e| {
            AppError::config(format!(
                "{} must be a numeric id, got '{}': {}",
                Self::CHANNEL_VAR,
                raw_channel,
                e
            ))
        })?;

        Ok(Self { token, channel_id })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

mod defaults {
    pub fn source_url() -> String {
        "https://histre.com/hn/?tags=+ai".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn anchor_selector() -> String {
        "div.text-muted".into()
    }
    pub fn anchor_text() -> String {
        "Provide comma".into()
    }
    pub fn card_selector() -> String {
        "div.card".into()
    }
    pub fn title_selector() -> String {
        "a.fs-3".into()
    }
    pub fn meta_selector() -> String {
        "div.text-muted".into()
    }
    pub fn comments_selector() -> String {
        "a".into()
    }

    pub fn interval() -> u64 {
        900
    }

    pub fn primary_domain() -> String {
        "ycombinator.com".into()
    }
    pub fn max_message_length() -> usize {
        2000
    }
    pub fn api_base() -> String {
        "https://discord.com/api/v10".into()
    }
    pub fn send_timeout() -> u64 {
        15
    }
    pub fn command_prefix() -> String {
        "!".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
