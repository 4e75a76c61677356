//! Configuration management for crossforge
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP API server
    pub server: ServerConfig,

    /// SQLite storage
    pub database: DatabaseConfig,

    /// YouTube Data API credentials
    pub youtube: YouTubeConfig,

    /// X API credentials
    pub x: XConfig,

    /// LinkedIn API credentials
    pub linkedin: LinkedInConfig,

    /// Ollama language model
    pub llm: LlmConfig,

    /// Background task intervals
    pub scheduler: SchedulerConfig,

    /// Dashboard listing limits and default window
    pub dashboard: DashboardConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

/// YouTube configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub channel_id: String,
}

impl YouTubeConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.channel_id.is_empty()
    }
}

/// X configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XConfig {
    pub bearer_token: String,
    pub user_id: String,
}

impl XConfig {
    pub fn is_configured(&self) -> bool {
        !self.bearer_token.is_empty() && !self.user_id.is_empty()
    }
}

/// LinkedIn configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    pub access_token: String,
    /// Member URN, e.g. `urn:li:person:abc123`
    pub person_urn: String,
}

impl LinkedInConfig {
    pub fn is_configured(&self) -> bool {
        !self.access_token.is_empty() && !self.person_urn.is_empty()
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub fetch_interval_minutes: u64,
    pub insight_interval_hours: u64,
    /// Content items requested per platform on each fetch
    pub max_items_per_fetch: usize,
    /// Window summarized by the insight job
    pub insight_window_days: u32,
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub recent_insights_limit: usize,
    pub top_content_limit: usize,
    pub default_window_days: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("./data/crossforge.db"),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("http://localhost:11434"),
            model: String::from("llama3"),
            timeout_secs: 30,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fetch_interval_minutes: 60,
            insight_interval_hours: 24,
            max_items_per_fetch: 50,
            insight_window_days: 7,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_insights_limit: 5,
            top_content_limit: 5,
            default_window_days: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value for {key}: {e}")),
        None => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path` when given, then let environment variables override
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overwrite fields that are set in the environment
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_string("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env_parse("SERVER_PORT")? {
            self.server.port = v;
        }
        if let Some(v) = env_string("DATABASE_PATH") {
            self.database.sqlite_path = PathBuf::from(v);
        }

        if let Some(v) = env_string("YOUTUBE_API_KEY") {
            self.youtube.api_key = v;
        }
        if let Some(v) = env_string("YOUTUBE_CHANNEL_ID") {
            self.youtube.channel_id = v;
        }
        if let Some(v) = env_string("X_BEARER_TOKEN") {
            self.x.bearer_token = v;
        }
        if let Some(v) = env_string("X_USER_ID") {
            self.x.user_id = v;
        }
        if let Some(v) = env_string("LINKEDIN_ACCESS_TOKEN") {
            self.linkedin.access_token = v;
        }
        if let Some(v) = env_string("LINKEDIN_PERSON_URN") {
            self.linkedin.person_urn = v;
        }

        if let Some(v) = env_string("LLM_ENDPOINT") {
            self.llm.endpoint = v;
        }
        if let Some(v) = env_string("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = env_parse("LLM_TIMEOUT_SECONDS")? {
            self.llm.timeout_secs = v;
        }

        if let Some(v) = env_parse("FETCH_INTERVAL_MINUTES")? {
            self.scheduler.fetch_interval_minutes = v;
        }
        if let Some(v) = env_parse("INSIGHT_INTERVAL_HOURS")? {
            self.scheduler.insight_interval_hours = v;
        }

        if let Some(v) = env_string("CROSSFORGE_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = env_string("CROSSFORGE_LOG_FORMAT") {
            self.logging.format = v;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }

        if self.scheduler.fetch_interval_minutes == 0 {
            anyhow::bail!("scheduler.fetch_interval_minutes must be greater than 0");
        }

        if self.scheduler.insight_interval_hours == 0 {
            anyhow::bail!("scheduler.insight_interval_hours must be greater than 0");
        }

        if self.scheduler.max_items_per_fetch == 0 {
            anyhow::bail!("scheduler.max_items_per_fetch must be greater than 0");
        }

        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be greater than 0");
        }

        if self.dashboard.default_window_days == 0 {
            anyhow::bail!("dashboard.default_window_days must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Interval between platform fetches
    #[must_use]
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.fetch_interval_minutes * 60)
    }

    /// Interval between insight generation runs
    #[must_use]
    pub fn insight_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.insight_interval_hours * 3600)
    }

    /// LLM request timeout
    #[must_use]
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs)
    }

    /// `host:port` the API server binds to
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
