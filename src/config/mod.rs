//! Configuration loading and validation.
//!
//! Values come from an optional TOML file layered with environment variables
//! named `GUILD_BOARD__<SECTION>__<KEY>` (for example
//! `GUILD_BOARD__ADMIN__PASSWORD`). Every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculate::ScoringPolicy;
use crate::query::DEFAULT_PAGE_SIZE;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GUILD_BOARD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// The guild whose statistics are tracked, and who it plays against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildConfig {
    #[serde(default = "default_home_guild")]
    pub home_guild: String,

    /// Opposing guilds with a head-to-head breakdown
    #[serde(default = "default_rivals")]
    pub rivals: Vec<String>,

    /// Twitch logins shown on the streams page
    #[serde(default)]
    pub streamers: Vec<String>,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_home_guild() -> String {
    "Manifest".to_string()
}

fn default_rivals() -> Vec<String> {
    vec!["Guilty".to_string(), "Allyance".to_string()]
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            home_guild: default_home_guild(),
            rivals: default_rivals(),
            streamers: Vec::new(),
            page_size: default_page_size(),
        }
    }
}

/// Shared-secret admin access.
///
/// With no token configured the write endpoints are open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub password: Option<String>,

    /// Value placed in the `admin_token` cookie after a successful login
    #[serde(default)]
    pub token: Option<String>,

    /// Mark the cookie `Secure` (HTTPS deployments)
    #[serde(default)]
    pub secure_cookie: bool,
}

impl AdminConfig {
    pub fn gate_enabled(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Twitch Helix credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_twitch_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_twitch_api_url")]
    pub api_url: String,

    #[serde(default = "default_twitch_timeout")]
    pub timeout_seconds: u64,
}

fn default_twitch_auth_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_twitch_api_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}

fn default_twitch_timeout() -> u64 {
    10
}

impl TwitchConfig {
    /// `(client_id, client_secret)` when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            auth_url: default_twitch_auth_url(),
            api_url: default_twitch_api_url(),
            timeout_seconds: default_twitch_timeout(),
        }
    }
}

/// Where the CLI views fetch matches from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default = "default_client_base_url")]
    pub base_url: String,

    #[serde(default = "default_client_timeout")]
    pub timeout_seconds: u64,

    /// Sent as the `admin_token` cookie on writes to a gated server
    #[serde(default)]
    pub admin_token: Option<String>,
}

fn default_client_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_client_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            timeout_seconds: default_client_timeout(),
            admin_token: None,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub guild: GuildConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub twitch: TwitchConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub scoring: ScoringPolicy,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            guild: GuildConfig::default(),
            admin: AdminConfig::default(),
            twitch: TwitchConfig::default(),
            client: ClientConfig::default(),
            scoring: ScoringPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load from an optional TOML file, then the environment, then validate.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("guild.rivals")
                .with_list_parse_key("guild.streamers")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.guild.home_guild.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "guild.home_guild must not be empty".to_string(),
            ));
        }

        if self.guild.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "guild.page_size must be greater than 0".to_string(),
            ));
        }

        if self.admin.password.is_some() && !self.admin.gate_enabled() {
            return Err(ConfigError::ValidationError(
                "admin.password is set but admin.token is not".to_string(),
            ));
        }

        if self.twitch.timeout_seconds == 0 || self.client.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "HTTP timeouts must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.client.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("client.base_url is not a URL: {}", e))
        })?;

        self.scoring.validate().map_err(ConfigError::ValidationError)?;

        Ok(())
    }

}
