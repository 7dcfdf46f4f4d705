use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::events::ChatMode;

pub const ENDPOINT_ENV: &str = "REMINDR_ENDPOINT";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every endpoint path is appended to
    pub endpoint_base: String,

    /// Backend exposes the reminder list endpoints
    pub supports_reminders: bool,

    /// Backend exposes conversation metadata
    pub supports_conversations: bool,

    /// Backend exposes the general chat endpoint
    pub supports_general_chat: bool,

    /// Mode a fresh session starts in
    pub default_mode: ChatMode,

    pub request_timeout_secs: u64,

    /// Fallback filter when RUST_LOG is unset
    pub log_level: String,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub max_messages: usize,
    pub show_timestamps: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            max_messages: 200,
            show_timestamps: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Profile::Full.apply(Config {
            endpoint_base: "http://localhost:8000".to_string(),
            supports_reminders: false,
            supports_conversations: false,
            supports_general_chat: false,
            default_mode: ChatMode::Reminder,
            request_timeout_secs: 60,
            log_level: "info".to_string(),
            ui: UiConfig::default(),
        })
    }
}

/// Presets matching the backend generations the client has to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Bare `POST /chat` on the server root, nothing else
    Basic,
    /// Chat plus reminder lists under `/api`
    Reminders,
    /// Reminders, conversations and general chat under `/api`
    Full,
}

impl Profile {
    /// Set the capability flags and the `/api` prefix on the configured server.
    /// The host itself is left alone.
    pub fn apply(self, mut config: Config) -> Config {
        let (api_prefix, reminders, conversations, general) = match self {
            Profile::Basic => (false, false, false, false),
            Profile::Reminders => (true, true, false, false),
            Profile::Full => (true, true, true, true),
        };
        let root = server_root(&config.endpoint_base);
        config.endpoint_base = if api_prefix {
            format!("{}/api", root)
        } else {
            root.to_string()
        };
        config.supports_reminders = reminders;
        config.supports_conversations = conversations;
        config.supports_general_chat = general;
        if !general {
            config.default_mode = ChatMode::Reminder;
        }
        config
    }
}

/// Endpoint base with any trailing slash and `/api` prefix removed
fn server_root(endpoint_base: &str) -> &str {
    let trimmed = endpoint_base.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed)
}

impl Config {
    /// Remindr home directory (~/.remindr)
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".remindr"))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from ~/.remindr/config.toml and apply the env override
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path()?)?;
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                config.endpoint_base = endpoint;
            }
        }
        Ok(config)
    }

    /// Load configuration from a specific file, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Endpoint base without a trailing slash
    pub fn base_url(&self) -> &str {
        self.endpoint_base.trim_end_matches('/')
    }

    /// Mode to start in, downgraded when general chat is unavailable
    pub fn initial_mode(&self) -> ChatMode {
        if self.supports_general_chat {
            self.default_mode
        } else {
            ChatMode::Reminder
        }
    }
}
