//! Configuration types for the agent and tool facade.

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for both processes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// External reasoning service settings.
    pub reasoning: ReasoningConfig,
    /// Notification webhook settings.
    pub webhook: WebhookConfig,
    /// Tool facade HTTP server settings.
    pub tools: ToolServerConfig,
    /// Shared session store settings.
    pub session: SessionConfig,
}

/// Reasoning service (hosted LLM) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Provider base URL.
    pub api_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Per-request timeout in seconds. A timeout is a recoverable
    /// "no command" outcome, never fatal to the session.
    pub timeout_secs: u64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com".to_owned(),
            api_key_env: "ANTHROPIC_API_KEY".to_owned(),
            model: "claude-3-5-sonnet-20241022".to_owned(),
            max_tokens: 2048,
            timeout_secs: 30,
        }
    }
}

impl ReasoningConfig {
    /// Resolve the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is missing or empty.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_env_key(&self.api_key_env)
    }
}

/// Notification webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook endpoint URL.
    pub url: String,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    /// Per-request timeout in seconds. No retry on failure.
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: "https://poke.com/api/v1/inbound-sms/webhook".to_owned(),
            api_key_env: "POKE_API_KEY".to_owned(),
            timeout_secs: 10,
        }
    }
}

impl WebhookConfig {
    /// Resolve the bearer token from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is missing or empty.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_env_key(&self.api_key_env)
    }
}

/// Tool facade HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port (0 = auto-assign).
    pub port: u16,
}

impl Default for ToolServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        }
    }
}

/// Session store retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hours a session may sit idle before the sweeper removes it.
    pub ttl_hours: u64,
    /// Minutes between sweep passes.
    pub sweep_interval_mins: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            sweep_interval_mins: 60,
        }
    }
}

impl AgentConfig {
    /// Default config file location (`<config dir>/dogood/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dogood")
            .join("config.toml")
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AgentError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            AgentError::Config(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Serialize and write the configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| AgentError::Config(format!("config serialization failed: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, raw)?;
        Ok(())
    }
}

fn resolve_env_key(var: &str) -> Result<String> {
    let value = std::env::var(var)
        .map_err(|_| AgentError::Config(format!("api key env var is missing: {var}")))?;
    if value.trim().is_empty() {
        return Err(AgentError::Config(format!(
            "api key env var is empty: {var}"
        )));
    }
    Ok(value)
}
