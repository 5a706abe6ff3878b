//! Outbound notification webhook.
//!
//! Fire-and-forget POST to a fixed webhook with a bearer token. One
//! attempt, short timeout, no retry; callers treat failure as a
//! degraded-but-fine outcome.

use crate::config::WebhookConfig;
use crate::error::{AgentError, Result};
use std::time::Duration;
use tracing::debug;

/// Webhook notification client.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl Notifier {
    /// Build a notifier from config, resolving the bearer token from
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unresolvable or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let token = config.resolve_api_key()?;
        Self::with_token(config, token)
    }

    /// Build a notifier with an explicit token (used by tests against
    /// a mock server).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_token(config: &WebhookConfig, token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Notify(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            token,
        })
    }

    /// POST `{"message": ...}` to the webhook. Success is any 2xx.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout or non-2xx.
    pub async fn send(&self, message: &str) -> Result<()> {
        let body = serde_json::json!({ "message": message });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Notify(format!("webhook request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Notify(format!(
                "webhook returned {status}: {body}"
            )));
        }

        debug!("notification delivered");
        Ok(())
    }
}
