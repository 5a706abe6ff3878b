//! Client for the external reasoning service.
//!
//! The reasoning endpoint is the sole locus of "intelligence" in the
//! system: the orchestrator and the AI task generators both send it a
//! free-text prompt and get back free text that may embed one JSON
//! object. Calls are bounded by a hard timeout and never retried; every
//! caller treats a failure as a recoverable fallback.

use crate::config::ReasoningConfig;
use crate::error::{AgentError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Messages-API response body. Only the text blocks are of interest.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Async client for the hosted reasoning service.
#[derive(Debug, Clone)]
pub struct ReasoningClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ReasoningClient {
    /// Build a client from config, resolving the API key from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unresolvable or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ReasoningConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::with_key(config, api_key)
    }

    /// Build a client with an explicit key (used by tests against a
    /// mock server).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_key(config: &ReasoningConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Reasoning(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Send a single-user-message prompt and return the raw completion
    /// text (first text block of the response).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, non-2xx status
    /// or an unusable response body. All callers treat these as
    /// recoverable per-call failures.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.api_url);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!("reasoning request: {} chars of prompt", prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Reasoning(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Reasoning(format!(
                "reasoning service returned {status}: {body}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Reasoning(format!("response decode failed: {e}")))?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .ok_or_else(|| AgentError::Reasoning("response carried no text block".to_owned()))
    }
}

/// Build the per-turn orchestration prompt.
///
/// Carries the rolling transcript window, the free-text session context
/// and the current page, plus the capability catalog and the exact JSON
/// shape the orchestrator parses.
#[must_use]
pub fn orchestration_prompt(transcript: &str, user_context: &str, current_page: &str) -> String {
    let context = if user_context.is_empty() {
        "No context available"
    } else {
        user_context
    };
    let transcript = if transcript.is_empty() {
        "No conversation yet"
    } else {
        transcript
    };

    format!(
        r#"You are the orchestration brain for the DoGood app, a voice-controlled productivity, service, and self-improvement platform.

Your role is to analyze voice conversations and decide where to navigate the user, what to say back, and what context to capture.

Current Context:
{context}

Current Page: {current_page}

Conversation Transcript:
{transcript}

Available pages:
- home: Main landing page with XP counter and category buttons
- serve: Community service opportunities, crisis alerts, and mini-games
- productivity: Focus timer, task management, productivity tracking
- self-improve: Personal development activities, habit tracking, challenges
- shop: Spend XP on rewards and items
- stats: View progress, achievements, XP history

Available actions (you can trigger multiple):
- generate_activities: Generate new service opportunities
- start_timer: Start productivity focus timer (params: {{ "minutes": number, "taskName": string }})
- generate_self_improve: Generate personal development activities
- update_preferences: Update user interests/preferences
- refresh_activities: Refresh current section's activities

Respond with ONLY valid JSON in this EXACT format:

```json
{{
  "intent": "brief description of what user wants",
  "navigation": {{
    "page": "page_name",
    "reason": "why navigating here"
  }},
  "actions": [
    {{ "type": "action_name", "params": {{}} }}
  ],
  "voice_response": "Natural, conversational response to speak back (2-3 sentences max)",
  "context_updates": {{
    "interests": ["interest1"],
    "causes": ["cause1"],
    "location": "city name"
  }}
}}
```

Rules:
1. Navigation is optional - only navigate if the user clearly wants to see something
2. If the user mentions interests, capture them in context_updates
3. If the user asks to see/find/show something, navigate AND trigger the relevant generation action
4. voice_response should be natural and encouraging
5. Respond with EXECUTABLE COMMANDS, not conversational advice - your role is to CONTROL the app

Generate ONLY the JSON response, no other text."#
    )
}

/// Build the AI productivity-task generation prompt.
#[must_use]
pub fn productivity_tasks_prompt(context_summary: &str, max_tasks: usize) -> String {
    format!(
        r##"You are a productivity assistant for the DoGood app. Based on this user's session context, suggest up to {max_tasks} productivity tasks tailored to them.

{context_summary}

Respond with ONLY valid JSON in this format:

```json
{{
  "tasks": [
    {{
      "id": "unique-id",
      "title": "Task Title",
      "lastDone": "N days ago",
      "xp": 50,
      "category": "Work",
      "color": "#3B3766"
    }}
  ]
}}
```

Use category "Work" with color "#3B3766" or "Personal" with color "#4A5A3C". Generate ONLY the JSON, no other text."##
    )
}

/// Build the AI self-improvement generation prompt.
#[must_use]
pub fn self_improvement_prompt(context_summary: &str) -> String {
    format!(
        r##"You are a personal-development coach for the DoGood app. Based on this user's session context, suggest daily tasks and weekly goals tailored to them.

{context_summary}

Respond with ONLY valid JSON in this format:

```json
{{
  "daily_tasks": [
    {{
      "id": "unique-id",
      "title": "Task Title",
      "lastDone": "N days ago",
      "xp": 30,
      "category": "Fitness",
      "color": "#9D5C45"
    }}
  ],
  "weekly_goals": [
    {{
      "id": "unique-id",
      "title": "Goal Title",
      "lastDone": "N days ago",
      "xp": 100,
      "category": "Learning",
      "color": "#4A5A3C"
    }}
  ]
}}
```

Generate ONLY the JSON, no other text."##
    )
}
