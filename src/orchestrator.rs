//! Per-turn orchestration: conversational state in, navigation/response
//! command out.
//!
//! The orchestrator contributes only bookkeeping (transcript window,
//! current page) and defensive parsing; the decision itself is delegated
//! to the external reasoning service. Every failure mode — transport,
//! timeout, unextractable or unparseable output — is a logged per-turn
//! no-op, never fatal to the session.

use crate::extract::extract_json;
use crate::reasoning::{ReasoningClient, orchestration_prompt};
use crate::transcript::{Role, Transcript};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Transcript turns included in each prompt.
const PROMPT_TURNS: usize = 10;

/// Page shown before any navigation directive arrives.
const DEFAULT_PAGE: &str = "home";

/// Navigation directive within a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Destination section.
    pub page: String,
    /// Model-supplied rationale (display/debug only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A triggered app action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action name, e.g. `generate_activities`, `start_timer`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Action-specific parameters.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

/// The parsed command produced once per user utterance. All fields are
/// optional; the client ignores what it does not understand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationCommand {
    /// Free-text label of what the user wants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Where to navigate, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
    /// Actions to trigger client-side.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    /// UI updates (modals, highlights, notifications), passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_updates: Option<serde_json::Value>,
    /// Text to speak back to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_response: Option<String>,
    /// Preference/context updates extracted from conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_updates: Option<serde_json::Value>,
}

/// Per-session orchestrator. Owns the transcript and navigation state
/// for exactly one voice session; `handle_turn` takes `&mut self`, so
/// turns for a session cannot interleave.
pub struct Orchestrator {
    reasoning: ReasoningClient,
    transcript: Transcript,
    user_context: String,
    current_page: String,
}

impl Orchestrator {
    /// Create an orchestrator with the given prompt context.
    #[must_use]
    pub fn new(reasoning: ReasoningClient, user_context: String) -> Self {
        Self {
            reasoning,
            transcript: Transcript::new(),
            user_context,
            current_page: DEFAULT_PAGE.to_owned(),
        }
    }

    /// The page the client is currently on, per the last successful
    /// navigation directive.
    #[must_use]
    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    /// Read access to the transcript (for tests and diagnostics).
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Replace the free-text context (e.g. after a store refresh).
    pub fn set_user_context(&mut self, user_context: String) {
        self.user_context = user_context;
    }

    /// Run the per-turn protocol for one user utterance.
    ///
    /// Returns the parsed command on success, or `None` when this
    /// turn's orchestration was abandoned (reasoning failure, no JSON
    /// found, parse failure). On `None`, navigation state and the
    /// assistant side of the transcript are left untouched.
    pub async fn handle_turn(&mut self, utterance: &str) -> Option<OrchestrationCommand> {
        self.transcript.append(Role::User, utterance);

        let prompt = orchestration_prompt(
            &self.transcript.render(PROMPT_TURNS),
            &self.user_context,
            &self.current_page,
        );

        let raw = match self.reasoning.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("orchestration call failed, skipping turn: {e}");
                return None;
            }
        };

        let Some(span) = extract_json(&raw) else {
            warn!("no JSON payload in orchestration response, skipping turn");
            return None;
        };

        let command: OrchestrationCommand = match serde_json::from_str(span) {
            Ok(command) => command,
            Err(e) => {
                warn!("orchestration payload did not parse, skipping turn: {e}");
                return None;
            }
        };

        if let Some(nav) = &command.navigation {
            info!("navigating to {}", nav.page);
            self.current_page = nav.page.clone();
        }

        if let Some(response) = &command.voice_response {
            self.transcript.append(Role::Assistant, response.clone());
        }

        Some(command)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn command_parses_full_shape() {
        let json = r#"{
            "intent": "see volunteering",
            "navigation": {"page": "serve", "reason": "user asked"},
            "actions": [{"type": "generate_activities", "params": {}}],
            "voice_response": "Pulling up opportunities now!",
            "context_updates": {"interests": ["environment"]}
        }"#;
        let command: OrchestrationCommand = serde_json::from_str(json).unwrap();
        assert_eq!(command.intent.as_deref(), Some("see volunteering"));
        assert_eq!(command.navigation.as_ref().unwrap().page, "serve");
        assert_eq!(command.actions.len(), 1);
        assert_eq!(command.actions[0].kind, "generate_activities");
        assert!(command.voice_response.is_some());
    }

    #[test]
    fn command_all_fields_optional() {
        let command: OrchestrationCommand = serde_json::from_str("{}").unwrap();
        assert!(command.intent.is_none());
        assert!(command.navigation.is_none());
        assert!(command.actions.is_empty());
        assert!(command.voice_response.is_none());
    }

    #[test]
    fn command_serialization_skips_empty_fields() {
        let command = OrchestrationCommand {
            intent: Some("stats".to_owned()),
            ..Default::default()
        };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"intent":"stats"}"#);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"intent": "x", "confidence": 0.9}"#;
        let command: OrchestrationCommand = serde_json::from_str(json).unwrap();
        assert_eq!(command.intent.as_deref(), Some("x"));
    }
}
