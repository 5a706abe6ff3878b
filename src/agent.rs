//! Voice session runtime: one orchestrator plus one dispatcher per
//! connected participant.
//!
//! A session is born from the participant's opaque metadata blob, pulls
//! any stored context for its session id into the prompt, and then runs
//! the per-utterance loop: orchestrate, dispatch on both channels,
//! return the text to speak.

use crate::context::ParticipantMetadata;
use crate::dispatch::{CommandDispatcher, DeliveryReport, RoomTransport};
use crate::orchestrator::{OrchestrationCommand, Orchestrator};
use crate::reasoning::ReasoningClient;
use crate::session::SessionStore;
use tracing::{info, warn};

/// One live voice session.
pub struct VoiceSession<T: RoomTransport> {
    session_id: String,
    orchestrator: Orchestrator,
    dispatcher: CommandDispatcher<T>,
    store: SessionStore,
}

impl<T: RoomTransport> VoiceSession<T> {
    /// Build a session from the participant's metadata.
    ///
    /// Metadata that is absent or malformed degrades to an empty
    /// context and the default session id; stored context for the id,
    /// when present, is folded into the prompt alongside the metadata's
    /// own free text.
    pub async fn connect(
        metadata: Option<&str>,
        reasoning: ReasoningClient,
        transport: T,
        store: SessionStore,
    ) -> Self {
        let meta = ParticipantMetadata::parse(metadata);
        info!("voice session connected: {}", meta.session_id);

        let mut user_context = meta.user_context;
        if let Some(context) = store.get(&meta.session_id).await {
            if !user_context.is_empty() {
                user_context.push_str("\n\n");
            }
            user_context.push_str(&context.summary());
        }

        store
            .update(&meta.session_id, |ctx| {
                ctx.activities.push(crate::context::ActivityEvent {
                    kind: "voice_session_started".to_owned(),
                    description: "Voice session started".to_owned(),
                    timestamp: Some(chrono::Utc::now()),
                    duration_minutes: None,
                });
            })
            .await;

        Self {
            session_id: meta.session_id,
            orchestrator: Orchestrator::new(reasoning, user_context),
            dispatcher: CommandDispatcher::new(transport),
            store,
        }
    }

    /// The session id this session correlates with.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The page the client is currently on.
    #[must_use]
    pub fn current_page(&self) -> &str {
        self.orchestrator.current_page()
    }

    /// Access the transport behind the dispatcher.
    #[must_use]
    pub fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    /// Handle one finalized user utterance.
    ///
    /// Runs orchestration, dispatches any resulting command on both
    /// channels, records the navigation in the session store, and
    /// returns the text to speak back. `None` means this turn produced
    /// nothing (orchestration failed or the command carried no voice
    /// response); the session stays healthy either way.
    pub async fn handle_utterance(&mut self, utterance: &str) -> Option<String> {
        let command = self.orchestrator.handle_turn(utterance).await?;

        let report = self.dispatcher.deliver(&command).await;
        if !report.any_delivered() {
            warn!("command reached no channel, continuing session");
        }
        self.record_turn(&command, report).await;

        command.voice_response
    }

    async fn record_turn(&self, command: &OrchestrationCommand, report: DeliveryReport) {
        let page = command.navigation.as_ref().map(|nav| nav.page.clone());
        if page.is_none() && !report.any_delivered() {
            return;
        }
        self.store
            .update(&self.session_id, move |ctx| {
                if let Some(page) = page {
                    ctx.record_page_visit(&page);
                } else {
                    ctx.touch();
                }
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::ReasoningConfig;

    fn client() -> ReasoningClient {
        ReasoningClient::with_key(&ReasoningConfig::default(), "test-key".to_owned()).unwrap()
    }

    struct NullTransport;

    #[async_trait::async_trait]
    impl RoomTransport for NullTransport {
        async fn publish_data(&self, _payload: &[u8]) -> anyhow::Result<()> {
            Ok(())
        }

        async fn send_text(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn connect_uses_metadata_session_id() {
        let store = SessionStore::new();
        let session = VoiceSession::connect(
            Some(r#"{"sessionId": "s9", "userContext": "likes trees"}"#),
            client(),
            NullTransport,
            store.clone(),
        )
        .await;
        assert_eq!(session.session_id(), "s9");
        assert_eq!(session.current_page(), "home");

        // Connecting logs a session-start event under the id.
        let context = store.get("s9").await.unwrap();
        assert_eq!(context.activities.len(), 1);
        assert_eq!(context.activities[0].kind, "voice_session_started");
    }

    #[tokio::test]
    async fn connect_defaults_on_bad_metadata() {
        let session = VoiceSession::connect(
            Some("not json"),
            client(),
            NullTransport,
            SessionStore::new(),
        )
        .await;
        assert_eq!(session.session_id(), crate::context::DEFAULT_SESSION_ID);
    }
}
