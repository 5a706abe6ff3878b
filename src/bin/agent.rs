//! DoGood voice agent, driven by finalized utterances on stdin.
//!
//! Each input line is treated as one finalized user utterance; the
//! resulting voice response is printed to stdout and dispatched
//! commands are logged. Metadata for the session may be supplied via
//! the `DOGOOD_METADATA` environment variable.

use dogood::config::AgentConfig;
use dogood::dispatch::RoomTransport;
use dogood::reasoning::ReasoningClient;
use dogood::session::SessionStore;
use dogood::VoiceSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Transport that logs both channels instead of publishing to a room.
struct LoggingTransport;

#[async_trait::async_trait]
impl RoomTransport for LoggingTransport {
    async fn publish_data(&self, payload: &[u8]) -> anyhow::Result<()> {
        info!("data channel: {}", String::from_utf8_lossy(payload));
        Ok(())
    }

    async fn send_text(&self, text: &str) -> anyhow::Result<()> {
        info!("text channel: {text}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dogood=info")),
        )
        .init();

    let config = AgentConfig::load(&AgentConfig::default_path())?;
    let reasoning = ReasoningClient::new(&config.reasoning)?;
    let store = SessionStore::new();

    let metadata = std::env::var("DOGOOD_METADATA").ok();
    let mut session = VoiceSession::connect(
        metadata.as_deref(),
        reasoning,
        LoggingTransport,
        store,
    )
    .await;

    info!(
        "agent ready (session {}), type an utterance per line",
        session.session_id()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        match session.handle_utterance(utterance).await {
            Some(response) => println!("{response}"),
            None => info!("no command produced for this turn"),
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}
