//! DoGood tool facade server.
//!
//! Serves the tool surface over HTTP and sweeps idle sessions in the
//! background. The reasoning client and notification webhook are
//! optional; without their API keys the affected tools fall back to
//! static results or report failure.

use dogood::config::AgentConfig;
use dogood::reasoning::ReasoningClient;
use dogood::server::ToolServer;
use dogood::session::SessionStore;
use dogood::tools::notify::Notifier;
use dogood::tools::ToolFacade;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dogood=info")),
        )
        .init();

    let config = AgentConfig::load(&AgentConfig::default_path())?;

    let reasoning = match ReasoningClient::new(&config.reasoning) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("reasoning unavailable, AI task generation will use defaults: {e}");
            None
        }
    };
    let notifier = match Notifier::new(&config.webhook) {
        Ok(notifier) => Some(notifier),
        Err(e) => {
            warn!("notifications unavailable: {e}");
            None
        }
    };

    let store = SessionStore::new();
    let sweeper = store.spawn_sweeper(
        Duration::from_secs(config.session.sweep_interval_mins * 60),
        Duration::from_secs(config.session.ttl_hours * 3600),
    );

    let facade = ToolFacade::new(store, reasoning, notifier);
    let server = ToolServer::start(facade, &config.tools).await?;
    info!("tool server running on port {}", server.port());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    server.shutdown();
    sweeper.abort();
    Ok(())
}
