//! Redundant command delivery to the connected client.
//!
//! Commands are pushed over two independent channels: a reliable
//! structured data message, and a plain-text fallback (`NAV_` token plus
//! `CMD_`-prefixed JSON). Each send runs in its own failure boundary so
//! one channel failing can never suppress the other. Delivery is
//! at-most-once, best-effort, with no acknowledgment or retry.

use crate::orchestrator::OrchestrationCommand;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Prefix for the short navigation token on the text channel.
pub const NAV_PREFIX: &str = "NAV_";

/// Prefix for the full serialized command on the text channel.
pub const CMD_PREFIX: &str = "CMD_";

/// Publish primitives the room/transport layer must provide.
///
/// Implementors surface "no participant or channel ready yet" as an
/// `Err`, never a panic; the dispatcher logs it and moves on.
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Publish a reliable structured message on the session's data channel.
    async fn publish_data(&self, payload: &[u8]) -> anyhow::Result<()>;

    /// Send a plain text message to the client.
    async fn send_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Per-channel delivery outcome for one command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Channel A: structured data message landed.
    pub data_channel: bool,
    /// Channel B: `NAV_` token landed (`None` when the command carried
    /// no navigation page and the token was not attempted).
    pub nav_text: Option<bool>,
    /// Channel B: `CMD_` message landed.
    pub cmd_text: bool,
}

impl DeliveryReport {
    /// Whether at least one channel delivered something.
    #[must_use]
    pub fn any_delivered(&self) -> bool {
        self.data_channel || self.nav_text == Some(true) || self.cmd_text
    }
}

/// Dual-channel dispatcher over a [`RoomTransport`].
pub struct CommandDispatcher<T: RoomTransport> {
    transport: T,
}

impl<T: RoomTransport> CommandDispatcher<T> {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Access the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Deliver a command on both channels. Never errors; per-channel
    /// failures are logged and reflected in the report.
    pub async fn deliver(&self, command: &OrchestrationCommand) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        let serialized = match serde_json::to_string(command) {
            Ok(serialized) => serialized,
            Err(e) => {
                // Serialization of a just-parsed command should not fail;
                // if it does, neither channel has anything to send.
                warn!("command serialization failed, nothing dispatched: {e}");
                return report;
            }
        };

        // Channel A: structured data message.
        match self.transport.publish_data(serialized.as_bytes()).await {
            Ok(()) => {
                debug!("command published on data channel");
                report.data_channel = true;
            }
            Err(e) => warn!("data channel publish failed: {e}"),
        }

        // Channel B: navigation token, only when there is a page.
        if let Some(nav) = &command.navigation {
            let token = format!("{NAV_PREFIX}{}", nav.page);
            match self.transport.send_text(&token).await {
                Ok(()) => report.nav_text = Some(true),
                Err(e) => {
                    warn!("nav text send failed: {e}");
                    report.nav_text = Some(false);
                }
            }
        }

        // Channel B: full command as text, attempted regardless of the
        // nav token's outcome.
        let cmd_text = format!("{CMD_PREFIX}{serialized}");
        match self.transport.send_text(&cmd_text).await {
            Ok(()) => report.cmd_text = true,
            Err(e) => warn!("cmd text send failed: {e}"),
        }

        report
    }
}
