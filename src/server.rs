//! HTTP surface of the tool facade.
//!
//! Serves `POST /mcp` in a tools/call wire shape plus a health probe.
//! Tool failures are data: the endpoint answers 200 with a
//! `success: false` result; only an unreadable request envelope gets a
//! 4xx.

use crate::config::ToolServerConfig;
use crate::error::{AgentError, Result};
use crate::tools::ToolFacade;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// `POST /mcp` request envelope.
#[derive(Debug, Deserialize)]
struct CallEnvelope {
    method: String,
    #[serde(default)]
    params: CallParams,
}

#[derive(Debug, Default, Deserialize)]
struct CallParams {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Tool facade HTTP server.
///
/// Binds at construction and serves from a background task; dropping
/// the server aborts it.
pub struct ToolServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ToolServer {
    /// Start the server.
    ///
    /// Binds to `{config.host}:{config.port}` (port `0` auto-assigns).
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(facade: ToolFacade, config: &ToolServerConfig) -> Result<Self> {
        let app = Router::new()
            .route("/mcp", post(handle_call))
            .route("/healthz", get(handle_health))
            .with_state(facade);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| AgentError::Server(format!("tool server bind failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| AgentError::Server(format!("failed to get local addr: {e}")))?;

        info!("tool server listening on http://{addr}/mcp");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("tool server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// The bound address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The bound port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for ToolServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_call(
    State(facade): State<ToolFacade>,
    Json(envelope): Json<CallEnvelope>,
) -> impl IntoResponse {
    if envelope.method != "tools/call" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unsupported method: {}", envelope.method) })),
        );
    }

    let result = facade
        .call(&envelope.params.name, &envelope.params.arguments)
        .await;

    match serde_json::to_value(&result) {
        Ok(content) => (StatusCode::OK, Json(json!({ "content": content }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("result encoding failed: {e}") })),
        ),
    }
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
