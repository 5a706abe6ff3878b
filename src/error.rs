//! Error types for the dogood agent and tool facade.

/// Top-level error type for the voice-agent system.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Reasoning service call error (transport failure or non-2xx).
    #[error("reasoning error: {0}")]
    Reasoning(String),

    /// Notification webhook error.
    #[error("notify error: {0}")]
    Notify(String),

    /// Session store error.
    #[error("session error: {0}")]
    Session(String),

    /// Tool facade server error.
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AgentError>;
