//! DoGood: voice-agent orchestration and app tool facade.
//!
//! This crate hosts the orchestration loop that sits between a hosted
//! speech pipeline and the DoGood client:
//! Utterance → Orchestrator → Reasoning service → Command Dispatcher → Client
//!
//! # Architecture
//!
//! The voice-agent side is a sequential per-session pipeline:
//! - **Context**: decodes per-participant metadata into prompt context
//! - **Transcript**: bounded rolling log of conversation turns
//! - **Orchestrator**: one reasoning call per user utterance, defensive
//!   JSON extraction over free-form model output
//! - **Dispatch**: redundant dual-channel delivery to the client
//!
//! A separate process exposes the tool facade (`tools` + `server`):
//! activity suggestions, completion rewards, stats, AI-personalized task
//! lists and webhook notifications, backed by a shared session store.
//!
//! The hosted STT/LLM/TTS pipeline and the real-time room are external
//! collaborators reached only through the `RoomTransport` seam and the
//! reasoning client.

pub mod agent;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod reasoning;
pub mod server;
pub mod session;
pub mod tools;
pub mod transcript;

pub use agent::VoiceSession;
pub use config::AgentConfig;
pub use dispatch::{CommandDispatcher, DeliveryReport, RoomTransport};
pub use error::{AgentError, Result};
pub use orchestrator::{OrchestrationCommand, Orchestrator};
pub use session::SessionStore;
