//! Transport-only chat-completion client primitives.
//!
//! This crate owns request/response building and parsing for an OpenAI-style
//! `/chat/completions` endpoint, plus the failure taxonomy that the
//! conversation orchestrator dispatches on. It intentionally contains no
//! conversation state and no retry policy: a retryable failure is resolved by
//! the caller rolling the turn back, not by this layer re-sending.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod url;

pub use client::{ChatApiClient, ChatCompletion};
pub use config::ChatApiConfig;
pub use error::ChatApiError;
pub use payload::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat, Role, Usage};
pub use url::{normalize_chat_url, DEFAULT_CHAT_BASE_URL};
