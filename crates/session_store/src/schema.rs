use chat_api::ChatMessage;
use serde::{Deserialize, Serialize};

/// Durable snapshot of one conversation.
///
/// Written wholesale after every successful turn; token counters mirror the
/// in-memory conversation counters at the moment of the save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}
