use chat_api::{ChatMessage, Usage};
use thiserror::Error;

/// Rollback was requested with no message in history. Defensive: orchestrator
/// discipline keeps this unreachable, and it is reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("conversation rollback requested with no messages in history")]
pub struct EmptyHistory;

/// Ordered conversation history plus cumulative token counters.
///
/// Messages only accumulate, except for the single rollback used to discard
/// a provisional user turn; counters only advance, and only from usage
/// reported by successful responses. No network or disk I/O.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl ConversationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the log from a restored session snapshot, replacing any
    /// prior state wholesale.
    #[must_use]
    pub fn restore(messages: Vec<ChatMessage>, prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            messages,
            prompt_tokens,
            completion_tokens,
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens
    }

    #[must_use]
    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens
    }

    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Removes and returns the most recent message. Counters are untouched;
    /// they only advance on successful turns.
    pub fn rollback_last(&mut self) -> Result<ChatMessage, EmptyHistory> {
        self.messages.pop().ok_or(EmptyHistory)
    }

    pub fn add_usage(&mut self, usage: Usage) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
    }
}

#[cfg(test)]
mod tests {
    use chat_api::{ChatMessage, Usage};

    use super::{ConversationLog, EmptyHistory};

    #[test]
    fn append_then_rollback_restores_previous_length() {
        let mut log = ConversationLog::new();
        log.append(ChatMessage::system("context"));
        log.append(ChatMessage::user("provisional"));

        let rolled_back = log.rollback_last().expect("rollback should succeed");
        assert_eq!(rolled_back.content, "provisional");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn rollback_of_empty_history_reports_empty_history() {
        let mut log = ConversationLog::new();
        assert_eq!(log.rollback_last(), Err(EmptyHistory));
    }

    #[test]
    fn usage_accumulates_monotonically() {
        let mut log = ConversationLog::new();
        log.add_usage(Usage {
            prompt_tokens: 100,
            completion_tokens: 30,
        });
        log.add_usage(Usage {
            prompt_tokens: 50,
            completion_tokens: 20,
        });

        assert_eq!(log.prompt_tokens(), 150);
        assert_eq!(log.completion_tokens(), 50);
        assert_eq!(log.total_tokens(), 200);
    }

    #[test]
    fn restore_replaces_state_wholesale() {
        let mut log = ConversationLog::new();
        log.append(ChatMessage::system("stale context"));

        log = ConversationLog::restore(vec![ChatMessage::user("restored")], 10, 5);
        assert_eq!(log.len(), 1);
        assert_eq!(log.messages()[0].content, "restored");
        assert_eq!(log.total_tokens(), 15);
    }
}
