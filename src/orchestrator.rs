use chat_api::{ChatApiError, ChatCompletion, ChatMessage, ChatRequest};
use code_search::SearchError;
use log::{error, warn};
use session_store::{SessionRecord, SessionStore};

use crate::commands::{classify_input, InputDisposition};
use crate::config::Settings;
use crate::conversation::ConversationLog;
use crate::prompt::build_augmented_prompt;

/// Signal returned to the driver loop after each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The turn resolved; prompt for the next utterance.
    Continue,
    /// The turn failed retryably and was rolled back; the utterance may be
    /// resubmitted.
    RetryTurn,
    /// The session is over.
    EndSession,
}

/// Blocking facade over the completion transport.
pub trait CompletionBackend {
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatApiError>;
}

/// Blocking facade over the context retrieval service. Returns the rendered
/// context block for a raw utterance.
pub trait ContextSource {
    fn fetch(&self, query: &str) -> Result<String, SearchError>;
}

/// Drives one turn at a time to completion: provisional append, remote call,
/// outcome classification, counter updates, and synchronous persistence.
/// Exclusively owns the conversation state.
pub struct Orchestrator<B, C> {
    conversation: ConversationLog,
    backend: B,
    context: C,
    store: SessionStore,
    settings: Settings,
}

impl<B: CompletionBackend, C: ContextSource> Orchestrator<B, C> {
    pub fn new(backend: B, context: C, store: SessionStore, settings: Settings) -> Self {
        Self {
            conversation: ConversationLog::new(),
            backend,
            context,
            store,
            settings,
        }
    }

    #[must_use]
    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Injects a pre-authored system message before the first turn.
    pub fn push_system_message(&mut self, content: impl Into<String>) {
        self.conversation.append(ChatMessage::system(content));
    }

    /// Replaces the conversation wholesale with a restored snapshot,
    /// discarding any system messages injected so far. The active model
    /// stays whatever the current configuration says.
    pub fn restore_conversation(&mut self, record: SessionRecord) {
        self.conversation = ConversationLog::restore(
            record.messages,
            record.prompt_tokens,
            record.completion_tokens,
        );
    }

    /// Runs one full turn for `raw` input, reporting the assistant's reply
    /// through `on_reply`.
    pub fn run_turn(&mut self, raw: &str, on_reply: &mut dyn FnMut(&str)) -> TurnOutcome {
        let utterance = match classify_input(raw) {
            InputDisposition::Quit => return TurnOutcome::EndSession,
            InputDisposition::Empty => return TurnOutcome::Continue,
            InputDisposition::Utterance(utterance) => utterance,
        };

        let context_block = match self.context.fetch(&utterance) {
            Ok(block) => block,
            Err(fetch_error) => {
                warn!("context retrieval unavailable, continuing without context: {fetch_error}");
                String::new()
            }
        };

        // Provisional until a terminal outcome is reached.
        let augmented = build_augmented_prompt(&context_block, &utterance);
        self.conversation.append(ChatMessage::user(augmented));

        let request = self.build_request();
        match self.backend.complete(&request) {
            Ok(completion) => self.commit_success(completion, on_reply),
            Err(api_error) if api_error.is_retryable() => {
                error!("{api_error}, try again...");
                self.rollback_provisional_turn();
                TurnOutcome::RetryTurn
            }
            Err(api_error) => {
                // Fatal: the provisional user message stays in memory; only
                // previously committed turns were ever persisted.
                error!("{api_error}");
                TurnOutcome::EndSession
            }
        }
    }

    fn build_request(&self) -> ChatRequest {
        let mut request = ChatRequest::new(
            self.settings.model.clone(),
            self.settings.temperature,
            self.conversation.messages().to_vec(),
        );
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if self.settings.json_mode {
            request = request.with_json_response();
        }
        request
    }

    fn commit_success(
        &mut self,
        completion: ChatCompletion,
        on_reply: &mut dyn FnMut(&str),
    ) -> TurnOutcome {
        let ChatCompletion { message, usage } = completion;
        on_reply(message.content.trim());

        self.conversation.append(message);
        self.conversation.add_usage(usage);
        self.persist();

        if self.settings.non_interactive {
            TurnOutcome::EndSession
        } else {
            TurnOutcome::Continue
        }
    }

    /// A persistence failure is reported and leaves in-memory state intact;
    /// the next successful turn retries the write.
    fn persist(&self) {
        let record = SessionRecord {
            model: self.settings.model.clone(),
            messages: self.conversation.messages().to_vec(),
            prompt_tokens: self.conversation.prompt_tokens(),
            completion_tokens: self.conversation.completion_tokens(),
        };

        if let Err(save_error) = self.store.save(&record) {
            error!("failed to persist session: {save_error}");
        }
    }

    fn rollback_provisional_turn(&mut self) {
        if let Err(inconsistency) = self.conversation.rollback_last() {
            warn!("{inconsistency}");
        }
    }
}
