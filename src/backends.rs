//! Blocking adapters over the async transport crates.
//!
//! The orchestrator processes one turn at a time on a single logical thread;
//! these adapters run each remote call to completion on a shared
//! current-thread runtime.

use std::sync::Arc;

use chat_api::{ChatApiClient, ChatApiError, ChatCompletion, ChatRequest};
use code_search::{render_context, SearchClient, SearchError};
use tokio::runtime::Runtime;

use crate::orchestrator::{CompletionBackend, ContextSource};

/// Builds the current-thread runtime shared by the blocking adapters.
pub fn blocking_runtime() -> std::io::Result<Arc<Runtime>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(Arc::new(runtime))
}

pub struct HttpCompletionBackend {
    runtime: Arc<Runtime>,
    client: ChatApiClient,
}

impl HttpCompletionBackend {
    pub fn new(runtime: Arc<Runtime>, client: ChatApiClient) -> Self {
        Self { runtime, client }
    }
}

impl CompletionBackend for HttpCompletionBackend {
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatApiError> {
        self.runtime.block_on(self.client.complete(request))
    }
}

pub struct HttpContextSource {
    runtime: Arc<Runtime>,
    client: SearchClient,
}

impl HttpContextSource {
    pub fn new(runtime: Arc<Runtime>, client: SearchClient) -> Self {
        Self { runtime, client }
    }
}

impl ContextSource for HttpContextSource {
    fn fetch(&self, query: &str) -> Result<String, SearchError> {
        let snippets = self.runtime.block_on(self.client.fetch(query))?;
        Ok(render_context(&snippets))
    }
}
