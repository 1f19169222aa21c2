use reqwest::{Client, Url};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::snippet::{snippets_from_response, ContextSnippet, QueryResponse};

/// Result-count cap requested from the search service.
pub const MAX_RESULTS: usize = 75;
/// Context lines requested above each matched block.
pub const CONTEXT_ABOVE: u32 = 3;
/// Context lines requested below each matched block.
pub const CONTEXT_BELOW: u32 = 3;

#[derive(Debug)]
pub struct SearchClient {
    http: Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SearchError::Transport)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Builds the query URL: `<base>/query/<query>` with the fixed result
    /// cap and symmetric context window as query parameters. The query text
    /// is percent-encoded as a path segment.
    pub fn query_url(&self, query: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(self.config.base_url.trim())
            .map_err(|error| SearchError::InvalidUrl(error.to_string()))?;

        url.path_segments_mut()
            .map_err(|()| SearchError::InvalidUrl("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push("query")
            .push(query);

        url.query_pairs_mut()
            .append_pair("maxResults", &MAX_RESULTS.to_string())
            .append_pair("contextAbove", &CONTEXT_ABOVE.to_string())
            .append_pair("contextBelow", &CONTEXT_BELOW.to_string());

        Ok(url)
    }

    /// Fetches snippets relevant to `query`, in service order, with absolute
    /// paths rewritten relative to the configured repository root.
    pub async fn fetch(&self, query: &str) -> Result<Vec<ContextSnippet>, SearchError> {
        let url = self.query_url(query)?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let decoded: QueryResponse = serde_json::from_str(&body)
            .map_err(|error| SearchError::Malformed(error.to_string()))?;

        snippets_from_response(decoded, &self.config.repo_root)
    }
}
