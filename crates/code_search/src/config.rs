use std::path::PathBuf;
use std::time::Duration;

/// Transport configuration for search-service queries.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the search service for the target repository.
    pub base_url: String,
    /// Repository root that absolute result paths are rewritten against.
    pub repo_root: PathBuf,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl SearchConfig {
    pub fn new(base_url: impl Into<String>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            repo_root: repo_root.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
