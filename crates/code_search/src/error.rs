use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed search response: {0}")]
    Malformed(String),

    #[error("invalid search service URL: {0}")]
    InvalidUrl(String),
}
