use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// Error code the remote side reports when the replayed conversation no
/// longer fits the model's context window.
pub(crate) const CONTEXT_LENGTH_CODE: &str = "context_length_exceeded";

#[derive(Debug)]
pub enum ChatApiError {
    MissingApiKey,
    InvalidBaseUrl(String),
    /// Connection-level failure (refused, reset, timed out). Retryable.
    Network(reqwest::Error),
    /// HTTP 429. Retryable.
    RateLimited,
    /// HTTP 500. Retryable.
    ServerError,
    /// HTTP 502/503. Retryable.
    Overloaded,
    /// HTTP 401. Fatal.
    InvalidCredentials,
    /// HTTP 400 without a context-length error code. Fatal.
    InvalidRequest(String),
    /// HTTP 400 carrying the context-length error code. Fatal.
    ContextLengthExceeded,
    /// HTTP 200 whose body did not match the expected response shape. Fatal.
    MalformedResponse(String),
    /// Any status outside the classified table. Fatal.
    Unexpected { status: StatusCode, body: String },
}

impl ChatApiError {
    /// Retryable failures resolve by rolling the turn back and letting the
    /// caller retry; everything else ends the session.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited | Self::ServerError | Self::Overloaded
        )
    }
}

impl fmt::Display for ChatApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key is required"),
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::Network(error) => write!(f, "connection error: {error}"),
            Self::RateLimited => write!(f, "rate limit or maximum monthly limit exceeded"),
            Self::ServerError => write!(f, "internal server error"),
            Self::Overloaded => write!(f, "the server seems to be overloaded"),
            Self::InvalidCredentials => write!(f, "invalid API key"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::ContextLengthExceeded => write!(f, "maximum context length exceeded"),
            Self::MalformedResponse(message) => {
                write!(f, "malformed completion response: {message}")
            }
            Self::Unexpected { status, body } => {
                write!(f, "unknown error, status code {status}: {body}")
            }
        }
    }
}

impl std::error::Error for ChatApiError {}

impl From<reqwest::Error> for ChatApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Map a non-success HTTP status plus its body into the failure taxonomy.
pub fn classify_failure(status: StatusCode, body: &str) -> ChatApiError {
    match status.as_u16() {
        400 => classify_bad_request(status, body),
        401 => ChatApiError::InvalidCredentials,
        429 => ChatApiError::RateLimited,
        500 => ChatApiError::ServerError,
        502 | 503 => ChatApiError::Overloaded,
        _ => ChatApiError::Unexpected {
            status,
            body: body.to_string(),
        },
    }
}

fn classify_bad_request(status: StatusCode, body: &str) -> ChatApiError {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(error) = payload.value {
            if error.code.as_deref() == Some(CONTEXT_LENGTH_CODE) {
                return ChatApiError::ContextLengthExceeded;
            }
            if let Some(message) = error.message.filter(|value| !value.is_empty()) {
                return ChatApiError::InvalidRequest(message);
            }
        }
    }

    ChatApiError::InvalidRequest(fallback_message(status, body))
}

pub(crate) fn fallback_message(status: StatusCode, body: &str) -> String {
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
