use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;

use crate::config::ChatApiConfig;
use crate::error::{classify_failure, fallback_message, ChatApiError};
use crate::payload::{ChatMessage, ChatRequest, ChatResponse, Usage};
use crate::url::normalize_chat_url;

/// Parsed success outcome: the assistant's message plus reported usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub message: ChatMessage,
    pub usage: Usage,
}

#[derive(Debug)]
pub struct ChatApiClient {
    http: Client,
    config: ChatApiConfig,
}

impl ChatApiClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ChatApiError::MissingApiKey);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_chat_url(&self.config.base_url)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, ChatApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let bearer = format!("Bearer {}", self.config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|_| ChatApiError::MissingApiKey)?,
        );

        if let Some(user_agent) = self.config.user_agent.as_deref() {
            headers.insert(
                USER_AGENT,
                HeaderValue::from_str(user_agent).map_err(|_| {
                    ChatApiError::InvalidBaseUrl(format!("invalid user agent: {user_agent}"))
                })?,
            );
        }

        Ok(headers)
    }

    pub fn build_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, ChatApiError> {
        let headers = self.build_headers()?;
        Ok(self
            .http
            .post(self.normalized_endpoint())
            .headers(headers)
            .json(request))
    }

    /// Performs one completion call.
    ///
    /// Connection-level failures surface as [`ChatApiError::Network`];
    /// non-success statuses go through [`classify_failure`]; a success body
    /// that does not match the expected shape is [`ChatApiError::MalformedResponse`].
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatApiError> {
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(ChatApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| fallback_message(status, ""));
            return Err(classify_failure(status, &body));
        }

        let body = response.text().await.map_err(ChatApiError::Network)?;
        parse_completion(&body)
    }
}

pub(crate) fn parse_completion(body: &str) -> Result<ChatCompletion, ChatApiError> {
    let payload: ChatResponse = serde_json::from_str(body)
        .map_err(|error| ChatApiError::MalformedResponse(error.to_string()))?;

    let message = payload
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| ChatApiError::MalformedResponse("response contained no choices".to_string()))?;

    Ok(ChatCompletion {
        message,
        usage: payload.usage,
    })
}
