use chat_api::{normalize_chat_url, ChatApiClient, ChatApiConfig, ChatApiError, ChatMessage, ChatRequest};

#[test]
fn http_request_targets_normalized_chat_endpoint() {
    let config = ChatApiConfig::new("sk-test").with_base_url("https://api.openai.com/v1");
    let client = ChatApiClient::new(config).expect("client should build");
    let request = ChatRequest::new("gpt-4", 1.0, vec![ChatMessage::user("payload")]);

    let http_request = client
        .build_request(&request)
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(
        http_request.url().as_str(),
        normalize_chat_url("https://api.openai.com/v1")
    );
    assert_eq!(http_request.method(), "POST");
}

#[test]
fn http_request_carries_bearer_authorization_and_json_content_type() {
    let config = ChatApiConfig::new("sk-test");
    let client = ChatApiClient::new(config).expect("client should build");
    let request = ChatRequest::new("gpt-4", 1.0, vec![ChatMessage::user("payload")]);

    let http_request = client
        .build_request(&request)
        .expect("build request")
        .build()
        .expect("request");

    let headers = http_request.headers();
    assert_eq!(
        headers
            .get("authorization")
            .expect("authorization header present"),
        "Bearer sk-test"
    );
    assert_eq!(
        headers.get("content-type").expect("content type present"),
        "application/json"
    );
}

#[test]
fn empty_api_key_is_rejected_at_construction() {
    let error = ChatApiClient::new(ChatApiConfig::new("   "))
        .err()
        .expect("blank api key must fail");
    assert!(matches!(error, ChatApiError::MissingApiKey));
}
