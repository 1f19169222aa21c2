use chat_api::{normalize_chat_url, DEFAULT_CHAT_BASE_URL};

#[test]
fn empty_input_uses_default_base_url() {
    assert_eq!(
        normalize_chat_url(""),
        format!("{DEFAULT_CHAT_BASE_URL}/chat/completions")
    );
    assert_eq!(
        normalize_chat_url("   "),
        format!("{DEFAULT_CHAT_BASE_URL}/chat/completions")
    );
}

#[test]
fn full_endpoint_is_kept_unchanged() {
    assert_eq!(
        normalize_chat_url("https://api.openai.com/v1/chat/completions"),
        "https://api.openai.com/v1/chat/completions"
    );
}

#[test]
fn v1_suffix_appends_chat_completions() {
    assert_eq!(
        normalize_chat_url("https://api.openai.com/v1"),
        "https://api.openai.com/v1/chat/completions"
    );
    assert_eq!(
        normalize_chat_url("https://api.openai.com/v1/"),
        "https://api.openai.com/v1/chat/completions"
    );
}

#[test]
fn bare_host_appends_full_path() {
    assert_eq!(
        normalize_chat_url("http://localhost:11434"),
        "http://localhost:11434/v1/chat/completions"
    );
}

#[test]
fn trailing_slashes_are_trimmed_before_normalization() {
    assert_eq!(
        normalize_chat_url("http://localhost:11434///"),
        "http://localhost:11434/v1/chat/completions"
    );
}
