use std::path::PathBuf;

/// Directory name under the user config dir that owns all durable state.
pub const APP_DIR: &str = "repo-chat";
/// Subdirectory holding one session record per process run.
pub const SESSION_HISTORY_DIR: &str = "session-history";
/// Prompt-history file consumed by the line editor.
pub const HISTORY_FILE: &str = "history";

/// Runtime settings assembled from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub json_mode: bool,
    pub non_interactive: bool,
}

/// Root directory for config, prompt history, and session records.
#[must_use]
pub fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[must_use]
pub fn session_history_root() -> PathBuf {
    config_root().join(SESSION_HISTORY_DIR)
}

#[must_use]
pub fn history_file() -> PathBuf {
    config_root().join(HISTORY_FILE)
}
