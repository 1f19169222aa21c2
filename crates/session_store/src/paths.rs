use std::sync::OnceLock;

use time::format_description::{self, FormatItem};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::SessionStoreError;

pub const SESSION_FILE_PREFIX: &str = "chat-session-";
pub const SESSION_FILE_SUFFIX: &str = ".json";

/// `YYYYMMDD-HHMMSS`, zero padded so lexicographic order of file names is
/// chronological.
fn timestamp_format() -> &'static [FormatItem<'static>] {
    static FORMAT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FORMAT.get_or_init(|| {
        format_description::parse("[year][month][day]-[hour][minute][second]")
            .expect("timestamp format must parse")
    })
}

pub(crate) fn format_timestamp(moment: OffsetDateTime) -> Result<String, SessionStoreError> {
    moment
        .format(timestamp_format())
        .map_err(SessionStoreError::ClockFormat)
}

pub(crate) fn is_valid_timestamp(value: &str) -> bool {
    PrimitiveDateTime::parse(value, timestamp_format()).is_ok()
}

#[must_use]
pub fn session_file_name(timestamp: &str) -> String {
    format!("{SESSION_FILE_PREFIX}{timestamp}{SESSION_FILE_SUFFIX}")
}

/// Extracts the timestamp key from a session file name; `None` for file
/// names outside the expected pattern.
#[must_use]
pub fn timestamp_from_file_name(name: &str) -> Option<&str> {
    let timestamp = name
        .strip_prefix(SESSION_FILE_PREFIX)?
        .strip_suffix(SESSION_FILE_SUFFIX)?;
    is_valid_timestamp(timestamp).then_some(timestamp)
}
