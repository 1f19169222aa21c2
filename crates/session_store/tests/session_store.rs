use chat_api::ChatMessage;
use session_store::{session_file_name, SessionRecord, SessionStore, SessionStoreError};
use tempfile::TempDir;
use time::OffsetDateTime;

fn moment(unix: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(unix).expect("epoch timestamp should convert")
}

fn sample_record() -> SessionRecord {
    SessionRecord {
        model: "gpt-4".to_string(),
        messages: vec![
            ChatMessage::system("be terse"),
            ChatMessage::user("explain foo()"),
            ChatMessage::assistant("foo returns 1"),
        ],
        prompt_tokens: 120,
        completion_tokens: 45,
    }
}

#[test]
fn create_names_file_after_start_timestamp_and_writes_nothing() {
    let dir = TempDir::new().expect("tempdir should be created");
    let store =
        SessionStore::create(dir.path(), moment(1_700_000_000)).expect("create should succeed");

    assert!(store.path().starts_with(dir.path()));
    assert_eq!(
        store.path().file_name().and_then(|name| name.to_str()),
        Some(session_file_name(store.timestamp()).as_str())
    );
    assert!(!store.path().exists());
}

#[test]
fn save_then_load_round_trips_the_record() {
    let dir = TempDir::new().expect("tempdir should be created");
    let store =
        SessionStore::create(dir.path(), moment(1_700_000_000)).expect("create should succeed");
    let record = sample_record();

    let path = store.save(&record).expect("save should succeed");
    assert!(path.exists());

    let loaded =
        SessionStore::load(dir.path(), store.timestamp()).expect("load should succeed");
    assert_eq!(loaded, record);
}

#[test]
fn save_overwrites_the_same_file_in_place() {
    let dir = TempDir::new().expect("tempdir should be created");
    let store =
        SessionStore::create(dir.path(), moment(1_700_000_000)).expect("create should succeed");

    let mut record = sample_record();
    store.save(&record).expect("first save should succeed");

    record.messages.push(ChatMessage::user("and bar()?"));
    record.prompt_tokens += 50;
    store.save(&record).expect("second save should succeed");

    let available = SessionStore::list_available(dir.path()).expect("list should succeed");
    assert_eq!(available.len(), 1);

    let loaded =
        SessionStore::load(dir.path(), store.timestamp()).expect("load should succeed");
    assert_eq!(loaded, record);
}

#[test]
fn list_available_sorts_timestamps_and_ignores_unrelated_files() {
    let dir = TempDir::new().expect("tempdir should be created");
    for timestamp in ["20260203-120000", "20260201-120000", "20260202-120000"] {
        std::fs::write(dir.path().join(session_file_name(timestamp)), "{}")
            .expect("session file should be written");
    }
    std::fs::write(dir.path().join("notes.json"), "{}").expect("decoy file should be written");
    std::fs::write(dir.path().join("chat-session-garbage.json"), "{}")
        .expect("decoy file should be written");

    let available = SessionStore::list_available(dir.path()).expect("list should succeed");
    assert_eq!(
        available,
        vec!["20260201-120000", "20260202-120000", "20260203-120000"]
    );
}

#[test]
fn list_available_of_missing_directory_is_empty() {
    let dir = TempDir::new().expect("tempdir should be created");
    let missing = dir.path().join("never-created");

    let available = SessionStore::list_available(&missing).expect("list should succeed");
    assert!(available.is_empty());
}

#[test]
fn load_last_returns_the_newest_save() {
    let dir = TempDir::new().expect("tempdir should be created");

    for (unix, marker) in [
        (1_700_000_000, "first"),
        (1_700_000_100, "second"),
        (1_700_000_200, "third"),
    ] {
        let store = SessionStore::create(dir.path(), moment(unix)).expect("create should succeed");
        let mut record = sample_record();
        record.messages.push(ChatMessage::assistant(marker));
        store.save(&record).expect("save should succeed");
    }

    let loaded = SessionStore::load(dir.path(), "last").expect("load last should succeed");
    assert_eq!(
        loaded.messages.last(),
        Some(&ChatMessage::assistant("third"))
    );
}

#[test]
fn load_missing_timestamp_fails_with_session_not_found() {
    let dir = TempDir::new().expect("tempdir should be created");

    let error = SessionStore::load(dir.path(), "20260101-000000")
        .expect_err("missing timestamp must fail");
    assert!(matches!(
        error,
        SessionStoreError::SessionNotFound { target, .. } if target == "20260101-000000"
    ));
}

#[test]
fn load_last_with_no_saves_fails_with_no_sessions_found() {
    let dir = TempDir::new().expect("tempdir should be created");

    let error = SessionStore::load(dir.path(), "last").expect_err("empty directory must fail");
    assert!(matches!(error, SessionStoreError::NoSessionsFound { .. }));
}

#[test]
fn load_rejects_corrupt_record_with_parse_error() {
    let dir = TempDir::new().expect("tempdir should be created");
    std::fs::write(
        dir.path().join(session_file_name("20260101-000000")),
        "{ this is invalid json",
    )
    .expect("corrupt file should be written");

    let error =
        SessionStore::load(dir.path(), "20260101-000000").expect_err("corrupt record must fail");
    assert!(matches!(error, SessionStoreError::JsonParse { .. }));
}

#[test]
fn create_fails_when_session_root_is_unwritable() {
    let dir = TempDir::new().expect("tempdir should be created");
    let blocked_root = dir.path().join("sessions");
    std::fs::write(&blocked_root, "file blocks directory creation")
        .expect("blocker file should be created");

    let error = SessionStore::create(&blocked_root, moment(1_700_000_000))
        .expect_err("create should fail when the root cannot be created");
    assert!(matches!(error, SessionStoreError::Io { .. }));
}
