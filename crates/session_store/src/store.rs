use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use crate::error::SessionStoreError;
use crate::paths::{format_timestamp, session_file_name, timestamp_from_file_name};
use crate::schema::SessionRecord;

/// Owns the single session file for the current process run.
#[derive(Debug)]
pub struct SessionStore {
    root: PathBuf,
    path: PathBuf,
    timestamp: String,
}

impl SessionStore {
    /// Binds a store to the file named after `started_at` (second
    /// resolution), creating the session-history directory when missing.
    /// Nothing is written until the first [`SessionStore::save`].
    pub fn create(
        root: impl Into<PathBuf>,
        started_at: OffsetDateTime,
    ) -> Result<Self, SessionStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| {
            SessionStoreError::io("creating session directory", &root, source)
        })?;

        let timestamp = format_timestamp(started_at)?;
        let path = root.join(session_file_name(&timestamp));

        Ok(Self {
            root,
            path,
            timestamp,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Overwrites this run's session file with `record`, returning the
    /// destination path.
    pub fn save(&self, record: &SessionRecord) -> Result<&Path, SessionStoreError> {
        let body = serde_json::to_string_pretty(record)
            .map_err(|source| SessionStoreError::json_serialize(&self.path, source))?;
        fs::write(&self.path, body)
            .map_err(|source| SessionStoreError::io("writing session file", &self.path, source))?;
        Ok(&self.path)
    }

    /// Lists restorable session timestamps under `root`, oldest first.
    ///
    /// File names outside the expected pattern are ignored; a missing
    /// directory lists as empty.
    pub fn list_available(root: &Path) -> Result<Vec<String>, SessionStoreError> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SessionStoreError::io(
                    "listing session directory",
                    root,
                    source,
                ))
            }
        };

        let mut timestamps = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| {
                SessionStoreError::io("listing session directory", root, source)
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(timestamp) = timestamp_from_file_name(name) {
                timestamps.push(timestamp.to_string());
            }
        }

        timestamps.sort();
        Ok(timestamps)
    }

    /// Loads the record saved at `target`: a `YYYYMMDD-HHMMSS` timestamp or
    /// the literal `"last"`, which resolves to the newest available save.
    pub fn load(root: &Path, target: &str) -> Result<SessionRecord, SessionStoreError> {
        let timestamp = if target == "last" {
            Self::list_available(root)?
                .pop()
                .ok_or_else(|| SessionStoreError::NoSessionsFound {
                    root: root.to_path_buf(),
                })?
        } else {
            target.to_string()
        };

        let path = root.join(session_file_name(&timestamp));
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Err(SessionStoreError::SessionNotFound {
                    root: root.to_path_buf(),
                    target: timestamp,
                })
            }
            Err(source) => {
                return Err(SessionStoreError::io("reading session file", &path, source))
            }
        };

        serde_json::from_str(&body).map_err(|source| SessionStoreError::json_parse(&path, source))
    }
}
