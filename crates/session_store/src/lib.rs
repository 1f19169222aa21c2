//! Durable session snapshots for conversation resumption.
//!
//! One process run owns exactly one session file, named after the run's
//! start timestamp (second resolution) and overwritten wholesale after every
//! successful turn. Earlier runs' files are never touched; concurrent
//! processes are not coordinated.

mod error;
mod paths;
mod schema;
mod store;

pub use error::SessionStoreError;
pub use paths::{session_file_name, timestamp_from_file_name, SESSION_FILE_PREFIX};
pub use schema::SessionRecord;
pub use store::SessionStore;
