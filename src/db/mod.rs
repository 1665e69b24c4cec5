pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;

/// Shared database handle. The pipeline's blocking writes hold the lock for
/// the duration of one transaction only; no lock spans external I/O.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Wrap a connection for sharing with the pipeline.
pub fn shared(conn: Connection) -> SharedConnection {
    Arc::new(Mutex::new(conn))
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Storage task failed: {0}")]
    Task(String),
}
