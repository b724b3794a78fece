//! Storage bootstrap for the CRM ledger.
//!
//! Every connection handed out here enforces `customers.employee_id ->
//! employees.id`, so an orphaned customer is rejected by SQLite itself even
//! when a caller skips the orchestrator.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
pub use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `PRAGMA foreign_keys` did not stick (e.g. inside an open transaction).
    ForeignKeysDisabled,
    /// Existing rows reference a parent that does not exist.
    DanglingReference {
        table: String,
        rowid: i64,
        parent: String,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::ForeignKeysDisabled => {
                write!(f, "sqlite refused to enable foreign key enforcement")
            }
            Self::DanglingReference {
                table,
                rowid,
                parent,
            } => write!(
                f,
                "{table} row {rowid} references a missing {parent} record"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
