//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one data access contract per record collection.
//! - Isolate SQLite query details from service/orchestration code.
//!
//! # Invariants
//! - Repository writes call the record's `validate()` before SQL mutations.
//! - Update/delete of a missing row returns `RepoError::NotFound`.
//! - Repositories borrow a `Connection`; handing them a `Transaction` makes
//!   every call part of the caller's unit of work.

pub mod archive_repo;
pub mod customer_repo;
pub mod employee_repo;
pub mod note_repo;

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_PAGE_LIMIT: u32 = 20;
const MAX_PAGE_LIMIT: u32 = 100;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(EntityKind, i64),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(kind, id) => write!(f, "{kind} not found with ID: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(..) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Offset pagination options shared by list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Maximum rows to return. Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

impl PageQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }

    /// Effective limit after defaulting and clamping.
    pub fn applied_limit(&self) -> u32 {
        normalize_page_limit(self.limit)
    }
}

/// Normalizes list limit according to the pagination contract.
pub fn normalize_page_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => DEFAULT_PAGE_LIMIT,
        Some(value) if value > MAX_PAGE_LIMIT => MAX_PAGE_LIMIT,
        Some(value) => value,
    }
}

pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &'static str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{value}` in {column}")))
}

#[cfg(test)]
mod tests {
    use super::{normalize_page_limit, parse_date, PageQuery};

    #[test]
    fn page_limit_defaults_and_clamps() {
        assert_eq!(normalize_page_limit(None), 20);
        assert_eq!(normalize_page_limit(Some(0)), 20);
        assert_eq!(normalize_page_limit(Some(500)), 100);
        assert_eq!(PageQuery::new(5, 0).applied_limit(), 5);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2024-02-30", "notes.date").is_err());
        assert!(parse_date("2024-02-29", "notes.date").is_ok());
    }
}
