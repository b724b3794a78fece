//! Archived employee repository contract and SQLite implementation.
//!
//! Archive rows are insert-only; there is no update or delete path.

use crate::model::archived_employee::{ArchivedEmployee, EmployeeSnapshot};
use crate::model::{ArchivedEmployeeId, EmployeeId, EntityKind};
use crate::repo::{PageQuery, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ARCHIVE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    department,
    original_employee_id
FROM archived_employees";

/// Repository interface for archived employee snapshots.
pub trait ArchivedEmployeeRepository {
    fn create_archived_employee(&self, snapshot: &EmployeeSnapshot)
        -> RepoResult<ArchivedEmployee>;
    fn get_archived_employee(&self, id: ArchivedEmployeeId)
        -> RepoResult<Option<ArchivedEmployee>>;
    fn exists_by_original_employee_id(&self, original_id: EmployeeId) -> RepoResult<bool>;
    fn find_by_original_employee_id(
        &self,
        original_id: EmployeeId,
    ) -> RepoResult<Option<ArchivedEmployee>>;
    fn list_archived_employees(&self, page: &PageQuery) -> RepoResult<Vec<ArchivedEmployee>>;
}

/// SQLite-backed archive repository.
pub struct SqliteArchivedEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArchivedEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArchivedEmployeeRepository for SqliteArchivedEmployeeRepository<'_> {
    fn create_archived_employee(
        &self,
        snapshot: &EmployeeSnapshot,
    ) -> RepoResult<ArchivedEmployee> {
        self.conn.execute(
            "INSERT INTO archived_employees (
                first_name,
                last_name,
                email,
                department,
                original_employee_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                snapshot.first_name.as_str(),
                snapshot.last_name.as_str(),
                snapshot.email.as_str(),
                snapshot.department.as_str(),
                snapshot.original_employee_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_archived_employee(id)?
            .ok_or(RepoError::NotFound(EntityKind::ArchivedEmployee, id))
    }

    fn get_archived_employee(
        &self,
        id: ArchivedEmployeeId,
    ) -> RepoResult<Option<ArchivedEmployee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARCHIVE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_archive_row(row)?));
        }
        Ok(None)
    }

    fn exists_by_original_employee_id(&self, original_id: EmployeeId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM archived_employees WHERE original_employee_id = ?1
            );",
            [original_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_by_original_employee_id(
        &self,
        original_id: EmployeeId,
    ) -> RepoResult<Option<ArchivedEmployee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARCHIVE_SELECT_SQL} WHERE original_employee_id = ?1 ORDER BY id DESC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([original_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_archive_row(row)?));
        }
        Ok(None)
    }

    fn list_archived_employees(&self, page: &PageQuery) -> RepoResult<Vec<ArchivedEmployee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARCHIVE_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![
            i64::from(page.applied_limit()),
            i64::from(page.offset)
        ])?;
        let mut archived = Vec::new();
        while let Some(row) = rows.next()? {
            archived.push(parse_archive_row(row)?);
        }
        Ok(archived)
    }
}

fn parse_archive_row(row: &Row<'_>) -> RepoResult<ArchivedEmployee> {
    Ok(ArchivedEmployee {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        department: row.get("department")?,
        original_employee_id: row.get("original_employee_id")?,
    })
}
