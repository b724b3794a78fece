//! Employee repository contract and SQLite implementation.
//!
//! # Invariants
//! - `delete_employee` is a raw row delete. Callers must have moved every
//!   owned customer first; the `customers.employee_id` foreign key rejects
//!   the delete otherwise.

use crate::model::employee::{Employee, NewEmployee};
use crate::model::{EmployeeId, EntityKind};
use crate::repo::{row_exists, PageQuery, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    department
FROM employees";

/// Query options for listing/searching employees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeListQuery {
    /// Case-insensitive substring matched against first name or department.
    pub search: Option<String>,
    pub page: PageQuery,
}

/// Repository interface for employee records.
pub trait EmployeeRepository {
    fn create_employee(&self, employee: &NewEmployee) -> RepoResult<Employee>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool>;
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>>;
    fn find_employee_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
    /// Returns whether any customer is currently owned by the employee.
    fn has_customers(&self, id: EmployeeId) -> RepoResult<bool>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &NewEmployee) -> RepoResult<Employee> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (first_name, last_name, email, department)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                employee.first_name.trim(),
                employee.last_name.trim(),
                employee.email.trim(),
                employee.department.trim(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_employee(id)?
            .ok_or(RepoError::NotFound(EntityKind::Employee, id))
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool> {
        row_exists(self.conn, "employees", id)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                first_name = ?1,
                last_name = ?2,
                email = ?3,
                department = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                employee.first_name.trim(),
                employee.last_name.trim(),
                employee.email.trim(),
                employee.department.trim(),
                employee.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Employee, employee.id));
        }
        Ok(())
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Employee, id));
        }
        Ok(())
    }

    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>> {
        let mut sql = format!("{EMPLOYEE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                sql.push_str(
                    " AND (first_name LIKE ? ESCAPE '\\' OR department LIKE ? ESCAPE '\\')",
                );
                let pattern = format!("%{}%", escape_like(search));
                bind_values.push(Value::Text(pattern.clone()));
                bind_values.push(Value::Text(pattern));
            }
        }

        sql.push_str(" ORDER BY id ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(query.page.applied_limit())));
        if query.page.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.page.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn find_employee_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        let id: Option<EmployeeId> = self
            .conn
            .query_row(
                "SELECT id FROM employees WHERE email = ?1 COLLATE NOCASE ORDER BY id LIMIT 1;",
                [email.trim()],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.get_employee(id),
            None => Ok(None),
        }
    }

    fn has_customers(&self, id: EmployeeId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE employee_id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let employee = Employee {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        department: row.get("department")?,
    };
    employee.validate().map_err(|err| {
        RepoError::InvalidData(format!("employee {} failed validation: {err}", employee.id))
    })?;
    Ok(employee)
}

// LIKE is case-insensitive for ASCII in SQLite; only the wildcards need escaping.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("sales"), "sales");
    }
}
