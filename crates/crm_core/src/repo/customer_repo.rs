//! Customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist customer profiles and their owning-employee reference.
//! - Answer "which customers does employee X own" by query.
//!
//! # Invariants
//! - Ownership is never cached on the employee side; `find_customers_by_employee`
//!   is the only way to enumerate owned customers.
//! - `delete_customer` does not cascade. Notes must be removed first.

use crate::model::customer::{Customer, NewCustomer};
use crate::model::{CustomerId, EmployeeId, EntityKind};
use crate::repo::{date_to_db, parse_date, row_exists, PageQuery, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CUSTOMER_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    phone,
    address,
    last_interaction_date,
    employee_id
FROM customers";

const CUSTOMER_UPDATE_SQL: &str = "UPDATE customers
SET
    first_name = ?1,
    last_name = ?2,
    email = ?3,
    phone = ?4,
    address = ?5,
    last_interaction_date = ?6,
    employee_id = ?7,
    updated_at = (strftime('%s', 'now') * 1000)
WHERE id = ?8;";

/// Repository interface for customer records.
pub trait CustomerRepository {
    fn create_customer(&self, customer: &NewCustomer) -> RepoResult<Customer>;
    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    fn customer_exists(&self, id: CustomerId) -> RepoResult<bool>;
    fn update_customer(&self, customer: &Customer) -> RepoResult<()>;
    /// Persists a batch of customers. Stops at the first failing row.
    fn save_all_customers(&self, customers: &[Customer]) -> RepoResult<()>;
    fn delete_customer(&self, id: CustomerId) -> RepoResult<()>;
    fn find_customers_by_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Customer>>;
    fn list_customers(&self, page: &PageQuery) -> RepoResult<Vec<Customer>>;
    fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn write_customer(&self, customer: &Customer) -> RepoResult<()> {
        customer.validate()?;

        let mut stmt = self.conn.prepare_cached(CUSTOMER_UPDATE_SQL)?;
        let changed = stmt.execute(params![
            customer.first_name.trim(),
            customer.last_name.trim(),
            customer.email.trim(),
            customer.phone.trim(),
            customer.address.as_deref(),
            customer.last_interaction_date.map(date_to_db),
            customer.employee_id,
            customer.id,
        ])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Customer, customer.id));
        }
        Ok(())
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn create_customer(&self, customer: &NewCustomer) -> RepoResult<Customer> {
        customer.validate()?;

        self.conn.execute(
            "INSERT INTO customers (
                first_name,
                last_name,
                email,
                phone,
                address,
                last_interaction_date,
                employee_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                customer.first_name.trim(),
                customer.last_name.trim(),
                customer.email.trim(),
                customer.phone.trim(),
                customer.address.as_deref(),
                customer.last_interaction_date.map(date_to_db),
                customer.employee_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_customer(id)?
            .ok_or(RepoError::NotFound(EntityKind::Customer, id))
    }

    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_customer_row(row)?));
        }
        Ok(None)
    }

    fn customer_exists(&self, id: CustomerId) -> RepoResult<bool> {
        row_exists(self.conn, "customers", id)
    }

    fn update_customer(&self, customer: &Customer) -> RepoResult<()> {
        self.write_customer(customer)
    }

    fn save_all_customers(&self, customers: &[Customer]) -> RepoResult<()> {
        for customer in customers {
            self.write_customer(customer)?;
        }
        Ok(())
    }

    fn delete_customer(&self, id: CustomerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Customer, id));
        }
        Ok(())
    }

    fn find_customers_by_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CUSTOMER_SELECT_SQL} WHERE employee_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([employee_id])?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }
        Ok(customers)
    }

    fn list_customers(&self, page: &PageQuery) -> RepoResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CUSTOMER_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![
            i64::from(page.applied_limit()),
            i64::from(page.offset)
        ])?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }
        Ok(customers)
    }

    fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let id: Option<CustomerId> = self
            .conn
            .query_row(
                "SELECT id FROM customers WHERE email = ?1 COLLATE NOCASE ORDER BY id LIMIT 1;",
                [email.trim()],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.get_customer(id),
            None => Ok(None),
        }
    }
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let last_interaction_date = match row.get::<_, Option<String>>("last_interaction_date")? {
        Some(value) => Some(parse_date(&value, "customers.last_interaction_date")?),
        None => None,
    };

    let customer = Customer {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        address: row.get("address")?,
        last_interaction_date,
        employee_id: row.get("employee_id")?,
    };
    customer.validate().map_err(|err| {
        RepoError::InvalidData(format!("customer {} failed validation: {err}", customer.id))
    })?;
    Ok(customer)
}
