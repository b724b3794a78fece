//! Customer use-case service.
//!
//! # Invariants
//! - A customer is only created or updated with an owner that exists in the
//!   same unit of work.
//! - Deleting a customer deletes its notes first, then the customer, in one
//!   transaction.

use crate::error::{CoreError, CoreResult};
use crate::model::customer::{Customer, NewCustomer};
use crate::model::{CustomerId, EmployeeId, EntityKind};
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::PageQuery;
use crate::service::entity_validator::EntityValidator;
use crate::service::{ensure_positive_ids, in_transaction, ListResult};
use log::info;
use rusqlite::Connection;

/// Customer service over one connection.
pub struct CustomerService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> CustomerService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    pub fn create_customer(&mut self, customer: &NewCustomer) -> CoreResult<Customer> {
        ensure_positive_ids(
            "owning employee ID must be a positive number",
            &[customer.employee_id],
        )?;
        customer.validate()?;
        let created = in_transaction(self.conn, "create_customer", |tx| {
            EntityValidator::new(tx).ensure_employee_exists(customer.employee_id)?;
            Ok(SqliteCustomerRepository::new(tx).create_customer(customer)?)
        })?;
        info!(
            "event=customer_create module=customer status=ok customer_id={} employee_id={}",
            created.id, created.employee_id
        );
        Ok(created)
    }

    pub fn get_customer(&self, id: CustomerId) -> CoreResult<Customer> {
        SqliteCustomerRepository::new(self.conn)
            .get_customer(id)?
            .ok_or(CoreError::not_found(EntityKind::Customer, id))
    }

    pub fn list_customers(&self, page: &PageQuery) -> CoreResult<ListResult<Customer>> {
        let items = SqliteCustomerRepository::new(self.conn).list_customers(page)?;
        Ok(ListResult {
            items,
            applied_limit: page.applied_limit(),
        })
    }

    /// Lists customers owned by an existing employee.
    pub fn list_customers_by_employee(&self, employee_id: EmployeeId) -> CoreResult<Vec<Customer>> {
        EntityValidator::new(self.conn).ensure_employee_exists(employee_id)?;
        Ok(SqliteCustomerRepository::new(self.conn).find_customers_by_employee(employee_id)?)
    }

    pub fn find_customer_by_email(&self, email: &str) -> CoreResult<Option<Customer>> {
        Ok(SqliteCustomerRepository::new(self.conn).find_customer_by_email(email)?)
    }

    /// Replaces a customer's fields. An owner change is validated like a
    /// reassignment.
    pub fn update_customer(&mut self, customer: &Customer) -> CoreResult<Customer> {
        ensure_positive_ids(
            "customer and employee IDs must be positive numbers",
            &[customer.id, customer.employee_id],
        )?;
        customer.validate()?;
        in_transaction(self.conn, "update_customer", |tx| {
            let validator = EntityValidator::new(tx);
            validator.ensure_customer_exists(customer.id)?;
            validator.ensure_employee_exists(customer.employee_id)?;
            SqliteCustomerRepository::new(tx).update_customer(customer)?;
            Ok(customer.clone())
        })
    }

    /// Deletes the customer's notes, then the customer. Returns the number
    /// of notes removed.
    pub fn delete_customer(&mut self, id: CustomerId) -> CoreResult<usize> {
        ensure_positive_ids("customer ID must be a positive number", &[id])?;
        let removed_notes = in_transaction(self.conn, "delete_customer", |tx| {
            EntityValidator::new(tx).ensure_customer_exists(id)?;
            let removed = SqliteNoteRepository::new(tx).delete_notes_for_customer(id)?;
            SqliteCustomerRepository::new(tx).delete_customer(id)?;
            Ok(removed)
        })?;
        info!(
            "event=customer_delete module=customer status=ok customer_id={} removed_notes={}",
            id, removed_notes
        );
        Ok(removed_notes)
    }
}
