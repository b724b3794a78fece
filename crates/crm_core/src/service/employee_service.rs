//! Employee use-case service.
//!
//! # Invariants
//! - An employee that still owns customers cannot be deleted here; the
//!   retirement workflow in `orchestrator` is the only removal path for it.
//! - Email addresses are unique across active employees (case-insensitive).

use crate::error::{CoreError, CoreResult};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::{EmployeeId, EntityKind};
use crate::repo::employee_repo::{EmployeeListQuery, EmployeeRepository, SqliteEmployeeRepository};
use crate::service::entity_validator::EntityValidator;
use crate::service::{ensure_positive_ids, in_transaction, ListResult};
use log::info;
use rusqlite::Connection;

/// Employee service over one connection.
pub struct EmployeeService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> EmployeeService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    pub fn create_employee(&mut self, employee: &NewEmployee) -> CoreResult<Employee> {
        employee.validate()?;
        let created = in_transaction(self.conn, "create_employee", |tx| {
            let repo = SqliteEmployeeRepository::new(tx);
            ensure_email_free(&repo, &employee.email, None)?;
            Ok(repo.create_employee(employee)?)
        })?;
        info!(
            "event=employee_create module=employee status=ok employee_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn get_employee(&self, id: EmployeeId) -> CoreResult<Employee> {
        SqliteEmployeeRepository::new(self.conn)
            .get_employee(id)?
            .ok_or(CoreError::not_found(EntityKind::Employee, id))
    }

    /// Lists employees, optionally filtered by first name or department.
    pub fn list_employees(&self, query: &EmployeeListQuery) -> CoreResult<ListResult<Employee>> {
        let items = SqliteEmployeeRepository::new(self.conn).list_employees(query)?;
        Ok(ListResult {
            items,
            applied_limit: query.page.applied_limit(),
        })
    }

    pub fn find_employee_by_email(&self, email: &str) -> CoreResult<Option<Employee>> {
        Ok(SqliteEmployeeRepository::new(self.conn).find_employee_by_email(email)?)
    }

    /// Replaces every profile field of an existing employee.
    pub fn update_employee(&mut self, employee: &Employee) -> CoreResult<Employee> {
        ensure_positive_ids("employee ID must be a positive number", &[employee.id])?;
        employee.validate()?;
        in_transaction(self.conn, "update_employee", |tx| {
            EntityValidator::new(tx).ensure_employee_exists(employee.id)?;
            let repo = SqliteEmployeeRepository::new(tx);
            ensure_email_free(&repo, &employee.email, Some(employee.id))?;
            repo.update_employee(employee)?;
            Ok(employee.clone())
        })
    }

    /// Applies the present fields of `patch`; an empty patch is a no-op read.
    pub fn patch_employee(
        &mut self,
        id: EmployeeId,
        patch: &EmployeePatch,
    ) -> CoreResult<Employee> {
        ensure_positive_ids("employee ID must be a positive number", &[id])?;
        in_transaction(self.conn, "patch_employee", |tx| {
            let repo = SqliteEmployeeRepository::new(tx);
            let mut employee = repo
                .get_employee(id)?
                .ok_or(CoreError::not_found(EntityKind::Employee, id))?;
            if patch.is_empty() {
                return Ok(employee);
            }
            employee.apply_patch(patch);
            employee.validate()?;
            if patch.email.is_some() {
                ensure_email_free(&repo, &employee.email, Some(id))?;
            }
            repo.update_employee(&employee)?;
            Ok(employee)
        })
    }

    /// Deletes an employee that owns no customers.
    pub fn delete_employee(&mut self, id: EmployeeId) -> CoreResult<()> {
        ensure_positive_ids("employee ID must be a positive number", &[id])?;
        in_transaction(self.conn, "delete_employee", |tx| {
            let validator = EntityValidator::new(tx);
            validator.ensure_employee_exists(id)?;
            if validator.employee_has_customers(id)? {
                return Err(CoreError::invalid_argument(format!(
                    "employee {id} still owns customers; retire the employee instead"
                )));
            }
            SqliteEmployeeRepository::new(tx).delete_employee(id)?;
            Ok(())
        })?;
        info!("event=employee_delete module=employee status=ok employee_id={id}");
        Ok(())
    }
}

fn ensure_email_free(
    repo: &SqliteEmployeeRepository<'_>,
    email: &str,
    owner: Option<EmployeeId>,
) -> CoreResult<()> {
    match repo.find_employee_by_email(email)? {
        Some(existing) if Some(existing.id) != owner => Err(CoreError::invalid_argument(format!(
            "email `{}` is already used by employee {}",
            email.trim(),
            existing.id
        ))),
        _ => Ok(()),
    }
}
