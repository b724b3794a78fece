//! Employee/customer ownership reassignment orchestrator.
//!
//! # Responsibility
//! - Reassign one customer, bulk-reassign all customers of an employee, and
//!   retire an employee (reassign, archive, remove) as single units of work.
//!
//! # Invariants
//! - Every customer's `employee_id` resolves to an existing employee after
//!   each call returns, and at every point visible to other connections.
//! - Retirement moves customers before the employee row is deleted, and
//!   archives before deleting so the snapshot reads a live row.
//! - A failed call leaves no partial state behind.
//!
//! # Concurrency
//! - Each call holds an IMMEDIATE transaction, so the "find owned customers"
//!   read and the owner rewrite cannot interleave with another writer.

use crate::error::{CoreError, CoreResult};
use crate::model::archived_employee::ArchivedEmployee;
use crate::model::customer::Customer;
use crate::model::{CustomerId, EmployeeId, EntityKind};
use crate::repo::archive_repo::SqliteArchivedEmployeeRepository;
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::service::archival_recorder::ArchivalRecorder;
use crate::service::entity_validator::EntityValidator;
use crate::service::{ensure_positive_ids, in_transaction};
use log::{debug, info, warn};
use rusqlite::Connection;
use serde::Serialize;
use std::fmt::{Display, Formatter};

const SAME_IDENTIFIERS: &str = "same identifiers: old and new employee IDs must be different";

/// Progress of one retirement call. A failure at any stage rolls back the
/// stages already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementStage {
    Validating,
    Reassigning,
    Archiving,
    Removing,
    Done,
}

impl RetirementStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Reassigning => "reassigning",
            Self::Archiving => "archiving",
            Self::Removing => "removing",
            Self::Done => "done",
        }
    }
}

impl Display for RetirementStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Committed result of a retirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetirementOutcome {
    pub archived: ArchivedEmployee,
    pub new_employee_id: EmployeeId,
    /// Customers as persisted after the owner rewrite.
    pub reassigned_customers: Vec<Customer>,
}

/// Entry point for ownership-changing operations.
pub struct OwnershipOrchestrator<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> OwnershipOrchestrator<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Moves one customer to `employee_id`.
    ///
    /// Checks, in order: both ids positive, customer exists, employee exists.
    /// Equal numeric ids are accepted since they address different kinds.
    pub fn reassign_customer_to_employee(
        &mut self,
        customer_id: CustomerId,
        employee_id: EmployeeId,
    ) -> CoreResult<Customer> {
        info!(
            "event=customer_reassign module=orchestrator status=start customer_id={} employee_id={}",
            customer_id, employee_id
        );

        let result = ensure_positive_ids(
            "customer and employee IDs must be positive numbers",
            &[customer_id, employee_id],
        )
        .and_then(|()| {
            in_transaction(self.conn, "reassign_customer_to_employee", |tx| {
                reassign_customer_in_tx(tx, customer_id, employee_id)
            })
        });

        log_outcome("customer_reassign", &result);
        result
    }

    /// Moves every customer owned by `old_employee_id` to `new_employee_id`.
    ///
    /// Fails with `InvalidArgument` when the ids are equal or when the old
    /// employee owns no customers.
    pub fn reassign_customers(
        &mut self,
        old_employee_id: EmployeeId,
        new_employee_id: EmployeeId,
    ) -> CoreResult<Vec<Customer>> {
        info!(
            "event=customers_reassign module=orchestrator status=start old_employee_id={} new_employee_id={}",
            old_employee_id, new_employee_id
        );

        let result = ensure_distinct_employee_ids(old_employee_id, new_employee_id).and_then(|()| {
            in_transaction(self.conn, "reassign_customers", |tx| {
                reassign_customers_in_tx(tx, old_employee_id, new_employee_id)
            })
        });

        log_outcome("customers_reassign", &result);
        result
    }

    /// Retires `old_employee_id`: reassigns all of its customers to
    /// `new_employee_id`, archives its profile, and deletes it.
    pub fn delete_employee_and_reassign_customers(
        &mut self,
        old_employee_id: EmployeeId,
        new_employee_id: EmployeeId,
    ) -> CoreResult<RetirementOutcome> {
        info!(
            "event=employee_retire module=orchestrator status=start old_employee_id={} new_employee_id={}",
            old_employee_id, new_employee_id
        );

        let mut stage = RetirementStage::Validating;
        let result = ensure_distinct_employee_ids(old_employee_id, new_employee_id).and_then(|()| {
            in_transaction(self.conn, "delete_employee_and_reassign_customers", |tx| {
                retire_in_tx(tx, old_employee_id, new_employee_id, &mut stage)
            })
        });

        match &result {
            Ok(outcome) => info!(
                "event=employee_retire module=orchestrator status=ok old_employee_id={} new_employee_id={} archive_id={} reassigned={}",
                old_employee_id,
                new_employee_id,
                outcome.archived.id,
                outcome.reassigned_customers.len()
            ),
            Err(err) => warn!(
                "event=employee_retire module=orchestrator status=error failed_stage={} error_code={} error={}",
                stage,
                err.error_code(),
                err
            ),
        }
        result
    }
}

fn ensure_distinct_employee_ids(
    old_employee_id: EmployeeId,
    new_employee_id: EmployeeId,
) -> CoreResult<()> {
    ensure_positive_ids(
        "employee IDs must be positive numbers",
        &[old_employee_id, new_employee_id],
    )?;
    if old_employee_id == new_employee_id {
        return Err(CoreError::invalid_argument(SAME_IDENTIFIERS));
    }
    Ok(())
}

fn reassign_customer_in_tx(
    conn: &Connection,
    customer_id: CustomerId,
    employee_id: EmployeeId,
) -> CoreResult<Customer> {
    let validator = EntityValidator::new(conn);
    validator.ensure_customer_exists(customer_id)?;
    validator.ensure_employee_exists(employee_id)?;

    let customers = SqliteCustomerRepository::new(conn);
    let mut customer = customers
        .get_customer(customer_id)?
        .ok_or(CoreError::not_found(EntityKind::Customer, customer_id))?;
    customer.employee_id = employee_id;
    customers.update_customer(&customer)?;
    Ok(customer)
}

/// Bulk owner rewrite shared by `reassign_customers` and retirement.
/// Identifier shape is checked by the caller.
fn reassign_customers_in_tx(
    conn: &Connection,
    old_employee_id: EmployeeId,
    new_employee_id: EmployeeId,
) -> CoreResult<Vec<Customer>> {
    let customers = SqliteCustomerRepository::new(conn);
    let mut owned = customers.find_customers_by_employee(old_employee_id)?;
    if owned.is_empty() {
        return Err(CoreError::invalid_argument(format!(
            "no customers found for old employee ID: {old_employee_id}"
        )));
    }

    EntityValidator::new(conn).ensure_employee_exists(new_employee_id)?;

    for customer in &mut owned {
        debug!(
            "event=customer_reassign module=orchestrator customer_id={} new_employee_id={}",
            customer.id, new_employee_id
        );
        customer.employee_id = new_employee_id;
    }
    customers.save_all_customers(&owned)?;
    Ok(owned)
}

fn retire_in_tx(
    conn: &Connection,
    old_employee_id: EmployeeId,
    new_employee_id: EmployeeId,
    stage: &mut RetirementStage,
) -> CoreResult<RetirementOutcome> {
    let employees = SqliteEmployeeRepository::new(conn);
    let old_employee = employees
        .get_employee(old_employee_id)?
        .ok_or(CoreError::not_found(EntityKind::Employee, old_employee_id))?;
    let new_employee = employees
        .get_employee(new_employee_id)?
        .ok_or(CoreError::not_found(EntityKind::Employee, new_employee_id))?;

    advance(stage, RetirementStage::Reassigning);
    let reassigned_customers = reassign_customers_in_tx(conn, old_employee.id, new_employee.id)?;

    advance(stage, RetirementStage::Archiving);
    let recorder = ArchivalRecorder::new(SqliteArchivedEmployeeRepository::new(conn));
    let archived = recorder.archive(&old_employee)?;

    advance(stage, RetirementStage::Removing);
    employees.delete_employee(old_employee.id)?;

    advance(stage, RetirementStage::Done);
    Ok(RetirementOutcome {
        archived,
        new_employee_id: new_employee.id,
        reassigned_customers,
    })
}

fn advance(stage: &mut RetirementStage, next: RetirementStage) {
    debug!(
        "event=employee_retire module=orchestrator from_stage={} to_stage={}",
        stage, next
    );
    *stage = next;
}

fn log_outcome<T>(event: &'static str, result: &CoreResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=orchestrator status=ok"),
        Err(err) => warn!(
            "event={} module=orchestrator status=error error_code={} error={}",
            event,
            err.error_code(),
            err
        ),
    }
}
