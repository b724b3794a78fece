//! Existence validator used before any caller-supplied identifier is
//! dereferenced.
//!
//! # Invariants
//! - Pure reads; never mutates storage.
//! - `ArchivedEmployee` existence is keyed by the original employee id.

use crate::error::{CoreError, CoreResult};
use crate::model::{EmployeeId, EntityKind};
use crate::repo::archive_repo::{ArchivedEmployeeRepository, SqliteArchivedEmployeeRepository};
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use log::{debug, warn};
use rusqlite::Connection;

/// Existence checks over every record kind.
pub struct EntityValidator<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EntityValidator<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Fails with `NotFound(kind, id)` when no such record exists.
    pub fn ensure_exists(&self, kind: EntityKind, id: i64) -> CoreResult<()> {
        let exists = match kind {
            EntityKind::Employee => SqliteEmployeeRepository::new(self.conn).employee_exists(id)?,
            EntityKind::Customer => SqliteCustomerRepository::new(self.conn).customer_exists(id)?,
            EntityKind::Note => SqliteNoteRepository::new(self.conn).note_exists(id)?,
            EntityKind::ArchivedEmployee => SqliteArchivedEmployeeRepository::new(self.conn)
                .exists_by_original_employee_id(id)?,
        };

        if !exists {
            warn!(
                "event=ensure_exists module=validator status=not_found kind={} id={}",
                kind.as_str(),
                id
            );
            return Err(CoreError::not_found(kind, id));
        }

        debug!(
            "event=ensure_exists module=validator status=ok kind={} id={}",
            kind.as_str(),
            id
        );
        Ok(())
    }

    pub fn ensure_employee_exists(&self, id: EmployeeId) -> CoreResult<()> {
        self.ensure_exists(EntityKind::Employee, id)
    }

    pub fn ensure_customer_exists(&self, id: i64) -> CoreResult<()> {
        self.ensure_exists(EntityKind::Customer, id)
    }

    pub fn ensure_note_exists(&self, id: i64) -> CoreResult<()> {
        self.ensure_exists(EntityKind::Note, id)
    }

    pub fn ensure_archived_employee_exists(&self, original_id: EmployeeId) -> CoreResult<()> {
        self.ensure_exists(EntityKind::ArchivedEmployee, original_id)
    }

    /// Returns whether the employee currently owns at least one customer.
    pub fn employee_has_customers(&self, id: EmployeeId) -> CoreResult<bool> {
        let has_customers = SqliteEmployeeRepository::new(self.conn).has_customers(id)?;
        debug!(
            "event=employee_has_customers module=validator employee_id={} has_customers={}",
            id, has_customers
        );
        Ok(has_customers)
    }
}
