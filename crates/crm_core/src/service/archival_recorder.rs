//! Archival recorder for retired employees.
//!
//! # Responsibility
//! - Snapshot an employee's profile into an immutable archive record.
//! - Expose read access to archived snapshots.
//!
//! # Invariants
//! - `archive` performs no validation of its own; the caller guarantees the
//!   employee still exists and runs it inside the retirement unit of work.

use crate::error::{CoreError, CoreResult};
use crate::model::archived_employee::{ArchivedEmployee, EmployeeSnapshot};
use crate::model::employee::Employee;
use crate::model::{ArchivedEmployeeId, EmployeeId, EntityKind};
use crate::repo::archive_repo::ArchivedEmployeeRepository;
use crate::repo::PageQuery;
use crate::service::ListResult;
use log::info;

/// Archive service over an archived-employee repository.
pub struct ArchivalRecorder<R: ArchivedEmployeeRepository> {
    repo: R,
}

impl<R: ArchivedEmployeeRepository> ArchivalRecorder<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Copies profile fields, stamps `original_employee_id`, and persists.
    pub fn archive(&self, employee: &Employee) -> CoreResult<ArchivedEmployee> {
        let snapshot = EmployeeSnapshot::from_employee(employee);
        let archived = self.repo.create_archived_employee(&snapshot)?;
        info!(
            "event=employee_archive module=archive status=ok archive_id={} original_employee_id={}",
            archived.id, archived.original_employee_id
        );
        Ok(archived)
    }

    pub fn get_archived_employee(&self, id: ArchivedEmployeeId) -> CoreResult<ArchivedEmployee> {
        self.repo
            .get_archived_employee(id)?
            .ok_or(CoreError::not_found(EntityKind::ArchivedEmployee, id))
    }

    /// Looks up the snapshot of a retired employee by its former id.
    pub fn find_by_original_employee_id(
        &self,
        original_id: EmployeeId,
    ) -> CoreResult<ArchivedEmployee> {
        self.repo
            .find_by_original_employee_id(original_id)?
            .ok_or(CoreError::not_found(EntityKind::ArchivedEmployee, original_id))
    }

    pub fn exists_by_original_employee_id(&self, original_id: EmployeeId) -> CoreResult<bool> {
        Ok(self.repo.exists_by_original_employee_id(original_id)?)
    }

    pub fn list_archived_employees(
        &self,
        page: &PageQuery,
    ) -> CoreResult<ListResult<ArchivedEmployee>> {
        let items = self.repo.list_archived_employees(page)?;
        Ok(ListResult {
            items,
            applied_limit: page.applied_limit(),
        })
    }
}
