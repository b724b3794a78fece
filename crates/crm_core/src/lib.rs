//! Core domain logic for the CRM record keeper.
//! This crate is the single source of truth for the employee/customer
//! ownership invariant: every customer is owned by an existing employee.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CrmConfig};
pub use error::{CoreError, CoreResult};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::archived_employee::{ArchivedEmployee, EmployeeSnapshot};
pub use model::customer::{Customer, NewCustomer};
pub use model::employee::{Employee, EmployeePatch, NewEmployee};
pub use model::note::{InteractionType, NewNote, Note};
pub use model::validation::ValidationError;
pub use model::{ArchivedEmployeeId, CustomerId, EmployeeId, EntityKind, NoteId};
pub use repo::archive_repo::{ArchivedEmployeeRepository, SqliteArchivedEmployeeRepository};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::employee_repo::{EmployeeListQuery, EmployeeRepository, SqliteEmployeeRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::{PageQuery, RepoError, RepoResult};
pub use service::archival_recorder::ArchivalRecorder;
pub use service::customer_service::CustomerService;
pub use service::employee_service::EmployeeService;
pub use service::entity_validator::EntityValidator;
pub use service::note_service::NoteService;
pub use service::orchestrator::{OwnershipOrchestrator, RetirementOutcome, RetirementStage};
pub use service::{ensure_positive_ids, ListResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
