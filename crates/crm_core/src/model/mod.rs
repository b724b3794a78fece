//! Domain model for the employee/customer/note ownership graph.
//!
//! # Responsibility
//! - Define canonical records used by core business logic.
//! - Provide field-level validation shared by every write path.
//!
//! # Invariants
//! - Identifiers are assigned by storage at creation and never reused.
//! - Every `Customer` carries exactly one owning `EmployeeId`.
//! - Every `Note` carries exactly one owning `CustomerId`.
//! - `ArchivedEmployee::original_employee_id` is a historical pointer and is
//!   expected to dangle once the employee is removed.

pub mod archived_employee;
pub mod customer;
pub mod employee;
pub mod note;
pub mod validation;

/// Storage-assigned employee identifier.
pub type EmployeeId = i64;
/// Storage-assigned customer identifier.
pub type CustomerId = i64;
/// Storage-assigned note identifier.
pub type NoteId = i64;
/// Storage-assigned archive identifier, independent of the original employee id.
pub type ArchivedEmployeeId = i64;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Record kinds addressable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employee,
    Customer,
    Note,
    ArchivedEmployee,
}

impl EntityKind {
    /// Stable lowercase name used in log lines and error codes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Customer => "customer",
            Self::Note => "note",
            Self::ArchivedEmployee => "archived_employee",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Employee => "Employee",
            Self::Customer => "Customer",
            Self::Note => "Note",
            Self::ArchivedEmployee => "Archived employee",
        };
        f.write_str(label)
    }
}
