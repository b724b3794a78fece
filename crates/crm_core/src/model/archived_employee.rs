//! Archived employee snapshot.
//!
//! # Invariants
//! - Created exactly once per retirement and never mutated afterwards.
//! - `original_employee_id` is not an enforced reference.

use crate::model::employee::Employee;
use crate::model::{ArchivedEmployeeId, EmployeeId};
use serde::{Deserialize, Serialize};

/// Persisted archive record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedEmployee {
    pub id: ArchivedEmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub original_employee_id: EmployeeId,
}

/// Snapshot taken from a live employee, before storage assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub original_employee_id: EmployeeId,
}

impl EmployeeSnapshot {
    /// Copies profile fields and stamps the original identifier.
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            original_employee_id: employee.id,
        }
    }

    pub fn into_archived(self, id: ArchivedEmployeeId) -> ArchivedEmployee {
        ArchivedEmployee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
            original_employee_id: self.original_employee_id,
        }
    }
}

impl ArchivedEmployee {
    /// Returns whether the archived profile matches the given employee.
    pub fn matches_profile(&self, employee: &Employee) -> bool {
        self.first_name == employee.first_name
            && self.last_name == employee.last_name
            && self.email == employee.email
            && self.department == employee.department
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
