//! Employee domain model.
//!
//! # Invariants
//! - An employee is removed only by the retirement workflow while it owns
//!   customers. Ownership is derived by query, never cached on this record.

use crate::model::validation::{validate_employee_profile, ValidationError};
use crate::model::EmployeeId;
use serde::{Deserialize, Serialize};

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

impl Employee {
    /// Validates profile fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_employee_profile(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.department,
        )
    }

    /// Applies the non-empty fields of `patch` to this record.
    pub fn apply_patch(&mut self, patch: &EmployeePatch) {
        if let Some(value) = patch.first_name.as_ref() {
            self.first_name = value.clone();
        }
        if let Some(value) = patch.last_name.as_ref() {
            self.last_name = value.clone();
        }
        if let Some(value) = patch.email.as_ref() {
            self.email = value.clone();
        }
        if let Some(value) = patch.department.as_ref() {
            self.department = value.clone();
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Creation payload for a new employee. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

impl NewEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_employee_profile(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.department,
        )
    }

    /// Binds the storage-assigned id to this payload.
    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
        }
    }
}

/// Partial update payload. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
    }
}
