//! Customer domain model.
//!
//! # Invariants
//! - `employee_id` is mandatory and must resolve to an existing employee at
//!   every externally observable point.
//! - Notes are owned by the customer and removed together with it.

use crate::model::validation::{
    require_email, require_length, require_non_blank, ValidationError,
};
use crate::model::{CustomerId, EmployeeId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const PHONE_MIN_CHARS: usize = 10;
const PHONE_MAX_CHARS: usize = 15;
const ADDRESS_MAX_CHARS: usize = 100;

/// Persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub last_interaction_date: Option<NaiveDate>,
    /// Owning employee.
    pub employee_id: EmployeeId,
}

impl Customer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_customer_profile(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            self.address.as_deref(),
        )
    }
}

/// Creation payload for a new customer. The owner is supplied up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub last_interaction_date: Option<NaiveDate>,
    pub employee_id: EmployeeId,
}

impl NewCustomer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        employee_id: EmployeeId,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            address: None,
            last_interaction_date: None,
            employee_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_customer_profile(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            self.address.as_deref(),
        )
    }

    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            last_interaction_date: self.last_interaction_date,
            employee_id: self.employee_id,
        }
    }
}

fn validate_customer_profile(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    address: Option<&str>,
) -> Result<(), ValidationError> {
    require_non_blank("first_name", first_name)?;
    require_non_blank("last_name", last_name)?;
    require_email("email", email)?;
    require_non_blank("phone", phone)?;
    require_length("phone", phone.trim(), PHONE_MIN_CHARS, PHONE_MAX_CHARS)?;
    if let Some(address) = address {
        require_length("address", address, 0, ADDRESS_MAX_CHARS)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::NewCustomer;
    use crate::model::validation::ValidationError;

    #[test]
    fn short_phone_is_rejected() {
        let customer = NewCustomer::new("Grace", "Hopper", "grace@example.com", "12345", 1);
        let err = customer.validate().unwrap_err();
        assert!(matches!(err, ValidationError::Length { field: "phone", .. }));
    }

    #[test]
    fn long_address_is_rejected() {
        let mut customer =
            NewCustomer::new("Grace", "Hopper", "grace@example.com", "0123456789", 1);
        customer.address = Some("x".repeat(101));
        let err = customer.validate().unwrap_err();
        assert!(matches!(err, ValidationError::Length { field: "address", .. }));
    }
}
