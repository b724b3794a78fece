//! Field validation rules shared by all records.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Mandatory field is empty or whitespace only.
    Blank { field: &'static str },
    /// Field length (in chars) is outside the accepted range.
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    /// Field does not look like an email address.
    InvalidEmail { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} is mandatory"),
            Self::Length {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} must be between {min} and {max} characters, got {actual}"
            ),
            Self::InvalidEmail { field, value } => {
                write!(f, "{field} should be a valid email, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::Length {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_non_blank(field, value)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidEmail {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates the profile fields shared by active and archived employees.
pub(crate) fn validate_employee_profile(
    first_name: &str,
    last_name: &str,
    email: &str,
    department: &str,
) -> Result<(), ValidationError> {
    require_non_blank("first_name", first_name)?;
    require_length("first_name", first_name.trim(), 2, 50)?;
    require_non_blank("last_name", last_name)?;
    require_length("last_name", last_name.trim(), 2, 50)?;
    require_email("email", email)?;
    require_non_blank("department", department)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{require_email, require_length, validate_employee_profile, ValidationError};

    #[test]
    fn email_rule_accepts_plain_address() {
        assert!(require_email("email", "ada@example.com").is_ok());
    }

    #[test]
    fn email_rule_rejects_missing_domain() {
        let err = require_email("email", "ada@").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEmail { .. }));
    }

    #[test]
    fn length_rule_counts_chars_not_bytes() {
        assert!(require_length("first_name", "Zoë", 2, 3).is_ok());
    }

    #[test]
    fn employee_profile_rejects_single_char_name() {
        let err = validate_employee_profile("A", "Lovelace", "ada@example.com", "Sales")
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Length {
                field: "first_name",
                min: 2,
                max: 50,
                actual: 1
            }
        );
    }
}
