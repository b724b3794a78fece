//! Note domain model.

use crate::model::validation::{require_length, require_non_blank, ValidationError};
use crate::model::{CustomerId, NoteId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const CONTENT_MAX_CHARS: usize = 1000;

/// Channel through which a customer interaction happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    Email,
    PhoneCall,
    Meeting,
    Other,
}

impl InteractionType {
    /// Storage representation.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::PhoneCall => "PHONE_CALL",
            Self::Meeting => "MEETING",
            Self::Other => "OTHER",
        }
    }

    /// Parses the storage representation, accepting any ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EMAIL" => Some(Self::Email),
            "PHONE_CALL" => Some(Self::PhoneCall),
            "MEETING" => Some(Self::Meeting),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub date: NaiveDate,
    pub interaction_type: InteractionType,
    pub customer_id: CustomerId,
}

impl Note {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_content(&self.content)
    }
}

/// Creation payload for a note. The owning customer is bound at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub content: String,
    pub date: NaiveDate,
    pub interaction_type: InteractionType,
}

impl NewNote {
    pub fn new(
        content: impl Into<String>,
        date: NaiveDate,
        interaction_type: InteractionType,
    ) -> Self {
        Self {
            content: content.into(),
            date,
            interaction_type,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_content(&self.content)
    }
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    require_non_blank("content", content)?;
    require_length("content", content, 1, CONTENT_MAX_CHARS)
}
