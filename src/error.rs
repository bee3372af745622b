//! Workflow-level error taxonomy shared by auth, intake and history.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::crypto::CryptoError;
use crate::db::DatabaseError;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} ({})", e.field, e.reason)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Please log in to access this page")]
    NotAuthenticated,

    #[error("Log out before registering a new account")]
    AlreadyAuthenticated,

    #[error("Please provide all required details: {0}")]
    Validation(ValidationErrors),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),

    #[error("Stored credential unreadable: {0}")]
    Credential(#[from] CryptoError),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_validation_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn validation_lists_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "required");
        errors.push("age", "must be between 1 and 120");

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["name", "age"]);
        assert!(errors.contains("age"));
        assert!(!errors.contains("gender"));
        assert_eq!(
            errors.to_string(),
            "name (required), age (must be between 1 and 120)"
        );
        assert!(matches!(errors.into_result(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn validation_serializes_as_list() {
        let mut errors = ValidationErrors::new();
        errors.push("image", "required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "image");
        assert_eq!(json[0]["reason"], "required");
    }
}
