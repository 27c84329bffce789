//! Error types for the Influmatch backend.
//!
//! This module defines a small hierarchy of error types:
//!
//! - [`StorageError`] - Key-value storage failures
//! - [`DraftError`] - Campaign wizard validation and persistence errors
//! - [`CampaignError`] - Campaign list/detail errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to read or write the underlying medium.
    #[error("Storage IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Stored value is not valid JSON for the expected type.
    #[error("Storage JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

// =============================================================================
// Draft Errors
// =============================================================================

/// A single field-level validation message shown next to a form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Field the message belongs to (camelCase, as sent by clients).
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors from the campaign draft wizard.
#[derive(Debug, Error)]
pub enum DraftError {
    /// One or more fields failed validation; progression is blocked.
    #[error("Draft step is incomplete: {}", format_field_errors(.0))]
    Invalid(Vec<FieldError>),

    /// Unknown wizard step name, or a step that owns no record.
    #[error("Unknown wizard step: {0}")]
    UnknownStep(String),

    /// Step payload does not match the step's record.
    #[error("Malformed draft: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Storage failure while saving.
    #[error("Draft storage error: {0}")]
    Storage(#[from] StorageError),

    /// The campaign list could not be updated on submission.
    #[error("Campaign error: {0}")]
    Campaign(#[from] CampaignError),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Campaign Errors
// =============================================================================

/// Errors from the campaign repository.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// No campaign with this id.
    #[error("Campaign not found: {0}")]
    NotFound(String),

    /// Storage failure.
    #[error("Campaign storage error: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Draft step failed validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<DraftError> for ServerError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::Invalid(errors) => ServerError::Validation(errors),
            DraftError::UnknownStep(step) => ServerError::NotFound(format!("step {}", step)),
            DraftError::Malformed(e) => ServerError::BadRequest(e.to_string()),
            DraftError::Storage(e) => ServerError::Internal(e.to_string()),
            DraftError::Campaign(e) => e.into(),
        }
    }
}

impl From<CampaignError> for ServerError {
    fn from(err: CampaignError) -> Self {
        match err {
            CampaignError::NotFound(id) => ServerError::NotFound(format!("campaign {}", id)),
            CampaignError::Storage(e) => ServerError::Internal(e.to_string()),
        }
    }
}

impl From<StorageError> for ServerError {
    fn from(err: StorageError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for draft operations.
pub type DraftResult<T> = Result<T, DraftError>;

/// Result type for campaign operations.
pub type CampaignResult<T> = Result<T, CampaignError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // StorageError -> CampaignError
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let campaign_err: CampaignError = StorageError::from(io).into();
        assert!(campaign_err.to_string().contains("disk full"));

        // CampaignError -> ServerError
        let server_err: ServerError = CampaignError::NotFound("abc".into()).into();
        assert!(matches!(server_err, ServerError::NotFound(_)));
        assert!(server_err.to_string().contains("abc"));
    }

    #[test]
    fn test_draft_error_format() {
        let err = DraftError::Invalid(vec![
            FieldError::new("title", "Campaign title is required"),
            FieldError::new("budgetRange", "Minimum must not exceed maximum"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("title: Campaign title is required"));
        assert!(msg.contains("budgetRange"));
    }

    #[test]
    fn test_draft_validation_maps_to_server_validation() {
        let err: ServerError = DraftError::Invalid(vec![FieldError::new("title", "x")]).into();
        match err {
            ServerError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }
}
