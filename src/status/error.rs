//! Store error types
//!
//! Error types for status store operations.

use super::record::StatusId;

/// Error type for store operations
#[derive(Debug, Clone)]
pub enum StoreError {
    /// A required publisher identity field is empty or whitespace
    MissingField(&'static str),
    /// No record with the given id exists
    NotFound(StatusId),
    /// The user has no records to delete
    NoStatusesForUser(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::MissingField(field) => write!(f, "Required field is empty: {}", field),
            StoreError::NotFound(id) => write!(f, "Status not found: {}", id),
            StoreError::NoStatusesForUser(user_id) => {
                write!(f, "No statuses for user: {}", user_id)
            }
        }
    }
}

impl std::error::Error for StoreError {}
