//! Crate-level error type
//!
//! Store errors from user-triggered operations are the only failures that
//! propagate to callers; delivery and sweep failures are handled where they
//! occur and never surface here.

use crate::status::StoreError;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for fallible operations
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Status store rejected the operation
    Store(StoreError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}
