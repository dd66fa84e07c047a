use thiserror::Error;

use crate::domain::store::errors::StoreError;

/// Error for patient record operations
#[derive(Debug, Clone, Error)]
pub enum PatientError {
    #[error("Invalid patient data: {0}")]
    InvalidData(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Patient not found")]
    NotFound(String),

    #[error("Could not allocate a unique patient id after {0} attempts")]
    IdExhausted(usize),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
