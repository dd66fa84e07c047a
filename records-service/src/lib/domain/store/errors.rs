use thiserror::Error;

/// Error for document store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Only raised while connecting; afterwards the emulated store absorbs outages.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Document store is already connected")]
    AlreadyConnected,

    #[error("Duplicate key in collection '{collection}': {id}")]
    DuplicateKey { collection: String, id: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Document store error: {0}")]
    Backend(String),
}
