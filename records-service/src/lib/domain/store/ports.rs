use async_trait::async_trait;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::BackendKind;
use crate::domain::store::models::Changes;
use crate::domain::store::models::Document;
use crate::domain::store::models::Filter;

/// Uniform contract over a document-oriented record store.
///
/// Implemented by the PostgreSQL-backed persistent adapter and by the
/// in-process emulated store. Both must give identical observable results
/// for the filters in [`Filter`].
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Label of the backend, for logs and health reporting.
    fn kind(&self) -> BackendKind;

    /// Liveness probe.
    ///
    /// # Errors
    /// * `Unavailable` - Backend cannot be reached
    async fn ping(&self) -> Result<(), StoreError>;

    /// Retrieve the first document matching a filter.
    ///
    /// # Arguments
    /// * `collection` - Collection name
    /// * `filter` - Structural filter
    ///
    /// # Returns
    /// Optional document (None if nothing matches)
    ///
    /// # Errors
    /// * `Backend` - Store operation failed
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Retrieve a page of matching documents in store order.
    ///
    /// # Arguments
    /// * `collection` - Collection name
    /// * `filter` - Structural filter
    /// * `skip` - Number of matches to skip
    /// * `limit` - Maximum number of documents to return (None for all)
    ///
    /// # Returns
    /// Vector of matching documents
    ///
    /// # Errors
    /// * `Backend` - Store operation failed
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Persist a new document.
    ///
    /// Assigns a store-generated `_id` when the document has none.
    ///
    /// # Arguments
    /// * `collection` - Collection name
    /// * `document` - Document to insert
    ///
    /// # Returns
    /// Identifier of the inserted document
    ///
    /// # Errors
    /// * `DuplicateKey` - A document with the same `_id` exists
    /// * `InvalidDocument` - `_id` is present but not a string
    /// * `Backend` - Store operation failed
    async fn insert_one(&self, collection: &str, document: Document)
        -> Result<String, StoreError>;

    /// Apply changes to at most one matching document.
    ///
    /// # Arguments
    /// * `collection` - Collection name
    /// * `filter` - Structural filter selecting the document
    /// * `changes` - Fields to set
    ///
    /// # Returns
    /// 1 if a document was updated, 0 otherwise
    ///
    /// # Errors
    /// * `Backend` - Store operation failed
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: &Changes,
    ) -> Result<u64, StoreError>;

    /// Release backend resources.
    async fn close(&self);
}
