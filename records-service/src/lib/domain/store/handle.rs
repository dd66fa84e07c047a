use std::sync::Arc;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::BackendKind;
use crate::domain::store::models::Changes;
use crate::domain::store::models::Document;
use crate::domain::store::models::Filter;
use crate::domain::store::ports::DocumentStore;

/// Shared reference to the document store chosen at startup.
///
/// Callers work through [`Collection`] and never learn which backend answers.
#[derive(Clone)]
pub struct StoreHandle {
    backend: Arc<dyn DocumentStore>,
}

impl StoreHandle {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self { backend }
    }

    /// Scope operations to a named collection.
    pub fn collection(&self, name: &str) -> Collection {
        Collection {
            backend: Arc::clone(&self.backend),
            name: name.to_string(),
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.backend.ping().await
    }

    pub async fn close(&self) {
        self.backend.close().await
    }
}

/// Named collection within the active store.
#[derive(Clone)]
pub struct Collection {
    backend: Arc<dyn DocumentStore>,
    name: String,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<Document>, StoreError> {
        self.backend.find_one(&self.name, &filter).await
    }

    /// Start a lazy query; nothing runs until [`Cursor::collect`].
    pub fn find(&self, filter: Filter) -> Cursor {
        Cursor {
            collection: self.clone(),
            filter,
            skip: 0,
            limit: None,
        }
    }

    pub async fn insert_one(&self, document: Document) -> Result<String, StoreError> {
        self.backend.insert_one(&self.name, document).await
    }

    pub async fn update_one(&self, filter: Filter, changes: Changes) -> Result<u64, StoreError> {
        self.backend.update_one(&self.name, &filter, &changes).await
    }
}

/// Pending `find` with skip/limit offsets.
///
/// `skip` and `limit` can be chained in any order; calling either again
/// replaces the previous value. A limit of zero means no limit.
pub struct Cursor {
    collection: Collection,
    filter: Filter,
    skip: usize,
    limit: Option<usize>,
}

impl Cursor {
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Materialize the matching documents.
    ///
    /// # Arguments
    /// * `max` - Upper bound on returned documents (None or zero for all)
    ///
    /// # Returns
    /// At most `min(limit, max)` documents after skipping `skip` matches
    ///
    /// # Errors
    /// * `Backend` - Store operation failed
    pub async fn collect(self, max: Option<usize>) -> Result<Vec<Document>, StoreError> {
        let max = max.filter(|max| *max > 0);
        let limit = match (self.limit, max) {
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (limit, max) => limit.or(max),
        };

        self.collection
            .backend
            .find(&self.collection.name, &self.filter, self.skip, limit)
            .await
    }
}
