use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::BackendKind;
use crate::domain::store::models::Changes;
use crate::domain::store::models::Document;
use crate::domain::store::models::Filter;
use crate::domain::store::models::ID_FIELD;
use crate::domain::store::ports::DocumentStore;

/// In-process document store with the same query semantics as the persistent adapter.
///
/// Keeps every collection as an insertion-ordered vector, so the first match
/// of a filter is always the oldest matching record. All access goes through
/// one lock, which keeps id assignment unique under concurrent inserts.
#[derive(Debug, Clone, Default)]
pub struct EmulatedDocumentStore {
    collections: Arc<RwLock<HashMap<String, EmulatedCollection>>>,
}

#[derive(Debug, Default)]
struct EmulatedCollection {
    records: Vec<Document>,
    next_id: u64,
}

impl EmulatedCollection {
    /// Next counter value not already taken by a caller-supplied id.
    fn generate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{:024x}", self.next_id);
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    fn contains_id(&self, id: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.get(ID_FIELD).and_then(Value::as_str) == Some(id))
    }

    fn insert(&mut self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        let id = match document.get(ID_FIELD) {
            None => self.generate_id(),
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!(
                    "'{}' must be a string, got {}",
                    ID_FIELD, other
                )))
            }
        };

        if self.contains_id(&id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }

        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.records.push(document);

        Ok(id)
    }
}

impl EmulatedDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial documents per collection.
    ///
    /// Documents without `_id` get sequential identifiers, so the id counter
    /// of each collection starts after its seed count.
    ///
    /// # Errors
    /// * `DuplicateKey` - Two seed documents share an `_id`
    /// * `InvalidDocument` - A seed `_id` is not a string
    pub fn seeded(
        seed: impl IntoIterator<Item = (String, Vec<Document>)>,
    ) -> Result<Self, StoreError> {
        let mut collections: HashMap<String, EmulatedCollection> = HashMap::new();

        for (name, documents) in seed {
            let collection = collections.entry(name.clone()).or_default();
            for document in documents {
                collection.insert(&name, document)?;
            }
        }

        Ok(Self {
            collections: Arc::new(RwLock::new(collections)),
        })
    }

    /// Number of documents held in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.records.len())
    }
}

#[async_trait]
impl DocumentStore for EmulatedDocumentStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Emulated
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;

        Ok(collections.get(collection).and_then(|c| {
            c.records
                .iter()
                .find(|record| filter.matches(record))
                .cloned()
        }))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;

        let Some(c) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(c.records
            .iter()
            .filter(|record| filter.matches(record))
            .skip(skip)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<String, StoreError> {
        let mut collections = self.collections.write().await;

        let id = collections
            .entry(collection.to_string())
            .or_default()
            .insert(collection, document)?;

        tracing::debug!(collection, id = %id, backend = "emulated", "Document inserted");

        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: &Changes,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;

        let record = collections
            .get_mut(collection)
            .and_then(|c| c.records.iter_mut().find(|record| filter.matches(record)));

        match record {
            Some(record) => {
                changes.apply_to(record);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn close(&self) {}
}
