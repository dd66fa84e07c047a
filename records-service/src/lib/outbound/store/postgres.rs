use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::BackendKind;
use crate::domain::store::models::Changes;
use crate::domain::store::models::Document;
use crate::domain::store::models::Filter;
use crate::domain::store::models::ID_FIELD;
use crate::domain::store::ports::DocumentStore;

const MAX_CONNECTIONS: u32 = 5;

/// Document store over a single PostgreSQL table of JSONB documents.
///
/// Every collection shares the `documents` table; rows are keyed by
/// `(collection, id)` and ordered by an insertion sequence.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool, run migrations and verify the server answers.
    ///
    /// # Arguments
    /// * `url` - PostgreSQL connection string
    /// * `timeout` - Upper bound on the whole connection attempt
    ///
    /// # Errors
    /// * `Unavailable` - Server unreachable, too slow, or migrations failed
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let attempt = async {
            let pool = PgPoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(timeout)
                .connect(url)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            tracing::info!(
                max_connections = MAX_CONNECTIONS,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Self::new(pool);
            store.ping().await?;
            Ok::<_, StoreError>(store)
        };

        tokio::time::timeout(timeout, attempt)
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "connection attempt timed out after {}s",
                    timeout.as_secs()
                ))
            })?
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::ById(id) => {
            builder.push("id = ").push_bind(id.clone());
        }
        Filter::Eq(fields) if fields.is_empty() => {
            builder.push("TRUE");
        }
        Filter::Eq(fields) => {
            builder.push("doc @> ").push_bind(Json(fields.clone()));
        }
        Filter::Or(branches) if branches.is_empty() => {
            builder.push("FALSE");
        }
        Filter::Or(branches) => {
            builder.push("(");
            for (i, branch) in branches.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push("doc @> ").push_bind(Json(branch.clone()));
            }
            builder.push(")");
        }
    }
}

fn select_documents<'a>(collection: &str, filter: &Filter) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT doc FROM documents WHERE collection = ");
    builder.push_bind(collection.to_string()).push(" AND ");
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY seq");
    builder
}

/// LIMIT/OFFSET bind value; counts beyond `i64::MAX` saturate.
fn row_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn backend_error(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn row_document(row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
    let Json(document): Json<Document> = row.try_get("doc").map_err(backend_error)?;
    Ok(document)
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Persistent
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let mut builder = select_documents(collection, filter);
        builder.push(" LIMIT 1");

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_error)?;

        row.as_ref().map(row_document).transpose()
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut builder = select_documents(collection, filter);
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(row_count(limit));
        }
        if skip > 0 {
            builder.push(" OFFSET ").push_bind(row_count(skip));
        }

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(backend_error)?;

        rows.iter().map(row_document).collect()
    }

    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<String, StoreError> {
        let id = match document.get(ID_FIELD) {
            None => Uuid::new_v4().simple().to_string(),
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!(
                    "'{}' must be a string, got {}",
                    ID_FIELD, other
                )))
            }
        };
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, doc)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&document))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("documents_collection_id_key")
                {
                    return StoreError::DuplicateKey {
                        collection: collection.to_string(),
                        id: id.clone(),
                    };
                }
            }
            backend_error(e)
        })?;

        tracing::debug!(collection, id = %id, backend = "persistent", "Document inserted");

        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: &Changes,
    ) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new("UPDATE documents SET doc = doc || ");
        builder
            .push_bind(Json(changes.as_document().clone()))
            .push(" WHERE seq = (SELECT seq FROM documents WHERE collection = ")
            .push_bind(collection.to_string())
            .push(" AND ");
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY seq LIMIT 1)");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!(database = "postgresql", "Database connection pool closed");
    }
}
