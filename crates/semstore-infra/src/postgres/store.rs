//! PostgreSQL-backed implementation of `SemanticStore`.
//!
//! The trait impl delegates to inherent methods split by concern:
//! schema lifecycle in `schema.rs`, record operations in `repository.rs`,
//! ranked retrieval in `search.rs`. Error mapping from SQLSTATE codes to
//! domain errors lives here.

use semstore_core::store::SemanticStore;
use semstore_types::error::SemanticStoreError;
use semstore_types::record::{ContentRecord, SearchHit, SearchMode};

use super::pool::DatabasePool;

/// PostgreSQL + pgvector backend for semantic stores.
pub struct PgSemanticStore {
    pool: DatabasePool,
}

impl PgSemanticStore {
    /// Create a new backend over the given pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &sqlx::PgPool {
        self.pool.pool()
    }
}

// ---------------------------------------------------------------------------
// SQLSTATE mapping
// ---------------------------------------------------------------------------

/// `duplicate_table` -- also raised for duplicate indexes.
pub(crate) const DUPLICATE_TABLE: &str = "42P07";
/// `duplicate_object`.
pub(crate) const DUPLICATE_OBJECT: &str = "42710";
/// `undefined_table`.
pub(crate) const UNDEFINED_TABLE: &str = "42P01";

pub(crate) fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.to_string()),
        _ => None,
    }
}

pub(crate) fn storage_err(err: sqlx::Error) -> SemanticStoreError {
    SemanticStoreError::Storage(err.to_string())
}

/// Map an error from a query against a store table: an undefined table
/// means the store was never created (or already dropped).
pub(crate) fn table_err(store: &str, err: sqlx::Error) -> SemanticStoreError {
    if sqlstate(&err).as_deref() == Some(UNDEFINED_TABLE) {
        SemanticStoreError::StoreNotFound(store.to_string())
    } else {
        storage_err(err)
    }
}

impl SemanticStore for PgSemanticStore {
    async fn create_store(&self, name: &str, dimension: usize) -> Result<(), SemanticStoreError> {
        self.ensure_store(name, dimension).await
    }

    async fn drop_store(&self, name: &str) -> Result<(), SemanticStoreError> {
        self.drop_store_table(name).await
    }

    async fn list_stores(&self) -> Result<Vec<String>, SemanticStoreError> {
        self.store_names().await
    }

    async fn upsert(
        &self,
        store: &str,
        content_id: &str,
        content: &str,
        attributes: &serde_json::Value,
        embedding: &[f32],
    ) -> Result<(), SemanticStoreError> {
        self.merge_record(store, content_id, content, attributes, embedding)
            .await
    }

    async fn fetch(
        &self,
        store: &str,
        content_id: &str,
    ) -> Result<Option<ContentRecord>, SemanticStoreError> {
        self.fetch_record(store, content_id).await
    }

    async fn remove(&self, store: &str, content_id: &str) -> Result<(), SemanticStoreError> {
        self.delete_record(store, content_id).await
    }

    async fn count(&self, store: &str) -> Result<u64, SemanticStoreError> {
        self.record_count(store).await
    }

    async fn search(
        &self,
        store: &str,
        embedding: &[f32],
        top_k: usize,
        mode: SearchMode,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        self.ranked_search(store, embedding, top_k, mode).await
    }

    async fn search_filtered(
        &self,
        store: &str,
        embedding: &[f32],
        key: &str,
        value: &serde_json::Value,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        self.ranked_search_filtered(store, embedding, key, value, top_k)
            .await
    }
}
