//! Semantic store backend trait.
//!
//! Defines the interface a storage backend must provide: store lifecycle
//! (schema), content record operations, and vector-ranked retrieval.
//! Implementations (PostgreSQL + pgvector, in-memory) live in
//! semstore-infra.

use semstore_types::error::SemanticStoreError;
use semstore_types::record::{ContentRecord, SearchHit, SearchMode};

/// Trait for a named-store vector storage backend.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
///
/// All operations take the logical store name; backends derive and
/// validate the physical table name themselves. Search operations take a
/// pre-computed query embedding -- text-to-vector conversion is the
/// service layer's job.
pub trait SemanticStore: Send + Sync {
    /// Create a store with a fixed vector dimension, together with its
    /// cosine-distance similarity index.
    ///
    /// Idempotent: succeeds silently when the store already exists. Any
    /// other failure propagates.
    fn create_store(
        &self,
        name: &str,
        dimension: usize,
    ) -> impl std::future::Future<Output = Result<(), SemanticStoreError>> + Send;

    /// Drop a store and, implicitly, all its records and its index.
    ///
    /// Fails with [`SemanticStoreError::StoreNotFound`] when the store
    /// does not exist.
    fn drop_store(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), SemanticStoreError>> + Send;

    /// List all store names known to the backend, in normalized form.
    fn list_stores(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, SemanticStoreError>> + Send;

    /// Insert or replace the record under `content_id`, atomically.
    ///
    /// On success the record reflects exactly the supplied content,
    /// attributes, and embedding; partial writes are never observable.
    fn upsert(
        &self,
        store: &str,
        content_id: &str,
        content: &str,
        attributes: &serde_json::Value,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), SemanticStoreError>> + Send;

    /// Point lookup by `content_id`. Returns `None` when absent.
    fn fetch(
        &self,
        store: &str,
        content_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ContentRecord>, SemanticStoreError>> + Send;

    /// Delete the record under `content_id`. Removing a non-existent id
    /// is a no-op success.
    fn remove(
        &self,
        store: &str,
        content_id: &str,
    ) -> impl std::future::Future<Output = Result<(), SemanticStoreError>> + Send;

    /// Number of records currently in the store.
    fn count(
        &self,
        store: &str,
    ) -> impl std::future::Future<Output = Result<u64, SemanticStoreError>> + Send;

    /// Retrieve the `top_k` records closest to `embedding` by cosine
    /// distance, ascending. Tie order among equal distances is
    /// unspecified.
    fn search(
        &self,
        store: &str,
        embedding: &[f32],
        top_k: usize,
        mode: SearchMode,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, SemanticStoreError>> + Send;

    /// Like [`search`](Self::search), restricted to records whose
    /// `attributes` document has `key` equal to `value` (exact scalar
    /// match). Returns an empty vector when nothing matches the filter.
    fn search_filtered(
        &self,
        store: &str,
        embedding: &[f32],
        key: &str,
        value: &serde_json::Value,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, SemanticStoreError>> + Send;
}
