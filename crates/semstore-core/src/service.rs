//! Semantic store service.
//!
//! Orchestrates the full flow: a caller names a store, the service embeds
//! content through the injected [`EmbeddingProvider`], and delegates
//! persistence and ranked retrieval to the injected [`SemanticStore`]
//! backend. The service owns argument validation and the provider
//! dimension invariant; the backend owns naming, SQL, and ranking.

use semstore_types::error::SemanticStoreError;
use semstore_types::record::{ContentRecord, SearchHit, SearchMode};

use crate::embedding::EmbeddingProvider;
use crate::store::SemanticStore;

/// Default number of results for attribute-filtered search.
pub const DEFAULT_FILTER_TOP_K: usize = 3;

/// Service orchestrating store lifecycle, content persistence, and
/// similarity search.
///
/// Generic over the backend and embedder traits to maintain clean
/// architecture -- semstore-core never depends on semstore-infra. Both
/// dependencies are injected at construction (no ambient globals) and
/// dropped with the service.
pub struct SemanticService<S: SemanticStore, E: EmbeddingProvider> {
    store: S,
    embedder: E,
}

impl<S: SemanticStore, E: EmbeddingProvider> SemanticService<S, E> {
    /// Create a new service from a storage backend and an embedding
    /// provider.
    pub fn new(store: S, embedder: E) -> Self {
        Self { store, embedder }
    }

    /// The backing embedder's model name.
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    // -------------------------
    // Store lifecycle
    // -------------------------

    /// Create a store sized to the embedder's dimension.
    ///
    /// Idempotent: calling twice leaves exactly one table and index.
    pub async fn create_store(&self, name: &str) -> Result<(), SemanticStoreError> {
        let dimension = self.embedder.dimension();
        if dimension == 0 {
            return Err(SemanticStoreError::Provider(
                "embedder reports zero dimension".to_string(),
            ));
        }
        self.store.create_store(name, dimension).await?;
        tracing::info!(store = name, dimension, "store ready");
        Ok(())
    }

    /// Drop a store and all its records.
    ///
    /// Fails with `StoreNotFound` when the store does not exist; record
    /// removal stays idempotent, store removal does not.
    pub async fn drop_store(&self, name: &str) -> Result<(), SemanticStoreError> {
        self.store.drop_store(name).await?;
        tracing::info!(store = name, "store dropped");
        Ok(())
    }

    /// List all stores known to the backend.
    pub async fn list_stores(&self) -> Result<Vec<String>, SemanticStoreError> {
        self.store.list_stores().await
    }

    // -------------------------
    // Content operations
    // -------------------------

    /// Embed `content` and insert-or-replace the record under
    /// `content_id`. Each call commits independently; there is no
    /// cross-call batching.
    pub async fn upsert(
        &self,
        store: &str,
        content_id: &str,
        content: &str,
        attributes: serde_json::Value,
    ) -> Result<(), SemanticStoreError> {
        if content_id.is_empty() {
            return Err(SemanticStoreError::invalid_argument(
                "content_id cannot be empty",
            ));
        }
        let embedding = self.embed_checked(content).await?;
        self.store
            .upsert(store, content_id, content, &attributes, &embedding)
            .await?;
        tracing::debug!(store, content_id, "content merged");
        Ok(())
    }

    /// Upsert a batch of `(content_id, content, attributes)` records
    /// sequentially, each independently atomic. Returns the number of
    /// records written.
    pub async fn upsert_batch(
        &self,
        store: &str,
        records: Vec<(String, String, serde_json::Value)>,
    ) -> Result<usize, SemanticStoreError> {
        let total = records.len();
        for (content_id, content, attributes) in records {
            self.upsert(store, &content_id, &content, attributes).await?;
        }
        tracing::info!(store, total, "batch ingest complete");
        Ok(total)
    }

    /// Point lookup by `content_id`.
    pub async fn fetch(
        &self,
        store: &str,
        content_id: &str,
    ) -> Result<Option<ContentRecord>, SemanticStoreError> {
        self.store.fetch(store, content_id).await
    }

    /// Delete the record under `content_id` (idempotent).
    pub async fn remove(&self, store: &str, content_id: &str) -> Result<(), SemanticStoreError> {
        self.store.remove(store, content_id).await
    }

    /// Number of records in the store.
    pub async fn count(&self, store: &str) -> Result<u64, SemanticStoreError> {
        self.store.count(store).await
    }

    // -------------------------
    // Retrieval
    // -------------------------

    /// Exact similarity search: embed `query_text` and return the `top_k`
    /// closest records by cosine distance, ascending.
    pub async fn search(
        &self,
        store: &str,
        query_text: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        self.search_with_mode(store, query_text, top_k, SearchMode::Exact)
            .await
    }

    /// Similarity search with an explicit scan mode. `Approximate` uses
    /// the store's vector index and trades recall for latency.
    pub async fn search_with_mode(
        &self,
        store: &str,
        query_text: &str,
        top_k: usize,
        mode: SearchMode,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        if top_k == 0 {
            return Err(SemanticStoreError::invalid_argument(
                "top_k must be a positive integer",
            ));
        }
        let embedding = self.embed_checked(query_text).await?;
        let hits = self.store.search(store, &embedding, top_k, mode).await?;
        tracing::debug!(store, top_k, %mode, hits = hits.len(), "semantic search");
        Ok(hits)
    }

    /// Similarity search restricted to records whose `attributes` value
    /// at `key` equals `value`. An empty match set is an empty result,
    /// not an error. `top_k` defaults to [`DEFAULT_FILTER_TOP_K`].
    pub async fn search_with_attribute_filter(
        &self,
        store: &str,
        query_text: &str,
        key: &str,
        value: serde_json::Value,
        top_k: Option<usize>,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        let top_k = top_k.unwrap_or(DEFAULT_FILTER_TOP_K);
        if top_k == 0 {
            return Err(SemanticStoreError::invalid_argument(
                "top_k must be a positive integer",
            ));
        }
        if key.is_empty() || key.contains('.') {
            return Err(SemanticStoreError::invalid_argument(
                "attribute key must be a single dot-free key",
            ));
        }
        let embedding = self.embed_checked(query_text).await?;
        self.store
            .search_filtered(store, &embedding, key, &value, top_k)
            .await
    }

    /// Embed text and enforce the provider dimension invariant at the
    /// boundary: a wrong-length vector is rejected here, never stored
    /// truncated or padded.
    async fn embed_checked(&self, text: &str) -> Result<Vec<f32>, SemanticStoreError> {
        let embedding = self.embedder.embed(text).await?;
        let expected = self.embedder.dimension();
        if embedding.len() != expected {
            return Err(SemanticStoreError::Provider(format!(
                "provider returned {} dimensions, expected {expected}",
                embedding.len()
            )));
        }
        Ok(embedding)
    }
}
