//! Exact in-memory storage backend.
//!
//! Implements `SemanticStore` over a process-local map: useful for tests
//! and small corpora where a database is overkill. Ranking is always an
//! exact scan; `SearchMode::Approximate` is accepted and behaves exactly,
//! since there is no index to approximate with.
//!
//! Store names go through the same validation as the PostgreSQL backend,
//! so the two are interchangeable behind the trait.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use semstore_core::store::SemanticStore;
use semstore_types::error::SemanticStoreError;
use semstore_types::record::{ContentRecord, SearchHit, SearchMode};

use crate::postgres::naming;

/// In-memory backend holding all stores behind one async lock.
#[derive(Default)]
pub struct MemorySemanticStore {
    stores: RwLock<HashMap<String, MemoryStore>>,
}

struct MemoryStore {
    dimension: usize,
    records: BTreeMap<String, StoredRecord>,
}

struct StoredRecord {
    content: String,
    attributes: serde_json::Value,
    embedding: Vec<f32>,
}

impl MemorySemanticStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine distance in `[0, 2]`. A zero-norm input has no direction; its
/// distance to anything is defined as 1 (orthogonal).
fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 1.0;
    }
    1.0 - dot / denom
}

fn rank(
    candidates: impl Iterator<Item = (String, String, f64)>,
    top_k: usize,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = candidates
        .map(|(id, content, distance)| SearchHit::from_distance(id, content, distance))
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits.truncate(top_k);
    hits
}

impl SemanticStore for MemorySemanticStore {
    async fn create_store(&self, name: &str, dimension: usize) -> Result<(), SemanticStoreError> {
        if dimension == 0 {
            return Err(SemanticStoreError::invalid_argument(
                "vector dimension must be positive",
            ));
        }
        let name = naming::normalize_store_name(name)?;
        let mut stores = self.stores.write().await;
        match stores.get(&name) {
            Some(existing) if existing.dimension != dimension => {
                Err(SemanticStoreError::Storage(format!(
                    "store '{name}' already exists with dimension {}",
                    existing.dimension
                )))
            }
            Some(_) => Ok(()),
            None => {
                stores.insert(
                    name,
                    MemoryStore {
                        dimension,
                        records: BTreeMap::new(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn drop_store(&self, name: &str) -> Result<(), SemanticStoreError> {
        let name = naming::normalize_store_name(name)?;
        match self.stores.write().await.remove(&name) {
            Some(_) => Ok(()),
            None => Err(SemanticStoreError::StoreNotFound(name)),
        }
    }

    async fn list_stores(&self) -> Result<Vec<String>, SemanticStoreError> {
        let mut names: Vec<String> = self.stores.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn upsert(
        &self,
        store: &str,
        content_id: &str,
        content: &str,
        attributes: &serde_json::Value,
        embedding: &[f32],
    ) -> Result<(), SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let mut stores = self.stores.write().await;
        let store = stores
            .get_mut(&name)
            .ok_or(SemanticStoreError::StoreNotFound(name))?;
        if embedding.len() != store.dimension {
            return Err(SemanticStoreError::invalid_vector(format!(
                "expected {} dimensions, got {}",
                store.dimension,
                embedding.len()
            )));
        }
        if let Some(bad) = embedding.iter().find(|x| !x.is_finite()) {
            return Err(SemanticStoreError::invalid_vector(format!(
                "non-finite component: {bad}"
            )));
        }
        store.records.insert(
            content_id.to_string(),
            StoredRecord {
                content: content.to_string(),
                attributes: attributes.clone(),
                embedding: embedding.to_vec(),
            },
        );
        Ok(())
    }

    async fn fetch(
        &self,
        store: &str,
        content_id: &str,
    ) -> Result<Option<ContentRecord>, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let stores = self.stores.read().await;
        let store = stores
            .get(&name)
            .ok_or(SemanticStoreError::StoreNotFound(name))?;
        Ok(store.records.get(content_id).map(|r| ContentRecord {
            content_id: content_id.to_string(),
            content: r.content.clone(),
            attributes: r.attributes.clone(),
        }))
    }

    async fn remove(&self, store: &str, content_id: &str) -> Result<(), SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let mut stores = self.stores.write().await;
        let store = stores
            .get_mut(&name)
            .ok_or(SemanticStoreError::StoreNotFound(name))?;
        store.records.remove(content_id);
        Ok(())
    }

    async fn count(&self, store: &str) -> Result<u64, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let stores = self.stores.read().await;
        let store = stores
            .get(&name)
            .ok_or(SemanticStoreError::StoreNotFound(name))?;
        Ok(store.records.len() as u64)
    }

    async fn search(
        &self,
        store: &str,
        embedding: &[f32],
        top_k: usize,
        _mode: SearchMode,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let stores = self.stores.read().await;
        let store = stores
            .get(&name)
            .ok_or(SemanticStoreError::StoreNotFound(name))?;
        Ok(rank(
            store.records.iter().map(|(id, r)| {
                (
                    id.clone(),
                    r.content.clone(),
                    cosine_distance(embedding, &r.embedding),
                )
            }),
            top_k,
        ))
    }

    async fn search_filtered(
        &self,
        store: &str,
        embedding: &[f32],
        key: &str,
        value: &serde_json::Value,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let stores = self.stores.read().await;
        let store = stores
            .get(&name)
            .ok_or(SemanticStoreError::StoreNotFound(name))?;
        Ok(rank(
            store
                .records
                .iter()
                .filter(|(_, r)| r.attributes.get(key) == Some(value))
                .map(|(id, r)| {
                    (
                        id.clone(),
                        r.content.clone(),
                        cosine_distance(embedding, &r.embedding),
                    )
                }),
            top_k,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::hash::{DefaultHasher, Hash, Hasher};

    use semstore_core::embedding::EmbeddingProvider;
    use semstore_core::service::SemanticService;
    use serde_json::json;

    /// Bag-of-words embedder: each token hashes into one of `DIM` slots.
    /// Deterministic and crude, but texts sharing tokens land closer than
    /// texts sharing none, which is all the ranking tests need.
    struct TokenEmbedder;

    const DIM: usize = 64;

    impl EmbeddingProvider for TokenEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticStoreError> {
            let mut vector = vec![0.0f32; DIM];
            for token in text.split_whitespace() {
                let mut hasher = DefaultHasher::new();
                token.to_lowercase().hash(&mut hasher);
                vector[(hasher.finish() as usize) % DIM] += 1.0;
            }
            let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for x in &mut vector {
                    *x /= norm;
                }
            }
            Ok(vector)
        }

        fn model_name(&self) -> &str {
            "token-hash-test"
        }

        fn dimension(&self) -> usize {
            DIM
        }
    }

    fn service() -> SemanticService<MemorySemanticStore, TokenEmbedder> {
        SemanticService::new(MemorySemanticStore::new(), TokenEmbedder)
    }

    #[test]
    fn test_cosine_distance_bounds() {
        let a = [1.0, 0.0];
        assert!(cosine_distance(&a, &[1.0, 0.0]).abs() < 1e-9);
        assert!((cosine_distance(&a, &[0.0, 1.0]) - 1.0).abs() < 1e-9);
        assert!((cosine_distance(&a, &[-1.0, 0.0]) - 2.0).abs() < 1e-9);
        assert_eq!(cosine_distance(&a, &[0.0, 0.0]), 1.0);
    }

    #[tokio::test]
    async fn test_upsert_then_fetch_round_trip() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        svc.upsert("docs", "1", "invoice pending approval", json!({"type": "status"}))
            .await
            .unwrap();

        let record = svc.fetch("docs", "1").await.unwrap().unwrap();
        assert_eq!(record.content_id, "1");
        assert_eq!(record.content, "invoice pending approval");
        assert_eq!(record.attributes, json!({"type": "status"}));
    }

    #[tokio::test]
    async fn test_upsert_replaces_without_duplicating() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        svc.upsert("docs", "1", "first version", json!({}))
            .await
            .unwrap();
        svc.upsert("docs", "1", "second version", json!({"rev": 2}))
            .await
            .unwrap();

        assert_eq!(svc.count("docs").await.unwrap(), 1);
        let record = svc.fetch("docs", "1").await.unwrap().unwrap();
        assert_eq!(record.content, "second version");
        assert_eq!(record.attributes, json!({"rev": 2}));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        svc.remove("docs", "missing").await.unwrap();
        assert!(svc.fetch("docs", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_after_upserts_and_remove() {
        let svc = service();
        svc.create_store("x").await.unwrap();
        svc.upsert("x", "1", "alpha text", json!({})).await.unwrap();
        svc.upsert("x", "2", "beta text", json!({})).await.unwrap();
        svc.remove("x", "1").await.unwrap();
        assert_eq!(svc.count("x").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_store_twice_is_idempotent() {
        let svc = service();
        svc.create_store("x").await.unwrap();
        svc.create_store("x").await.unwrap();
        assert_eq!(svc.list_stores().await.unwrap(), vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_store_names_are_normalized() {
        let svc = service();
        svc.create_store("Docs").await.unwrap();
        svc.upsert("DOCS", "1", "body text", json!({})).await.unwrap();
        assert_eq!(svc.count("docs").await.unwrap(), 1);
        assert_eq!(svc.list_stores().await.unwrap(), vec!["docs".to_string()]);
    }

    #[tokio::test]
    async fn test_search_ranks_by_distance() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        svc.upsert("docs", "1", "invoice pending approval", json!({"type": "status"}))
            .await
            .unwrap();
        svc.upsert("docs", "2", "payment processed", json!({"type": "status"}))
            .await
            .unwrap();

        let hits = svc.search("docs", "invoice approval", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content_id, "1");

        let all = svc.search("docs", "invoice approval", 10).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].distance < all[1].distance);
        for hit in &all {
            assert!((hit.similarity - (1.0 - hit.distance)).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_search_results_non_decreasing() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        for (id, text) in [
            ("1", "supplier invoice mismatch"),
            ("2", "customer dispute on hold"),
            ("3", "invoice matched and processed"),
            ("4", "payment rejected by supplier"),
        ] {
            svc.upsert("docs", id, text, json!({})).await.unwrap();
        }

        let hits = svc.search("docs", "supplier invoice", 3).await.unwrap();
        assert!(hits.len() <= 3);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[tokio::test]
    async fn test_search_empty_store_returns_empty() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        assert!(svc.search("docs", "anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_unknown_store_fails() {
        let svc = service();
        let err = svc.search("ghost", "anything", 5).await.unwrap_err();
        assert!(matches!(err, SemanticStoreError::StoreNotFound(_)));
    }

    #[tokio::test]
    async fn test_attribute_filter_restricts_candidates() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        svc.upsert("docs", "1", "invoice pending approval", json!({"type": "status"}))
            .await
            .unwrap();
        svc.upsert("docs", "2", "invoice approval policy", json!({"type": "policy"}))
            .await
            .unwrap();

        let hits = svc
            .search_with_attribute_filter("docs", "invoice approval", "type", json!("policy"), None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content_id, "2");

        let none = svc
            .search_with_attribute_filter("docs", "invoice approval", "type", json!("memo"), None)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_drop_store_removes_records() {
        let svc = service();
        svc.create_store("docs").await.unwrap();
        svc.upsert("docs", "1", "some text", json!({})).await.unwrap();
        svc.drop_store("docs").await.unwrap();

        let err = svc.count("docs").await.unwrap_err();
        assert!(matches!(err, SemanticStoreError::StoreNotFound(_)));
        let err = svc.drop_store("docs").await.unwrap_err();
        assert!(matches!(err, SemanticStoreError::StoreNotFound(_)));
    }

    #[tokio::test]
    async fn test_wrong_dimension_rejected_at_boundary() {
        let backend = MemorySemanticStore::new();
        backend.create_store("docs", 4).await.unwrap();
        let err = backend
            .upsert("docs", "1", "body", &json!({}), &[0.1, 0.2])
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticStoreError::InvalidVector(_)));
        assert_eq!(backend.count("docs").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recreate_with_other_dimension_fails() {
        let backend = MemorySemanticStore::new();
        backend.create_store("docs", 4).await.unwrap();
        let err = backend.create_store("docs", 8).await.unwrap_err();
        assert!(matches!(err, SemanticStoreError::Storage(_)));
    }
}
