//! Ranked retrieval: cosine-distance search with optional attribute
//! filtering.
//!
//! Approximate mode lets the HNSW index drive the scan; exact mode runs
//! inside a transaction with `SET LOCAL enable_indexscan = off`, forcing
//! a full ranking of all rows. The attribute filter is a plain WHERE
//! clause over `attributes->>key`, which the planner intersects with the
//! distance ordering.

use semstore_types::error::SemanticStoreError;
use semstore_types::record::{SearchHit, SearchMode};
use sqlx::Row;

use super::store::{PgSemanticStore, storage_err, table_err};
use super::{codec, naming};

/// Render a scalar JSON value the way `attributes->>key` renders it, for
/// exact text comparison. Objects, arrays, and null are not filterable.
fn scalar_filter_text(value: &serde_json::Value) -> Result<String, SemanticStoreError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(SemanticStoreError::invalid_argument(
            "attribute filter value must be a scalar",
        )),
    }
}

fn hits_from_rows(rows: Vec<sqlx::postgres::PgRow>) -> Result<Vec<SearchHit>, SemanticStoreError> {
    let mut hits = Vec::with_capacity(rows.len());
    for row in &rows {
        let content_id: String = row
            .try_get("content_id")
            .map_err(|e| SemanticStoreError::Storage(e.to_string()))?;
        let content: String = row
            .try_get("content")
            .map_err(|e| SemanticStoreError::Storage(e.to_string()))?;
        let distance: f64 = row
            .try_get("distance")
            .map_err(|e| SemanticStoreError::Storage(e.to_string()))?;
        hits.push(SearchHit::from_distance(content_id, content, distance));
    }
    Ok(hits)
}

impl PgSemanticStore {
    /// Top-k records by ascending cosine distance to `embedding`.
    pub(crate) async fn ranked_search(
        &self,
        store: &str,
        embedding: &[f32],
        top_k: usize,
        mode: SearchMode,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let table = naming::table_name(store)?;
        let literal = codec::encode_vector(embedding)?;

        let sql = format!(
            "SELECT content_id, content, vector <=> $1::vector AS distance
             FROM {table}
             ORDER BY distance
             LIMIT $2"
        );

        let rows = match mode {
            SearchMode::Approximate => sqlx::query(&sql)
                .bind(&literal)
                .bind(top_k as i64)
                .fetch_all(self.pool())
                .await
                .map_err(|e| table_err(&name, e))?,
            SearchMode::Exact => {
                let mut tx = self.pool().begin().await.map_err(storage_err)?;
                sqlx::query("SET LOCAL enable_indexscan = off")
                    .execute(&mut *tx)
                    .await
                    .map_err(storage_err)?;
                let rows = sqlx::query(&sql)
                    .bind(&literal)
                    .bind(top_k as i64)
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(|e| table_err(&name, e))?;
                tx.commit().await.map_err(storage_err)?;
                rows
            }
        };

        hits_from_rows(rows)
    }

    /// Top-k among records whose `attributes` value at `key` equals
    /// `value`, ranked by cosine distance.
    pub(crate) async fn ranked_search_filtered(
        &self,
        store: &str,
        embedding: &[f32],
        key: &str,
        value: &serde_json::Value,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let table = naming::table_name(store)?;
        let literal = codec::encode_vector(embedding)?;
        let value_text = scalar_filter_text(value)?;

        let sql = format!(
            "SELECT content_id, content, vector <=> $1::vector AS distance
             FROM {table}
             WHERE attributes->>$2::text = $3
             ORDER BY distance
             LIMIT $4"
        );
        let rows = sqlx::query(&sql)
            .bind(&literal)
            .bind(key)
            .bind(&value_text)
            .bind(top_k as i64)
            .fetch_all(self.pool())
            .await
            .map_err(|e| table_err(&name, e))?;

        hits_from_rows(rows)
    }
}
