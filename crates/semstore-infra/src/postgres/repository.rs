//! Content record operations: upsert, fetch, remove, count.
//!
//! The upsert is a single `INSERT .. ON CONFLICT DO UPDATE` statement, so
//! content, attributes, and vector land atomically and each call commits
//! before returning. All values are bound parameters; only the validated
//! table name is interpolated.

use semstore_types::error::SemanticStoreError;
use semstore_types::record::ContentRecord;
use sqlx::Row;

use super::store::{PgSemanticStore, table_err};
use super::{codec, naming};

/// Internal row type for mapping Postgres rows to domain records.
struct ContentRow {
    content_id: String,
    content: String,
    attributes: serde_json::Value,
}

impl ContentRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            content_id: row.try_get("content_id")?,
            content: row.try_get("content")?,
            attributes: row.try_get("attributes")?,
        })
    }

    fn into_record(self) -> ContentRecord {
        ContentRecord {
            content_id: self.content_id,
            content: self.content,
            attributes: self.attributes,
        }
    }
}

impl PgSemanticStore {
    /// Insert or replace the record under `content_id`.
    pub(crate) async fn merge_record(
        &self,
        store: &str,
        content_id: &str,
        content: &str,
        attributes: &serde_json::Value,
        embedding: &[f32],
    ) -> Result<(), SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let table = naming::table_name(store)?;
        let literal = codec::encode_vector(embedding)?;

        let sql = format!(
            "INSERT INTO {table} (content_id, content, attributes, vector)
             VALUES ($1, $2, $3, $4::vector)
             ON CONFLICT (content_id) DO UPDATE SET
                 content    = EXCLUDED.content,
                 attributes = EXCLUDED.attributes,
                 vector     = EXCLUDED.vector"
        );
        sqlx::query(&sql)
            .bind(content_id)
            .bind(content)
            .bind(attributes)
            .bind(&literal)
            .execute(self.pool())
            .await
            .map_err(|e| table_err(&name, e))?;

        Ok(())
    }

    /// Point lookup by `content_id`.
    pub(crate) async fn fetch_record(
        &self,
        store: &str,
        content_id: &str,
    ) -> Result<Option<ContentRecord>, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let table = naming::table_name(store)?;

        let sql = format!("SELECT content_id, content, attributes FROM {table} WHERE content_id = $1");
        let row = sqlx::query(&sql)
            .bind(content_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| table_err(&name, e))?;

        row.map(|r| ContentRow::from_row(&r).map(ContentRow::into_record))
            .transpose()
            .map_err(|e| SemanticStoreError::Storage(e.to_string()))
    }

    /// Delete the record under `content_id`. Deleting an absent id is a
    /// no-op success.
    pub(crate) async fn delete_record(
        &self,
        store: &str,
        content_id: &str,
    ) -> Result<(), SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let table = naming::table_name(store)?;

        let result = sqlx::query(&format!("DELETE FROM {table} WHERE content_id = $1"))
            .bind(content_id)
            .execute(self.pool())
            .await
            .map_err(|e| table_err(&name, e))?;

        tracing::debug!(
            store = name.as_str(),
            content_id,
            removed = result.rows_affected(),
            "record delete"
        );
        Ok(())
    }

    /// Number of records in the store.
    pub(crate) async fn record_count(&self, store: &str) -> Result<u64, SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let table = naming::table_name(store)?;

        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.pool())
            .await
            .map_err(|e| table_err(&name, e))?;

        Ok(count as u64)
    }
}
