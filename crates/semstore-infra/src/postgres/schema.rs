//! Store schema lifecycle: create, drop, list.
//!
//! Creation issues plain `CREATE TABLE` / `CREATE INDEX` and treats the
//! specific duplicate-object SQLSTATEs as success, so concurrent creation
//! races resolve silently while every other failure propagates.

use semstore_types::error::SemanticStoreError;

use super::naming;
use super::store::{
    DUPLICATE_OBJECT, DUPLICATE_TABLE, PgSemanticStore, sqlstate, storage_err, table_err,
};

/// pgvector's upper bound on `vector(n)` columns.
const MAX_VECTOR_DIMENSION: usize = 16_000;

/// Swallow only "already exists" errors; anything else propagates.
fn ignore_duplicate(result: Result<(), sqlx::Error>) -> Result<(), SemanticStoreError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => match sqlstate(&err).as_deref() {
            Some(DUPLICATE_TABLE) | Some(DUPLICATE_OBJECT) => Ok(()),
            _ => Err(storage_err(err)),
        },
    }
}

impl PgSemanticStore {
    /// Create the store table and its HNSW cosine index, idempotently.
    pub(crate) async fn ensure_store(
        &self,
        store: &str,
        dimension: usize,
    ) -> Result<(), SemanticStoreError> {
        if dimension == 0 || dimension > MAX_VECTOR_DIMENSION {
            return Err(SemanticStoreError::invalid_argument(format!(
                "vector dimension must be in 1..={MAX_VECTOR_DIMENSION}, got {dimension}"
            )));
        }
        let table = naming::table_name(store)?;
        let index = naming::index_name(store)?;

        let create_table = format!(
            "CREATE TABLE {table} (
                content_id TEXT PRIMARY KEY,
                content    TEXT NOT NULL,
                attributes JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                vector     VECTOR({dimension}) NOT NULL
            )"
        );
        ignore_duplicate(
            sqlx::query(&create_table)
                .execute(self.pool())
                .await
                .map(|_| ()),
        )?;

        let create_index =
            format!("CREATE INDEX {index} ON {table} USING hnsw (vector vector_cosine_ops)");
        ignore_duplicate(
            sqlx::query(&create_index)
                .execute(self.pool())
                .await
                .map(|_| ()),
        )?;

        tracing::debug!(store, dimension, table = table.as_str(), "store schema ensured");
        Ok(())
    }

    /// Drop the store table; the index goes with it.
    pub(crate) async fn drop_store_table(&self, store: &str) -> Result<(), SemanticStoreError> {
        let name = naming::normalize_store_name(store)?;
        let table = naming::table_name(store)?;
        sqlx::query(&format!("DROP TABLE {table}"))
            .execute(self.pool())
            .await
            .map_err(|e| table_err(&name, e))?;
        tracing::debug!(store = name.as_str(), "store dropped");
        Ok(())
    }

    /// Reverse the naming convention over the schema catalog.
    pub(crate) async fn store_names(&self) -> Result<Vec<String>, SemanticStoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT tablename FROM pg_tables
             WHERE schemaname = current_schema() AND tablename LIKE 'ss\\_%'
             ORDER BY tablename",
        )
        .fetch_all(self.pool())
        .await
        .map_err(storage_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(table,)| naming::store_name_from_table(&table))
            .collect())
    }
}
