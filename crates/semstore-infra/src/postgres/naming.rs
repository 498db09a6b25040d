//! Store name validation and physical table naming.
//!
//! Table and index names cannot be bound as query parameters, so store
//! names pass through this allow-list before ever reaching identifier
//! position in SQL. The derivation is total and collision-free: two
//! distinct normalized names always yield two distinct table names.

use semstore_types::error::SemanticStoreError;

/// Prefix marking store tables in the schema catalog.
pub const STORE_TABLE_PREFIX: &str = "ss_";

/// Maximum length of a normalized store name. Keeps `ss_{name}_vidx`
/// under PostgreSQL's 63-byte identifier limit.
pub const MAX_STORE_NAME_LEN: usize = 48;

/// Normalize and validate a store name.
///
/// Names are trimmed and lowercased, then checked against
/// `[a-z0-9_]{1,48}`. Anything else is an `InvalidArgument`.
pub fn normalize_store_name(name: &str) -> Result<String, SemanticStoreError> {
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return Err(SemanticStoreError::invalid_argument(
            "store name cannot be empty",
        ));
    }
    if name.len() > MAX_STORE_NAME_LEN {
        return Err(SemanticStoreError::invalid_argument(format!(
            "store name exceeds {MAX_STORE_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(SemanticStoreError::invalid_argument(format!(
            "store name '{name}' may only contain [a-z0-9_]"
        )));
    }
    Ok(name)
}

/// Physical table name for a store: `ss_{name}`.
pub fn table_name(store: &str) -> Result<String, SemanticStoreError> {
    Ok(format!("{STORE_TABLE_PREFIX}{}", normalize_store_name(store)?))
}

/// Similarity index name for a store: `ss_{name}_vidx`.
pub fn index_name(store: &str) -> Result<String, SemanticStoreError> {
    Ok(format!("{}_vidx", table_name(store)?))
}

/// Reverse the naming convention: recover a store name from a catalog
/// table name, or `None` when the table is not a store table.
pub fn store_name_from_table(table: &str) -> Option<String> {
    table
        .strip_prefix(STORE_TABLE_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}
