//! Configuration types for semstore.
//!
//! `StoreSettings` represents the top-level `config.toml` that controls
//! the database connection and the embedding provider endpoint.

use serde::{Deserialize, Serialize};

/// Top-level settings for a semantic store service.
///
/// Loaded from `config.toml`. All fields have sensible defaults for a
/// local PostgreSQL with the pgvector extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub embedding: EmbeddingSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            embedding: EmbeddingSettings::default(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "postgres://localhost:5432/semstore".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Embedding provider settings.
///
/// The dimension is fixed per provider and must match the dimension the
/// store was created with; there is no migration path between dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Base URL of an OpenAI-compatible embeddings API.
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Model name passed to the provider (e.g., "text-embedding-3-small").
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Output dimension of the provider's vectors.
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1536
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = StoreSettings::default();
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.embedding.dimension, 1536);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: StoreSettings = toml::from_str("").unwrap();
        assert!(settings.database.url.starts_with("postgres://"));
        assert_eq!(settings.embedding.model, "text-embedding-3-small");
    }

    #[test]
    fn test_settings_deserialize_with_values() {
        let toml_str = r#"
[database]
url = "postgres://db.internal:5432/corpus"
max_connections = 12

[embedding]
base_url = "https://generativelanguage.googleapis.com/v1beta/openai"
model = "gemini-embedding-001"
dimension = 3072
"#;
        let settings: StoreSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.database.url, "postgres://db.internal:5432/corpus");
        assert_eq!(settings.database.max_connections, 12);
        assert_eq!(settings.embedding.dimension, 3072);
    }
}
