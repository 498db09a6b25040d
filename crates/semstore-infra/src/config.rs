//! Configuration loader for semstore.
//!
//! Reads `config.toml` from a data directory and deserializes it into
//! [`StoreSettings`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::Path;

use semstore_types::config::StoreSettings;

/// Load settings from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`StoreSettings::default()`].
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
/// - If the file exists and parses successfully, returns the parsed
///   settings.
pub async fn load_settings(data_dir: &Path) -> StoreSettings {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return StoreSettings::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return StoreSettings::default();
        }
    };

    match toml::from_str::<StoreSettings>(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            StoreSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_settings_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings(tmp.path()).await;
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.embedding.dimension, 1536);
    }

    #[tokio::test]
    async fn load_settings_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[database]
url = "postgres://db.internal:5432/corpus"

[embedding]
model = "gemini-embedding-001"
dimension = 3072
"#,
        )
        .await
        .unwrap();

        let settings = load_settings(tmp.path()).await;
        assert_eq!(settings.database.url, "postgres://db.internal:5432/corpus");
        assert_eq!(settings.embedding.model, "gemini-embedding-001");
        assert_eq!(settings.embedding.dimension, 3072);
    }

    #[tokio::test]
    async fn load_settings_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let settings = load_settings(tmp.path()).await;
        assert_eq!(settings.embedding.dimension, 1536);
    }
}
