//! Embedding provider trait for text-to-vector conversion.
//!
//! Defines the interface for embedding text into fixed-dimension vectors.
//! Implementations (remote HTTP providers, local models) live in
//! semstore-infra.

use semstore_types::error::SemanticStoreError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// The dimension is fixed per provider; a store created against one
/// provider's dimension is incompatible with any other dimension.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text into a vector of exactly [`dimension`](Self::dimension)
    /// 32-bit floats.
    ///
    /// Failures always propagate -- a missing or substituted vector would
    /// silently degrade every future similarity search over the record.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, SemanticStoreError>> + Send;

    /// The model name used for embeddings (e.g., "gemini-embedding-001").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
