//! Embedding provider implementations.
//!
//! Remote HTTP providers implementing the `EmbeddingProvider` trait from
//! `semstore-core`. The store never re-implements embedding models; it
//! only consumes them through `embed(text) -> vector`.

pub mod remote;

pub use remote::RemoteEmbeddingProvider;
