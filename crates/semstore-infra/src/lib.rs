//! Infrastructure layer for semstore.
//!
//! Contains implementations of the traits defined in `semstore-core`:
//! the PostgreSQL + pgvector storage backend, an exact in-memory backend
//! for tests and small corpora, remote embedding providers, and the
//! configuration loader.

pub mod config;
pub mod embedding;
pub mod memory;
pub mod postgres;
