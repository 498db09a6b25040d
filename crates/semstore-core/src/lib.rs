//! Service logic and backend trait definitions for semstore.
//!
//! This crate defines the "ports" (the [`store::SemanticStore`] backend
//! trait and the [`embedding::EmbeddingProvider`] trait) that the
//! infrastructure layer implements, plus the [`service::SemanticService`]
//! that orchestrates them. It depends only on `semstore-types` -- never on
//! `semstore-infra` or any database/HTTP crate.

pub mod embedding;
pub mod service;
pub mod store;
