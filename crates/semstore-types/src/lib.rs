//! Shared domain types for semstore.
//!
//! This crate contains the core domain types used across the semstore
//! workspace: content records, search results, settings, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod record;
