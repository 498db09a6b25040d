//! PostgreSQL + pgvector storage backend.
//!
//! Each store maps to one table (`ss_{name}`) holding the content id,
//! text body, JSONB attributes, and a fixed-dimension `vector` column,
//! plus one HNSW cosine index. Vector values cross the boundary as text
//! literals cast to `vector`; attribute filters are expressed as a
//! `attributes->>key` WHERE clause the planner can intersect with the
//! distance ordering.
//!
//! Store names are the only identifiers interpolated into SQL, and only
//! after passing the allow-list validation in [`naming`].

pub mod codec;
pub mod naming;
pub mod pool;
mod repository;
mod schema;
mod search;
pub mod store;

pub use pool::DatabasePool;
pub use store::PgSemanticStore;
