//! Content record and search result types.
//!
//! A *store* is a named collection of content records, each carrying a
//! caller-supplied id, a free-text body, a JSON attributes document used
//! for filtering, and an embedding vector used for similarity ranking.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// One row of a semantic store, as returned by point lookups.
///
/// The embedding vector is not read back -- it exists only for ranking
/// inside the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub content_id: String,
    pub content: String,
    /// Structured key/value document used for filtering, never for
    /// similarity computation.
    pub attributes: serde_json::Value,
}

/// One ranked result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub content_id: String,
    pub content: String,
    /// Cosine distance to the query vector, in `[0, 2]`. Lower is closer.
    pub distance: f64,
    /// `1 - distance`, for display.
    pub similarity: f64,
}

impl SearchHit {
    /// Build a hit from a raw cosine distance, deriving `similarity`.
    pub fn from_distance(content_id: String, content: String, distance: f64) -> Self {
        Self {
            content_id,
            content,
            similarity: 1.0 - distance,
            distance,
        }
    }
}

/// How a similarity search scans candidates.
///
/// `Exact` ranks every row; `Approximate` lets the store's vector index
/// trade recall for latency. Approximate retrieval is never a silent
/// default -- callers opt in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Exact,
    Approximate,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Exact => write!(f, "exact"),
            SearchMode::Approximate => write!(f, "approximate"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(SearchMode::Exact),
            "approximate" => Ok(SearchMode::Approximate),
            other => Err(format!("invalid search mode: '{other}'")),
        }
    }
}
