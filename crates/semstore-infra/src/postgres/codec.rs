//! Vector literal codec.
//!
//! pgvector accepts vectors as bracketed, comma-separated decimal text
//! (`[0.12, -0.98, 3]`) bound as a string and cast with `::vector`.
//! Encoding is pure; the core never decodes -- vectors are read back only
//! by the database itself during ranking.

use semstore_types::error::SemanticStoreError;

/// Encode a vector as a pgvector text literal.
///
/// Rust's float `Display` is locale-independent and never uses scientific
/// notation, so the output is a valid literal for any finite component.
/// Rejects empty vectors and non-finite components at the boundary.
pub fn encode_vector(vector: &[f32]) -> Result<String, SemanticStoreError> {
    if vector.is_empty() {
        return Err(SemanticStoreError::invalid_vector("vector is empty"));
    }
    if let Some(bad) = vector.iter().find(|x| !x.is_finite()) {
        return Err(SemanticStoreError::invalid_vector(format!(
            "non-finite component: {bad}"
        )));
    }

    let mut literal = String::with_capacity(vector.len() * 10 + 2);
    literal.push('[');
    for (i, x) in vector.iter().enumerate() {
        if i > 0 {
            literal.push_str(", ");
        }
        literal.push_str(&x.to_string());
    }
    literal.push(']');
    Ok(literal)
}
