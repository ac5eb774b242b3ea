//! Identifier generation.
//!
//! Entity identifiers are opaque strings. New ones are UUID v7 rendered
//! without hyphens: globally unique, roughly time-ordered, and generated
//! without coordination.

use uuid::Uuid;

/// Maximum accepted length of an identifier supplied by a caller.
pub const MAX_ID_LEN: usize = 64;

/// Generate a fresh unique identifier.
pub fn generate_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Check that a caller-supplied identifier is plausible before it reaches
/// the store or a cache key.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_valid() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(is_valid_id(&a));
    }

    #[test]
    fn test_rejects_bad_ids() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("has space"));
        assert!(!is_valid_id("a|b"));
        assert!(!is_valid_id(&"x".repeat(MAX_ID_LEN + 1)));
        assert!(is_valid_id("SMLabc_123-x"));
    }
}
