//! Recipe identifiers: opaque UUID v4 strings assigned at creation.

use crate::error::{CoreError, Result};

/// Generates a fresh recipe ID.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Validates a recipe ID supplied by a caller.
///
/// IDs are UUIDs; anything that does not parse is rejected before the
/// store is queried.
pub fn validate_id(id: &str) -> Result<()> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| CoreError::invalid_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_is_valid() {
        let id = generate_id();
        assert!(validate_id(&id).is_ok());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_malformed_id_rejected() {
        let err = validate_id("pancakes").unwrap_err();
        assert!(matches!(err, CoreError::InvalidId(_)));
        assert!(err.is_client_error());
    }
}
