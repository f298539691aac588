//! Core error types shared across the recipes workspace.

use thiserror::Error;

/// Errors produced by core recipe operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The recipe identifier is malformed.
    #[error("Invalid recipe ID: {0}")]
    InvalidId(String),

    /// No recipe exists with the given identifier.
    #[error("Recipe not found: {id}")]
    RecipeNotFound {
        /// The ID of the recipe that was not found.
        id: String,
    },

    /// The recipe data failed validation.
    #[error("Invalid recipe data: {message}")]
    InvalidRecipe {
        /// Description of why the recipe is invalid.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Creates a new `InvalidId` error.
    #[must_use]
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Creates a new `RecipeNotFound` error.
    #[must_use]
    pub fn recipe_not_found(id: impl Into<String>) -> Self {
        Self::RecipeNotFound { id: id.into() }
    }

    /// Creates a new `InvalidRecipe` error.
    #[must_use]
    pub fn invalid_recipe(message: impl Into<String>) -> Self {
        Self::InvalidRecipe {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_)
                | Self::RecipeNotFound { .. }
                | Self::InvalidRecipe { .. }
                | Self::JsonError(_)
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidId(_) | Self::InvalidRecipe { .. } => ErrorCategory::Validation,
            Self::RecipeNotFound { .. } => ErrorCategory::NotFound,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}

/// Categories of core errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Validation error.
    Validation,
    /// Recipe not found.
    NotFound,
    /// Serialization error.
    Serialization,
    /// Configuration error.
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_id("not-a-uuid");
        assert_eq!(err.to_string(), "Invalid recipe ID: not-a-uuid");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_recipe_not_found_error() {
        let err = CoreError::recipe_not_found("123");
        assert_eq!(err.to_string(), "Recipe not found: 123");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_configuration_error() {
        let err = CoreError::configuration("missing secret");
        assert_eq!(err.to_string(), "Configuration error: missing secret");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }
}
