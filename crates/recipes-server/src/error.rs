//! HTTP error mapping.
//!
//! Every error leaves the server as `{"error": "..."}` with a status
//! code from the small set the API promises: 400, 401, 404, 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use recipes_auth::AuthError;
use recipes_core::CoreError;
use recipes_storage::StorageError;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request payload or parameters are invalid.
    #[error("{message}")]
    BadRequest {
        /// What was wrong with the request.
        message: String,
    },

    /// Missing or invalid credentials.
    #[error("{message}")]
    Unauthorized {
        /// Why the request was rejected.
        message: String,
    },

    /// The requested recipe does not exist.
    #[error("{message}")]
    NotFound {
        /// What was not found.
        message: String,
    },

    /// Something failed on the server side. The detail is logged, not
    /// returned to the client.
    #[error("internal server error")]
    Internal {
        /// Server-side detail for logs.
        message: String,
    },
}

impl ApiError {
    /// Creates a new `BadRequest` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidId(_) | CoreError::InvalidRecipe { .. } => Self::BadRequest {
                message: err.to_string(),
            },
            CoreError::RecipeNotFound { .. } => Self::NotFound {
                message: err.to_string(),
            },
            CoreError::JsonError(_) | CoreError::Configuration(_) => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id } => Self::NotFound {
                message: format!("recipe not found: {id}"),
            },
            StorageError::InvalidRecord { .. } => Self::BadRequest {
                message: err.to_string(),
            },
            StorageError::ConnectionError { .. }
            | StorageError::Timeout { .. }
            | StorageError::Internal { .. } => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_client_error() {
            Self::Unauthorized {
                message: err.to_string(),
            }
        } else {
            Self::Internal {
                message: err.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal { ref message } = self {
            tracing::error!(detail = %message, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
