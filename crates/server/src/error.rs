//! Unified error handling.
//!
//! All route handlers return `Result<T, ApiError>`. Handlers answer local,
//! recoverable conditions (malformed id, not-found) through the dedicated
//! variants; everything else funnels into the 500 branch, which logs the
//! details server-side and answers with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use mercado_core::types::{AddressError, EmailError};

use crate::auth::AuthError;
use crate::db::RepositoryError;
use crate::response;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or garbled credential.
    #[error("Not authorized")]
    Unauthenticated,

    /// Authenticated, but an authorization filter failed or the subject is
    /// not registered. Carries the client-facing message.
    #[error("{0}")]
    Forbidden(String),

    /// Malformed identifier, page, or index. Carries the client-facing
    /// message ("Wrong user ID", "Wrong page number", ...).
    #[error("{0}")]
    BadRequest(&'static str),

    /// Resource, page, or sub-resource absent.
    #[error("Not found")]
    NotFound,

    /// Schema-level validation failure. Answered generically; details are
    /// logged server-side only.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Identity provider call failed. This layer does not distinguish a
    /// malformed token from a provider outage.
    #[error("identity provider error: {0}")]
    Provider(#[from] AuthError),

    /// Broken middleware-chain precondition or other programming error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Forbidden with the default message.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::Forbidden("Forbidden".to_owned())
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not authorized".to_owned()),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, (*message).to_owned()),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
            Self::Validation(_) | Self::Database(_) | Self::Provider(_) | Self::Internal(_) => {
                // Never leak internals to the client.
                tracing::error!(error = %self, "Request error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_owned())
            }
        };

        response::fail(status, &message).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(get_status(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(ApiError::forbidden()), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(ApiError::BadRequest("Wrong page number")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(ApiError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(ApiError::Validation("price below zero".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(ApiError::Internal("missing context".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_answer_generically() {
        let response = ApiError::Validation("details".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body shape is checked in the integration tests; here it is enough
        // that the variant maps to the generic branch.
    }
}
