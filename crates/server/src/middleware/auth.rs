//! Authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use mercado_core::types::AuthenticatedSubject;

use crate::error::ApiError;
use crate::state::AppState;

/// The credential scheme prefix. Matched case-sensitively, trailing space
/// included.
const BEARER: &str = "Bearer ";

/// Validate the bearer credential and attach the verified subject to the
/// request.
///
/// A missing header, or one not starting with `Bearer `, halts the
/// pipeline with 401. A header that carries a token but fails provider
/// verification propagates as an unhandled error: this layer cannot tell
/// a malformed token from a provider outage.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] or [`ApiError::Provider`].
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER))
        .ok_or(ApiError::Unauthenticated)?;

    let claims = state.verifier().verify(token).await?;

    request.extensions_mut().insert(AuthenticatedSubject {
        subject_id: claims.subject_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
