//! Identity-resolution middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use mercado_core::types::{AuthenticatedSubject, Identity};

use crate::db::UserRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the authenticated subject to an internal user record and
/// attach the full [`Identity`] to the request.
///
/// Requires [`super::authenticate`] to have run; a missing subject is a
/// broken middleware chain, not a recoverable request error. A subject
/// with no user record is rejected: authentication alone does not grant
/// access.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] for unregistered subjects,
/// [`ApiError::Internal`] when the chain precondition is broken.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let subject = request
        .extensions()
        .get::<AuthenticatedSubject>()
        .cloned()
        .ok_or_else(|| {
            ApiError::Internal("identity resolution ran without authentication".to_owned())
        })?;

    let record = UserRepository::new(state.pool())
        .subject(&subject.subject_id)
        .await?;
    let Some((internal_id, role)) = record else {
        return Err(ApiError::Forbidden("Forbidden: Unregistered user".to_owned()));
    };

    request.extensions_mut().insert(Identity {
        subject_id: subject.subject_id,
        internal_id,
        role,
    });

    Ok(next.run(request).await)
}
