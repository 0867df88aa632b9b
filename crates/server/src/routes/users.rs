//! User collection handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use mercado_core::types::{Email, UserId};

use crate::db::UserRepository;
use crate::error::{ApiError, Result};
use crate::models::{SignUpRequest, User, UserDraft, UserPatch};
use crate::response;
use crate::state::AppState;

pub(super) fn parse_user_id(raw: &str) -> Result<UserId> {
    UserId::parse(raw).map_err(|_| ApiError::BadRequest("Wrong user ID"))
}

/// `GET /users`
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(response::ok(users))
}

/// `GET /users/{idUser}`
pub async fn get_one(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let user = UserRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(response::ok(user))
}

/// `POST /users`
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<UserDraft>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(draft) = body.map_err(|e| ApiError::Validation(e.to_string()))?;
    let user = draft.into_user().map_err(|e| ApiError::Validation(e.0))?;
    UserRepository::new(state.pool()).create(&user).await?;
    Ok(response::created(user))
}

/// `PATCH /users/{idUser}`
pub async fn update(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
    body: std::result::Result<Json<UserPatch>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let Json(patch) = body.map_err(|e| ApiError::Validation(e.to_string()))?;

    let repo = UserRepository::new(state.pool());
    let mut user = repo.get(id).await?.ok_or(ApiError::NotFound)?;
    patch
        .apply_to(&mut user)
        .map_err(|e| ApiError::Validation(e.0))?;

    if !repo.update(&user).await? {
        return Err(ApiError::NotFound);
    }
    Ok(response::ok(user))
}

/// `DELETE /users/{idUser}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    if !UserRepository::new(state.pool()).delete(id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(response::ok_empty())
}

/// `POST /users/sign-up`
///
/// Public, idempotent registration: an unseen `(uid, email)` pair creates
/// a customer record; the same pair submitted again answers 200 with the
/// already-assigned id.
pub async fn sign_up(
    State(state): State<AppState>,
    body: std::result::Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(request) = body.map_err(|e| ApiError::Validation(e.to_string()))?;
    let email = Email::parse(&request.email)?;
    let uid = request.uid.trim();
    if uid.is_empty() {
        return Err(ApiError::Validation("uid is required".to_owned()));
    }

    let repo = UserRepository::new(state.pool());
    if let Some(id) = repo.registration(uid, email.as_str()).await? {
        return Ok(response::with_message(
            StatusCode::OK,
            "User already existed",
            serde_json::json!({ "id": id }),
        ));
    }

    let user = User::registered(uid, email);
    repo.create(&user).await?;
    Ok(response::with_message(
        StatusCode::CREATED,
        "User account has been created successfully.",
        serde_json::json!({ "id": user.id }),
    ))
}
