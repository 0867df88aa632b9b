//! Address sub-resource handlers.
//!
//! The `{idAddress}` path segment supports both addressing modes: a
//! positive integer is a 1-based position in insertion order, anything
//! else must be a stable address id.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use mercado_core::subresource::{Selector, resolve_position};
use mercado_core::types::{AddressDraft, AddressId};

use crate::db::UserRepository;
use crate::error::{ApiError, Result};
use crate::response;
use crate::state::AppState;

use super::users::parse_user_id;

fn parse_selector(raw: &str) -> Result<Selector<AddressId>> {
    Selector::parse(raw).map_err(|_| ApiError::BadRequest("Wrong address index"))
}

/// `GET /users/{idUser}/addresses`
pub async fn list(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let addresses = UserRepository::new(state.pool())
        .addresses(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(response::ok(addresses))
}

/// `GET /users/{idUser}/addresses/{idAddress}`
pub async fn get_one(
    State(state): State<AppState>,
    Path((id_user, id_address)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let selector = parse_selector(&id_address)?;

    let addresses = UserRepository::new(state.pool())
        .addresses(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let address = match selector {
        Selector::Position(position) => {
            let index =
                resolve_position(position, addresses.len()).map_err(|_| ApiError::NotFound)?;
            addresses.get(index).cloned().ok_or(ApiError::NotFound)?
        }
        Selector::Id(address_id) => addresses
            .into_iter()
            .find(|a| a.id == address_id)
            .ok_or(ApiError::NotFound)?,
    };

    Ok(response::ok(address))
}

/// `POST /users/{idUser}/addresses`
pub async fn add(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
    body: std::result::Result<Json<AddressDraft>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let Json(draft) = body.map_err(|e| ApiError::Validation(e.to_string()))?;
    draft.validate()?;

    let address = draft.into_address(AddressId::random());
    if !UserRepository::new(state.pool())
        .push_address(id, &address)
        .await?
    {
        return Err(ApiError::NotFound);
    }
    Ok(response::created(address))
}

/// `PATCH /users/{idUser}/addresses/{idAddress}`
///
/// Replaces the addressed element in place; order and length are
/// preserved, and the element keeps its stable id.
pub async fn update(
    State(state): State<AppState>,
    Path((id_user, id_address)): Path<(String, String)>,
    body: std::result::Result<Json<AddressDraft>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let selector = parse_selector(&id_address)?;
    let Json(draft) = body.map_err(|e| ApiError::Validation(e.to_string()))?;
    draft.validate()?;

    let repo = UserRepository::new(state.pool());
    let replaced = match selector {
        Selector::Position(position) => {
            let addresses = repo.addresses(id).await?.ok_or(ApiError::NotFound)?;
            let index =
                resolve_position(position, addresses.len()).map_err(|_| ApiError::NotFound)?;
            let existing = addresses.get(index).ok_or(ApiError::NotFound)?;
            let replacement = draft.into_address(existing.id);
            if !repo.replace_address_at(id, index, &replacement).await? {
                return Err(ApiError::NotFound);
            }
            replacement
        }
        Selector::Id(address_id) => {
            let replacement = draft.into_address(address_id);
            if !repo.replace_address_by_id(id, address_id, &replacement).await? {
                return Err(ApiError::NotFound);
            }
            replacement
        }
    };

    Ok(response::ok(replaced))
}

/// `DELETE /users/{idUser}/addresses/{idAddress}`
///
/// The removal is one atomic per-document update; a concurrent reader
/// sees either the full sequence or the shortened one, never a
/// placeholder.
pub async fn remove(
    State(state): State<AppState>,
    Path((id_user, id_address)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let selector = parse_selector(&id_address)?;

    let repo = UserRepository::new(state.pool());
    let removed = match selector {
        Selector::Position(position) => repo.remove_address_at(id, position - 1).await?,
        Selector::Id(address_id) => repo.remove_address_by_id(id, address_id).await?,
    };
    if !removed {
        return Err(ApiError::NotFound);
    }
    Ok(response::ok_empty())
}
