//! A user's order sequence, read through the user.
//!
//! Orders live in their own collection, but viewed through
//! `/users/{idUser}/orders` they form an embedded sequence in creation
//! order, addressable by 1-based position or by order id.

use axum::extract::{Path, State};
use axum::response::IntoResponse;

use mercado_core::subresource::{Selector, resolve_position};
use mercado_core::types::OrderId;

use crate::db::{OrderRepository, UserRepository};
use crate::error::{ApiError, Result};
use crate::response;
use crate::state::AppState;

use super::users::parse_user_id;

/// `GET /users/{idUser}/orders`
pub async fn list(
    State(state): State<AppState>,
    Path(id_user): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    if !UserRepository::new(state.pool()).exists(id).await? {
        return Err(ApiError::NotFound);
    }
    let orders = OrderRepository::new(state.pool()).list_for_user(id).await?;
    Ok(response::ok(orders))
}

/// `GET /users/{idUser}/orders/{idOrder}`
pub async fn get_one(
    State(state): State<AppState>,
    Path((id_user, id_order)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let id = parse_user_id(&id_user)?;
    let selector: Selector<OrderId> =
        Selector::parse(&id_order).map_err(|_| ApiError::BadRequest("Wrong order number"))?;

    if !UserRepository::new(state.pool()).exists(id).await? {
        return Err(ApiError::NotFound);
    }
    let orders = OrderRepository::new(state.pool()).list_for_user(id).await?;

    let order = match selector {
        Selector::Position(position) => {
            let index = resolve_position(position, orders.len()).map_err(|_| ApiError::NotFound)?;
            orders.into_iter().nth(index).ok_or(ApiError::NotFound)?
        }
        Selector::Id(order_id) => orders
            .into_iter()
            .find(|o| o.id == order_id)
            .ok_or(ApiError::NotFound)?,
    };

    Ok(response::ok(order))
}
