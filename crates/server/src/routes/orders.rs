//! Order collection handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::Json;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;

use mercado_core::pagination::{PAGE_SIZE, last_page, offset, out_of_range, parse_page};
use mercado_core::types::{Identity, OrderId, UserId};

use crate::config::PageOverflow;
use crate::db::OrderRepository;
use crate::error::{ApiError, Result};
use crate::models::{Order, OrderDraft};
use crate::response;
use crate::state::AppState;

fn parse_order_id(raw: &str) -> Result<OrderId> {
    OrderId::parse(raw).map_err(|_| ApiError::BadRequest("Wrong order ID"))
}

/// Query parameters of the order listing. `user` doubles as the ownership
/// filter and the target of the self-in-query predicate, so customers can
/// list exactly their own orders.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    user: Option<String>,
}

/// `GET /orders`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = parse_page(query.page.as_deref())
        .map_err(|_| ApiError::BadRequest("Wrong page number"))?;
    let owner = query
        .user
        .as_deref()
        .map(UserId::parse)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Wrong user ID"))?;

    let repo = OrderRepository::new(state.pool());
    let count = repo.count(owner).await?;
    let pages = last_page(count, PAGE_SIZE);

    if out_of_range(page, PAGE_SIZE, count) {
        return match state.config().page_overflow {
            PageOverflow::NotFound => Err(ApiError::NotFound),
            PageOverflow::Empty => Ok(response::page(Vec::<Order>::new(), page, pages)),
        };
    }

    let orders = repo.page(owner, offset(page, PAGE_SIZE), PAGE_SIZE).await?;
    Ok(response::page(orders, page, pages))
}

/// `GET /orders/{idOrder}`
pub async fn get_one(
    State(state): State<AppState>,
    Path(id_order): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_order_id(&id_order)?;
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(response::ok(order))
}

/// `POST /orders`
///
/// The owner is always the caller; a user id in the body would be
/// ignored, there is none in the draft.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: std::result::Result<Json<OrderDraft>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(draft) = body.map_err(|e| ApiError::Validation(e.to_string()))?;
    let order = draft
        .into_order(OrderId::random(), identity.internal_id, Utc::now())
        .map_err(|e| ApiError::Validation(e.0))?;
    OrderRepository::new(state.pool()).create(&order).await?;
    Ok(response::created(order))
}
