//! Product catalog handlers. Reads are public; writes are admin-gated in
//! the route table.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use mercado_core::types::ProductId;

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::models::{ProductDraft, ProductPatch};
use crate::response;
use crate::state::AppState;

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|_| ApiError::BadRequest("Wrong product ID"))
}

/// `GET /products`
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(response::ok(products))
}

/// `GET /products/{idProduct}`
pub async fn get_one(
    State(state): State<AppState>,
    Path(id_product): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_product_id(&id_product)?;
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(response::ok(product))
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(draft) = body.map_err(|e| ApiError::Validation(e.to_string()))?;
    let product = draft
        .into_product(ProductId::random())
        .map_err(|e| ApiError::Validation(e.0))?;
    ProductRepository::new(state.pool()).create(&product).await?;
    Ok(response::created(product))
}

/// `PATCH /products/{idProduct}`
pub async fn update(
    State(state): State<AppState>,
    Path(id_product): Path<String>,
    body: std::result::Result<Json<ProductPatch>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_product_id(&id_product)?;
    let Json(patch) = body.map_err(|e| ApiError::Validation(e.to_string()))?;
    patch.validate().map_err(|e| ApiError::Validation(e.0))?;

    let product = ProductRepository::new(state.pool())
        .update(id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(response::ok(product))
}

/// `DELETE /products/{idProduct}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id_product): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_product_id(&id_product)?;
    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(response::ok_empty())
}
