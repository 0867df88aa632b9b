//! HTTP route handlers and the route table.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Users
//! POST  /users/sign-up                  - public, idempotent registration
//! GET   /users                          - admin
//! GET   /users/{idUser}                 - admin OR self
//! POST  /users                          - main-admin
//! PATCH /users/{idUser}                 - admin OR self
//! DELETE /users/{idUser}                - main-admin AND not-self
//!
//! # Addresses (embedded in the user)
//! GET/POST   /users/{idUser}/addresses              - admin OR self
//! GET/PATCH/DELETE /users/{idUser}/addresses/{idAddress} - admin OR self
//!
//! # The user's order sequence
//! GET /users/{idUser}/orders            - admin OR self
//! GET /users/{idUser}/orders/{idOrder}  - admin OR self
//!
//! # Products
//! GET /products, /products/{idProduct}  - public
//! POST/PATCH/DELETE                     - admin
//!
//! # Orders
//! GET  /orders, /orders/{idOrder}       - admin OR self-in-query
//! POST /orders                          - any authenticated role
//! ```

pub mod addresses;
pub mod orders;
pub mod products;
pub mod user_orders;
pub mod users;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{Next, from_fn, from_fn_with_state};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mercado_core::policy::Policy;

use crate::middleware::{AccessFilter, authenticate, resolve_identity};
use crate::state::AppState;

/// Wrap a group of routes in the full protected-route chain:
/// authentication, identity resolution, then the group's access filter.
fn guarded(state: &AppState, filter: AccessFilter, routes: Router<AppState>) -> Router<AppState> {
    // route_layer wraps outermost-last, so the filter is added first and
    // authentication ends up running first.
    routes
        .route_layer(from_fn(move |request: Request, next: Next| {
            let filter = filter.clone();
            async move { filter.enforce(request, next).await }
        }))
        .route_layer(from_fn_with_state(state.clone(), resolve_identity))
        .route_layer(from_fn_with_state(state.clone(), authenticate))
}

/// Create the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/users/sign-up", post(users::sign_up))
        .route("/products", get(products::list))
        .route("/products/{idProduct}", get(products::get_one));

    let admin_only = guarded(
        &state,
        AccessFilter::all(vec![Policy::IsAdmin]),
        Router::new()
            .route("/users", get(users::list))
            .route("/products", post(products::create))
            .route(
                "/products/{idProduct}",
                patch(products::update).delete(products::remove),
            ),
    );

    let admin_or_self = guarded(
        &state,
        AccessFilter::any(vec![Policy::IsAdmin, Policy::IsSelf]),
        Router::new()
            .route("/users/{idUser}", get(users::get_one).patch(users::update))
            .route(
                "/users/{idUser}/addresses",
                get(addresses::list).post(addresses::add),
            )
            .route(
                "/users/{idUser}/addresses/{idAddress}",
                get(addresses::get_one)
                    .patch(addresses::update)
                    .delete(addresses::remove),
            )
            .route("/users/{idUser}/orders", get(user_orders::list))
            .route("/users/{idUser}/orders/{idOrder}", get(user_orders::get_one)),
    );

    let main_admin = guarded(
        &state,
        AccessFilter::all(vec![Policy::IsMainAdmin]),
        Router::new().route("/users", post(users::create)),
    );

    // A main-admin may delete any account except their own.
    let main_admin_not_self = guarded(
        &state,
        AccessFilter::all(vec![Policy::IsMainAdmin, Policy::NotSelf]),
        Router::new().route("/users/{idUser}", delete(users::remove)),
    );

    let order_read = guarded(
        &state,
        AccessFilter::any(vec![Policy::IsAdmin, Policy::IsSelfInQuery]),
        Router::new()
            .route("/orders", get(orders::list))
            .route("/orders/{idOrder}", get(orders::get_one)),
    );

    let order_create = guarded(
        &state,
        AccessFilter::all(vec![Policy::IsAnyAuthenticatedRole]),
        Router::new().route("/orders", post(orders::create)),
    );

    let cors = cors_layer(state.config().client_origin.as_deref());

    let app = Router::new()
        .merge(public)
        .merge(admin_only)
        .merge(admin_or_self)
        .merge(main_admin)
        .merge(main_admin_not_self)
        .merge(order_read)
        .merge(order_create)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// Restrict browsers to the configured client origin. No CORS headers are
/// emitted at all when no origin is configured.
fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
        Err(error) => {
            tracing::warn!(%error, "invalid MERCADO_CLIENT_ORIGIN, CORS disabled");
            None
        }
    }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
