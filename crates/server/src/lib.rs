//! Mercado Server - REST backend for users, products, and orders.
//!
//! # Architecture
//!
//! - Axum web framework, JSON envelope on every response
//! - `SQLite` via sqlx; users behave as documents with an embedded,
//!   JSON-stored address sequence
//! - Bearer-token authentication delegated to an external identity
//!   provider, injected as a trait object so tests can stub it
//! - Authorization as a middleware chain: authenticate, resolve the
//!   internal identity, then evaluate the route's composed filter
//!   predicates
//!
//! The library crate exists so the integration tests can build the router
//! against an in-memory database; the binary in `main.rs` is a thin
//! wrapper around [`routes::router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
