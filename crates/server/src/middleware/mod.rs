//! The request middleware chain.
//!
//! Every protected route runs, in order:
//!
//! 1. [`auth::authenticate`] - validates the bearer credential against the
//!    identity provider and attaches [`mercado_core::types::AuthenticatedSubject`]
//! 2. [`identity::resolve_identity`] - looks up the internal user record
//!    for the subject and attaches [`mercado_core::types::Identity`]
//! 3. [`access::AccessFilter`] - evaluates the route's composed
//!    authorization predicates and short-circuits with 403 on failure
//!
//! Failures at any stage never reach the handler; the request itself is
//! passed through unchanged.

pub mod access;
pub mod auth;
pub mod identity;

pub use access::AccessFilter;
pub use auth::authenticate;
pub use identity::resolve_identity;
