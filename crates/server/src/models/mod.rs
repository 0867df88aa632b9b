//! Domain models and their request-body counterparts.
//!
//! Each entity has a stored form (`User`, `Product`, `Order`) plus drafts
//! and patches for the create and partial-update endpoints. Drafts validate
//! the way the storage schema used to: a failure here is answered
//! generically, never echoed to the client.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderDraft, OrderLine};
pub use product::{Product, ProductDraft, ProductPatch};
pub use user::{SignUpRequest, User, UserDraft, UserPatch};

/// A draft or patch failed schema-level validation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl From<mercado_core::types::AddressError> for ValidationError {
    fn from(err: mercado_core::types::AddressError) -> Self {
        Self(err.to_string())
    }
}

impl From<mercado_core::types::EmailError> for ValidationError {
    fn from(err: mercado_core::types::EmailError) -> Self {
        Self(err.to_string())
    }
}
