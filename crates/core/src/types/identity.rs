//! Per-request identity context.
//!
//! These types are attached to a request as it moves through the middleware
//! chain. They are never persisted.

use super::id::UserId;
use super::role::Role;

/// The principal as reported by the external identity provider.
///
/// Set by the authentication middleware after token verification; consumed
/// by the identity-resolution middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    /// The identity provider's stable identifier for the principal.
    pub subject_id: String,
    /// Email reported by the provider.
    pub email: String,
}

/// A fully resolved identity: provider subject plus the internal user record.
///
/// Set by the identity-resolution middleware; consumed by authorization
/// filters and handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The identity provider's stable identifier for the principal.
    pub subject_id: String,
    /// This system's primary key for the user.
    pub internal_id: UserId,
    /// Permission tier.
    pub role: Role,
}
