//! Token verification against the external identity provider.
//!
//! The provider client is constructed once at startup and injected through
//! [`crate::state::AppState`] as a trait object, so tests can substitute a
//! static verifier.

mod provider;

pub use provider::IdentityProviderClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a token-verification call.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the call (expired token, bad API key, outage).
    #[error("provider rejected token: {status} - {message}")]
    Rejected {
        /// HTTP status the provider answered with.
        status: u16,
        /// Provider response body, for server-side logs.
        message: String,
    },

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Claims the provider reports for a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The provider's stable identifier for the principal.
    pub subject_id: String,
    /// Email reported by the provider.
    pub email: String,
}

/// A verifier of bearer tokens.
///
/// One implementation talks to the real identity provider; tests use a
/// static map of known tokens.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a bearer token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the provider rejects the token or the
    /// call fails.
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError>;
}
