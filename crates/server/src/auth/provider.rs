//! HTTP client for the identity provider's token-verification endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

use super::{AuthError, TokenVerifier, VerifiedToken};

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    subject_id: String,
    email: String,
}

/// Identity provider API client.
///
/// Holds a single `reqwest::Client` with the API key baked into its default
/// headers; cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct IdentityProviderClient {
    client: reqwest::Client,
    base_url: String,
}

impl IdentityProviderClient {
    /// Create a new provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the API key is
    /// not a valid header value.
    pub fn new(config: &ProviderConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| AuthError::Parse(format!("invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl TokenVerifier for IdentityProviderClient {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        let url = format!("{}/v1/tokens/verify", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&VerifyRequest { token })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let claims: VerifyResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;

        Ok(VerifiedToken {
            subject_id: claims.subject_id,
            email: claims.email,
        })
    }
}
