//! Authorization filter middleware.
//!
//! Routes declare their policy as an [`AccessFilter`]: a list of
//! [`Policy`] predicates combined with ALL or ANY semantics and an
//! optional custom rejection message. Predicates are pure, so the filter
//! evaluates all of them eagerly; order does not matter.

use axum::RequestPartsExt;
use axum::extract::{Query, RawPathParams, Request};
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;

use mercado_core::policy::{Policy, PolicyParams, allows_all, allows_any};
use mercado_core::types::Identity;

use crate::error::ApiError;

/// Route path parameter predicates may compare against.
const ROUTE_USER_PARAM: &str = "idUser";

#[derive(Debug, Default, Deserialize)]
struct OwnerQuery {
    user: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    All,
    Any,
}

/// A composed authorization policy for one route.
#[derive(Debug, Clone)]
pub struct AccessFilter {
    combine: Combine,
    policies: Vec<Policy>,
    message: String,
}

impl AccessFilter {
    /// Pass iff every predicate passes (logical AND).
    #[must_use]
    pub fn all(policies: Vec<Policy>) -> Self {
        Self {
            combine: Combine::All,
            policies,
            message: "Forbidden".to_owned(),
        }
    }

    /// Pass iff at least one predicate passes (logical OR).
    #[must_use]
    pub fn any(policies: Vec<Policy>) -> Self {
        Self {
            combine: Combine::Any,
            policies,
            message: "Forbidden".to_owned(),
        }
    }

    /// Replace the default rejection message.
    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_owned();
        self
    }

    /// Evaluate the composed policy.
    #[must_use]
    pub fn allows(&self, identity: &Identity, params: PolicyParams<'_>) -> bool {
        match self.combine {
            Combine::All => allows_all(&self.policies, identity, params),
            Combine::Any => allows_any(&self.policies, identity, params),
        }
    }

    /// Enforce the filter as a middleware step.
    ///
    /// Reads the resolved [`Identity`] plus the route/query parameters the
    /// predicates need, and either short-circuits with 403 or forwards the
    /// request unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] when the composed policy denies, or
    /// [`ApiError::Internal`] when identity resolution did not run.
    pub async fn enforce(self, request: Request, next: Next) -> Result<Response, ApiError> {
        let (mut parts, body) = request.into_parts();

        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| {
                ApiError::Internal("access filter ran without identity resolution".to_owned())
            })?;

        let path_params = parts
            .extract::<RawPathParams>()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let route_user = path_params
            .iter()
            .find(|(name, _)| *name == ROUTE_USER_PARAM)
            .map(|(_, value)| value.to_owned());

        let owner = parts
            .extract::<Query<OwnerQuery>>()
            .await
            .map(|Query(owner)| owner)
            .unwrap_or_default();

        let params = PolicyParams {
            route_user: route_user.as_deref(),
            query_user: owner.user.as_deref(),
        };

        if !self.allows(&identity, params) {
            return Err(ApiError::Forbidden(self.message));
        }

        Ok(next.run(Request::from_parts(parts, body)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mercado_core::types::{Role, UserId};

    fn identity(role: Role) -> Identity {
        Identity {
            subject_id: "subject-1".to_owned(),
            internal_id: UserId::random(),
            role,
        }
    }

    #[test]
    fn test_all_and_any_combinators() {
        let admin = identity(Role::Admin);
        let params = PolicyParams::default();

        assert!(AccessFilter::all(vec![Policy::IsAdmin]).allows(&admin, params));
        assert!(
            !AccessFilter::all(vec![Policy::IsAdmin, Policy::IsMainAdmin]).allows(&admin, params)
        );
        assert!(
            AccessFilter::any(vec![Policy::IsAdmin, Policy::IsMainAdmin]).allows(&admin, params)
        );
        assert!(!AccessFilter::any(vec![Policy::IsMainAdmin]).allows(&admin, params));
    }

    #[test]
    fn test_custom_message() {
        let filter = AccessFilter::all(vec![Policy::IsMainAdmin]).with_message("No deleting users");
        assert_eq!(filter.message, "No deleting users");
    }
}
