//! Authorization filter predicates.
//!
//! Each predicate is a pure function of the resolved [`Identity`] and the
//! request's route/query parameters. Predicates are a closed enum rather
//! than arbitrary closures so route tables stay declarative and the
//! composition semantics can be tested exhaustively.

use serde::{Deserialize, Serialize};

use crate::types::{Identity, UserId};

/// Route/query parameters a predicate may inspect.
///
/// Both fields carry the raw, untrusted parameter text; a malformed id
/// simply never compares equal to the caller's internal id.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyParams<'a> {
    /// The `:idUser` path segment, when the route has one.
    pub route_user: Option<&'a str>,
    /// The `user` query parameter, when present.
    pub query_user: Option<&'a str>,
}

/// A named capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Role is `admin` or `main-admin`.
    IsAdmin,
    /// Role is `main-admin`.
    IsMainAdmin,
    /// The `:idUser` path segment names the caller's own record.
    IsSelf,
    /// The `user` query parameter names the caller's own record.
    IsSelfInQuery,
    /// Negation of [`Policy::IsSelf`]; used to forbid self-targeting
    /// operations such as a main-admin deleting their own account.
    NotSelf,
    /// Identity resolution succeeded with any known role.
    IsAnyAuthenticatedRole,
}

impl Policy {
    /// Evaluate the predicate. Pure: reads only the identity and parameters.
    #[must_use]
    pub fn allows(self, identity: &Identity, params: PolicyParams<'_>) -> bool {
        match self {
            Self::IsAdmin => identity.role.is_admin(),
            Self::IsMainAdmin => identity.role == crate::types::Role::MainAdmin,
            Self::IsSelf => is_same_user(identity.internal_id, params.route_user),
            Self::IsSelfInQuery => is_same_user(identity.internal_id, params.query_user),
            Self::NotSelf => !is_same_user(identity.internal_id, params.route_user),
            Self::IsAnyAuthenticatedRole => true,
        }
    }
}

/// Pass iff every predicate passes (logical AND). Predicates are
/// side-effect-free, so all of them are evaluated; order does not matter.
#[must_use]
pub fn allows_all(policies: &[Policy], identity: &Identity, params: PolicyParams<'_>) -> bool {
    policies.iter().all(|p| p.allows(identity, params))
}

/// Pass iff at least one predicate passes (logical OR).
#[must_use]
pub fn allows_any(policies: &[Policy], identity: &Identity, params: PolicyParams<'_>) -> bool {
    policies.iter().any(|p| p.allows(identity, params))
}

fn is_same_user(internal_id: UserId, raw: Option<&str>) -> bool {
    raw.is_some_and(|raw| UserId::parse(raw).is_ok_and(|id| id == internal_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn identity(role: Role) -> Identity {
        Identity {
            subject_id: "subject-1".to_owned(),
            internal_id: UserId::random(),
            role,
        }
    }

    fn route(identity: &Identity) -> String {
        identity.internal_id.to_string()
    }

    #[test]
    fn test_role_predicates() {
        let customer = identity(Role::Customer);
        let admin = identity(Role::Admin);
        let main = identity(Role::MainAdmin);
        let params = PolicyParams::default();

        assert!(!Policy::IsAdmin.allows(&customer, params));
        assert!(Policy::IsAdmin.allows(&admin, params));
        assert!(Policy::IsAdmin.allows(&main, params));

        assert!(!Policy::IsMainAdmin.allows(&admin, params));
        assert!(Policy::IsMainAdmin.allows(&main, params));

        for id in [&customer, &admin, &main] {
            assert!(Policy::IsAnyAuthenticatedRole.allows(id, params));
        }
    }

    #[test]
    fn test_is_self_is_reflexive() {
        let caller = identity(Role::Customer);
        let own = route(&caller);
        let other = UserId::random().to_string();

        assert!(Policy::IsSelf.allows(
            &caller,
            PolicyParams {
                route_user: Some(&own),
                ..Default::default()
            }
        ));
        assert!(!Policy::IsSelf.allows(
            &caller,
            PolicyParams {
                route_user: Some(&other),
                ..Default::default()
            }
        ));
    }

    #[test]
    fn test_not_self_negates_is_self() {
        let caller = identity(Role::MainAdmin);
        let own = route(&caller);
        let other = UserId::random().to_string();

        for raw in [Some(own.as_str()), Some(other.as_str()), Some("foo"), None] {
            let params = PolicyParams {
                route_user: raw,
                ..Default::default()
            };
            assert_eq!(
                Policy::NotSelf.allows(&caller, params),
                !Policy::IsSelf.allows(&caller, params),
            );
        }
    }

    #[test]
    fn test_self_in_query_reads_query_parameter_only() {
        let caller = identity(Role::Customer);
        let own = route(&caller);

        assert!(Policy::IsSelfInQuery.allows(
            &caller,
            PolicyParams {
                query_user: Some(&own),
                ..Default::default()
            }
        ));
        // Route parameter must not satisfy the query predicate.
        assert!(!Policy::IsSelfInQuery.allows(
            &caller,
            PolicyParams {
                route_user: Some(&own),
                ..Default::default()
            }
        ));
    }

    #[test]
    fn test_malformed_parameter_never_matches() {
        let caller = identity(Role::Customer);
        let params = PolicyParams {
            route_user: Some("not-a-uuid"),
            ..Default::default()
        };
        assert!(!Policy::IsSelf.allows(&caller, params));
        assert!(Policy::NotSelf.allows(&caller, params));
    }

    #[test]
    fn test_all_requires_every_predicate() {
        let main = identity(Role::MainAdmin);
        let other = UserId::random().to_string();
        let own = route(&main);

        let deny_own = PolicyParams {
            route_user: Some(&own),
            ..Default::default()
        };
        let allow_other = PolicyParams {
            route_user: Some(&other),
            ..Default::default()
        };
        let policies = [Policy::IsMainAdmin, Policy::NotSelf];

        assert!(allows_all(&policies, &main, allow_other));
        assert!(!allows_all(&policies, &main, deny_own));
    }

    #[test]
    fn test_any_requires_at_least_one_predicate() {
        let customer = identity(Role::Customer);
        let own = route(&customer);
        let other = UserId::random().to_string();
        let policies = [Policy::IsAdmin, Policy::IsSelf];

        assert!(allows_any(
            &policies,
            &customer,
            PolicyParams {
                route_user: Some(&own),
                ..Default::default()
            }
        ));
        assert!(!allows_any(
            &policies,
            &customer,
            PolicyParams {
                route_user: Some(&other),
                ..Default::default()
            }
        ));
        assert!(!allows_any(&[], &customer, PolicyParams::default()));
    }

    #[test]
    fn test_all_and_any_match_pairwise_truth_table() {
        let admin = identity(Role::Admin);
        let own = route(&admin);
        let params = PolicyParams {
            route_user: Some(&own),
            ..Default::default()
        };

        let candidates = [
            Policy::IsAdmin,
            Policy::IsMainAdmin,
            Policy::IsSelf,
            Policy::NotSelf,
            Policy::IsAnyAuthenticatedRole,
        ];

        for a in candidates {
            for b in candidates {
                let lhs = a.allows(&admin, params);
                let rhs = b.allows(&admin, params);
                assert_eq!(allows_all(&[a, b], &admin, params), lhs && rhs);
                assert_eq!(allows_any(&[a, b], &admin, params), lhs || rhs);
            }
        }
    }
}
