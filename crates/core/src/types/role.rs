//! Permission tiers for registered users.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a stored role value is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleError(pub String);

/// Coarse permission tier assigned to every registered user.
///
/// The wire and storage representation is the kebab-case string
/// (`customer`, `admin`, `main-admin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Regular shopper; may act on their own resources only.
    Customer,
    /// Staff; may read and manage users, products, and orders.
    Admin,
    /// Root tier; additionally manages user accounts themselves.
    MainAdmin,
}

impl Role {
    /// True for `admin` and `main-admin`.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::MainAdmin)
    }

    /// The canonical string form, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
            Self::MainAdmin => "main-admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            "main-admin" => Ok(Self::MainAdmin),
            other => Err(RoleError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for role in [Role::Customer, Role::Admin, Role::MainAdmin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Role::MainAdmin).unwrap();
        assert_eq!(json, "\"main-admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"customer\"").unwrap(),
            Role::Customer
        );
    }

    #[test]
    fn test_is_admin() {
        assert!(!Role::Customer.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::MainAdmin.is_admin());
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("manager".parse::<Role>().is_err());
    }
}
