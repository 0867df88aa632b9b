//! Core types for Mercado.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod identity;
pub mod role;

pub use address::{Address, AddressDraft, AddressError, CountryCode, PhoneLocale};
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{AuthenticatedSubject, Identity};
pub use role::{Role, RoleError};
