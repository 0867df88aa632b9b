//! The user document and its request-body forms.

use serde::{Deserialize, Serialize};

use mercado_core::types::{Address, AddressDraft, AddressId, Email, PhoneLocale, Role, UserId};

use super::ValidationError;

const MAX_NAME: usize = 32;

/// A registered user with their embedded address sequence.
///
/// The internal revision counter and timestamps live only in the database
/// row; they are never part of the API representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// The identity provider's subject id. Unique across users.
    pub uid: String,
    /// Unique across users.
    pub email: Email,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_locale: Option<PhoneLocale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub addresses: Vec<Address>,
}

impl User {
    /// A fresh customer record holding only the registration pair, as
    /// created by sign-up.
    #[must_use]
    pub fn registered(uid: &str, email: Email) -> Self {
        Self {
            id: UserId::random(),
            uid: uid.trim().to_owned(),
            email,
            role: Role::Customer,
            name: None,
            surname: None,
            phone_locale: None,
            phone_number: None,
            addresses: Vec::new(),
        }
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub uid: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub phone_locale: Option<PhoneLocale>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub addresses: Vec<AddressDraft>,
}

impl UserDraft {
    /// Validate the draft and produce a stored [`User`], assigning ids to
    /// every embedded address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first failing field.
    pub fn into_user(self) -> Result<User, ValidationError> {
        let uid = self.uid.trim();
        if uid.is_empty() {
            return Err(ValidationError("uid is required".to_owned()));
        }
        let email = Email::parse(&self.email)?;
        let name = normalized_name(self.name, "name")?;
        let surname = normalized_name(self.surname, "surname")?;
        validate_phone(self.phone_locale, self.phone_number.as_deref())?;

        let mut addresses = Vec::with_capacity(self.addresses.len());
        for draft in self.addresses {
            draft.validate()?;
            addresses.push(draft.into_address(AddressId::random()));
        }

        Ok(User {
            id: UserId::random(),
            uid: uid.to_owned(),
            email,
            role: self.role,
            name,
            surname,
            phone_locale: self.phone_locale,
            phone_number: self.phone_number.map(|n| n.trim().to_owned()),
            addresses,
        })
    }
}

/// Body of `PATCH /users/{idUser}`. Present fields replace the stored
/// value; absent fields are untouched (merge, not replace).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_locale: Option<PhoneLocale>,
    pub phone_number: Option<String>,
}

impl UserPatch {
    /// Merge into `user`, validating the merged result. Addresses are not
    /// reachable from here; they have their own sub-resource endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first failing field.
    pub fn apply_to(self, user: &mut User) -> Result<(), ValidationError> {
        if let Some(email) = self.email {
            user.email = Email::parse(&email)?;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(name) = self.name {
            user.name = normalized_name(Some(name), "name")?;
        }
        if let Some(surname) = self.surname {
            user.surname = normalized_name(Some(surname), "surname")?;
        }
        if let Some(locale) = self.phone_locale {
            user.phone_locale = Some(locale);
        }
        if let Some(number) = self.phone_number {
            user.phone_number = Some(number.trim().to_owned());
        }
        validate_phone(user.phone_locale, user.phone_number.as_deref())?;
        Ok(())
    }
}

/// Body of `POST /users/sign-up`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub uid: String,
    pub email: String,
}

fn normalized_name(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.len() > MAX_NAME {
                return Err(ValidationError(format!(
                    "{field} length must not be longer than {MAX_NAME} characters"
                )));
            }
            Ok(Some(trimmed.to_owned()))
        }
    }
}

/// Phone numbers are validated only when a locale is present, mirroring
/// the conditional schema rule.
fn validate_phone(
    locale: Option<PhoneLocale>,
    number: Option<&str>,
) -> Result<(), ValidationError> {
    let Some(locale) = locale else { return Ok(()) };
    let Some(number) = number else { return Ok(()) };

    let digits: Vec<u8> = number
        .bytes()
        .filter(|b| !matches!(b, b' ' | b'-' | b'+'))
        .collect();
    let plausible = (6..=15).contains(&digits.len()) && digits.iter().all(u8::is_ascii_digit);
    if plausible {
        Ok(())
    } else {
        Err(ValidationError(format!(
            "{number} is not a valid phone for locale {locale}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mercado_core::types::CountryCode;

    fn draft() -> UserDraft {
        UserDraft {
            uid: "subject-1".to_owned(),
            email: "ana@example.com".to_owned(),
            role: Role::Customer,
            name: Some("Ana".to_owned()),
            surname: None,
            phone_locale: None,
            phone_number: None,
            addresses: vec![AddressDraft {
                address: "Calle Mayor 1".to_owned(),
                city: "Madrid".to_owned(),
                country_code: CountryCode::ES,
                postal_code: "28013".to_owned(),
            }],
        }
    }

    #[test]
    fn test_draft_assigns_address_ids_in_order() {
        let mut d = draft();
        d.addresses.push(AddressDraft {
            address: "Gran Via 2".to_owned(),
            city: "Madrid".to_owned(),
            country_code: CountryCode::ES,
            postal_code: "28014".to_owned(),
        });
        let user = d.into_user().unwrap();
        assert_eq!(user.addresses.len(), 2);
        assert_eq!(user.addresses[0].address, "Calle Mayor 1");
        assert_eq!(user.addresses[1].address, "Gran Via 2");
        assert_ne!(user.addresses[0].id, user.addresses[1].id);
    }

    #[test]
    fn test_draft_rejects_blank_uid_and_bad_email() {
        let mut d = draft();
        d.uid = "  ".to_owned();
        assert!(d.into_user().is_err());

        let mut d = draft();
        d.email = "not-an-email".to_owned();
        assert!(d.into_user().is_err());
    }

    #[test]
    fn test_draft_rejects_long_name() {
        let mut d = draft();
        d.name = Some("x".repeat(33));
        assert!(d.into_user().is_err());
    }

    #[test]
    fn test_phone_checked_only_with_locale() {
        let mut d = draft();
        d.phone_number = Some("abc".to_owned());
        assert!(d.clone().into_user().is_ok());

        d.phone_locale = Some(PhoneLocale::EsEs);
        assert!(d.clone().into_user().is_err());

        d.phone_number = Some("+34 600 123 456".to_owned());
        assert!(d.into_user().is_ok());
    }

    #[test]
    fn test_patch_merges_without_clearing() {
        let mut user = draft().into_user().unwrap();
        let patch = UserPatch {
            name: Some("Maria".to_owned()),
            ..Default::default()
        };
        patch.apply_to(&mut user).unwrap();
        assert_eq!(user.name.as_deref(), Some("Maria"));
        assert_eq!(user.email.as_str(), "ana@example.com");
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn test_patch_validates_merged_phone() {
        let mut user = draft().into_user().unwrap();
        user.phone_number = Some("garbage".to_owned());
        // Adding a locale makes the already-stored number subject to
        // validation.
        let patch = UserPatch {
            phone_locale: Some(PhoneLocale::EsEs),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut user).is_err());
    }

    #[test]
    fn test_user_serializes_camel_case_without_internals() {
        let user = draft().into_user().unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("phoneLocale").is_none());
        assert!(json.get("surname").is_none());
        assert_eq!(json["role"], "customer");
        assert!(json.get("revision").is_none());
        assert!(json.get("createdAt").is_none());
    }
}
