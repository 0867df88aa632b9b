//! Postal addresses embedded in user documents and orders.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::AddressId;

/// Errors produced when validating an [`AddressDraft`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AddressError {
    /// A required field is empty.
    #[error("{0} is required")]
    Missing(&'static str),
    /// A field exceeds its maximum length.
    #[error("{field} length must not be longer than {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// The postal code does not match the country's format.
    #[error("{0} is not a valid postal code for the specified country")]
    InvalidPostalCode(String),
    /// A stored phone locale tag is not one of the supported locales.
    #[error("unknown phone locale: {0}")]
    UnknownLocale(String),
}

/// Countries the shop ships to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    /// Spain
    ES,
    /// France
    FR,
    /// United Kingdom
    GB,
    /// Germany
    DE,
    /// Italy
    IT,
}

impl CountryCode {
    /// Whether `postal_code` matches this country's postal-code shape.
    ///
    /// ES/FR/DE/IT use five digits; GB uses the outward+inward postcode
    /// format (e.g. `SW1A 1AA`).
    #[must_use]
    pub fn matches_postal_code(self, postal_code: &str) -> bool {
        let code = postal_code.trim();
        match self {
            Self::ES | Self::FR | Self::DE | Self::IT => {
                code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
            }
            Self::GB => is_uk_postcode(code),
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::ES => "ES",
            Self::FR => "FR",
            Self::GB => "GB",
            Self::DE => "DE",
            Self::IT => "IT",
        };
        f.write_str(code)
    }
}

/// Phone locales accepted for user profiles, matching the shipping countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhoneLocale {
    /// Spanish
    #[serde(rename = "es-ES")]
    EsEs,
    /// French
    #[serde(rename = "fr-FR")]
    FrFr,
    /// British
    #[serde(rename = "en-GB")]
    EnGb,
    /// Italian
    #[serde(rename = "it-IT")]
    ItIt,
    /// German
    #[serde(rename = "de-DE")]
    DeDe,
}

impl PhoneLocale {
    /// The canonical locale tag, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EsEs => "es-ES",
            Self::FrFr => "fr-FR",
            Self::EnGb => "en-GB",
            Self::ItIt => "it-IT",
            Self::DeDe => "de-DE",
        }
    }
}

impl fmt::Display for PhoneLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PhoneLocale {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es-ES" => Ok(Self::EsEs),
            "fr-FR" => Ok(Self::FrFr),
            "en-GB" => Ok(Self::EnGb),
            "it-IT" => Ok(Self::ItIt),
            "de-DE" => Ok(Self::DeDe),
            other => Err(AddressError::UnknownLocale(other.to_owned())),
        }
    }
}

/// An address as submitted by a client, before an id is assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    /// Street line.
    pub address: String,
    /// City or town.
    pub city: String,
    /// Shipping country.
    pub country_code: CountryCode,
    /// Postal code, validated against `country_code`.
    pub postal_code: String,
}

impl AddressDraft {
    const MAX_ADDRESS: usize = 64;
    const MAX_CITY: usize = 48;

    /// Validate field presence, lengths, and the country-conditional
    /// postal-code format.
    ///
    /// # Errors
    ///
    /// Returns the first [`AddressError`] encountered.
    pub fn validate(&self) -> Result<(), AddressError> {
        if self.address.trim().is_empty() {
            return Err(AddressError::Missing("address"));
        }
        if self.address.trim().len() > Self::MAX_ADDRESS {
            return Err(AddressError::TooLong {
                field: "address",
                max: Self::MAX_ADDRESS,
            });
        }
        if self.city.trim().is_empty() {
            return Err(AddressError::Missing("city"));
        }
        if self.city.trim().len() > Self::MAX_CITY {
            return Err(AddressError::TooLong {
                field: "city",
                max: Self::MAX_CITY,
            });
        }
        if !self.country_code.matches_postal_code(&self.postal_code) {
            return Err(AddressError::InvalidPostalCode(self.postal_code.clone()));
        }
        Ok(())
    }

    /// Attach a freshly assigned id, producing a stored [`Address`].
    ///
    /// Field whitespace is normalized here so stored documents are clean.
    #[must_use]
    pub fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            country_code: self.country_code,
            postal_code: self.postal_code.trim().to_owned(),
        }
    }
}

/// A stored address element of a user's embedded address sequence, or an
/// order's shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Stable identifier, assigned at append time.
    pub id: AddressId,
    /// Street line.
    pub address: String,
    /// City or town.
    pub city: String,
    /// Shipping country.
    pub country_code: CountryCode,
    /// Postal code.
    pub postal_code: String,
}

/// UK postcode shape: 1-2 letters, 1-2 digits (optionally a trailing
/// letter), then a digit and two letters, with an optional single space
/// before the inward part.
fn is_uk_postcode(code: &str) -> bool {
    let compact: Vec<u8> = code
        .bytes()
        .filter(|b| *b != b' ')
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if !(5..=7).contains(&compact.len()) {
        return false;
    }

    // Inward part is always digit-letter-letter.
    let (outward, inward) = compact.split_at(compact.len() - 3);
    let inward_ok = matches!(inward, [d, a, b] if d.is_ascii_digit() && a.is_ascii_alphabetic() && b.is_ascii_alphabetic());
    if !inward_ok {
        return false;
    }

    // Outward: leading letters, then digits, optionally one trailing letter.
    let letters = outward
        .iter()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    if !(1..=2).contains(&letters) {
        return false;
    }
    let rest = outward.split_at(letters).1;
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if !(1..=2).contains(&digits) {
        return false;
    }
    match rest.split_at(digits).1 {
        [] => true,
        [b] => b.is_ascii_alphabetic(),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(country: CountryCode, postal: &str) -> AddressDraft {
        AddressDraft {
            address: "Calle Mayor 1".to_owned(),
            city: "Madrid".to_owned(),
            country_code: country,
            postal_code: postal.to_owned(),
        }
    }

    #[test]
    fn test_numeric_postal_codes() {
        assert!(draft(CountryCode::ES, "28013").validate().is_ok());
        assert!(draft(CountryCode::FR, "75001").validate().is_ok());
        assert!(draft(CountryCode::DE, "10115").validate().is_ok());
        assert!(draft(CountryCode::IT, "00184").validate().is_ok());

        assert!(draft(CountryCode::ES, "2801").validate().is_err());
        assert!(draft(CountryCode::ES, "28O13").validate().is_err());
        assert!(draft(CountryCode::DE, "101155").validate().is_err());
    }

    #[test]
    fn test_uk_postal_codes() {
        assert!(draft(CountryCode::GB, "SW1A 1AA").validate().is_ok());
        assert!(draft(CountryCode::GB, "M1 1AE").validate().is_ok());
        assert!(draft(CountryCode::GB, "CR2 6XH").validate().is_ok());
        assert!(draft(CountryCode::GB, "ec1a1bb").validate().is_ok());

        assert!(draft(CountryCode::GB, "12345").validate().is_err());
        assert!(draft(CountryCode::GB, "SW1A 1A").validate().is_err());
        assert!(draft(CountryCode::GB, "ABC 1AA").validate().is_err());
    }

    #[test]
    fn test_required_fields() {
        let mut d = draft(CountryCode::ES, "28013");
        d.address = "  ".to_owned();
        assert!(matches!(d.validate(), Err(AddressError::Missing("address"))));

        let mut d = draft(CountryCode::ES, "28013");
        d.city = String::new();
        assert!(matches!(d.validate(), Err(AddressError::Missing("city"))));
    }

    #[test]
    fn test_length_limits() {
        let mut d = draft(CountryCode::ES, "28013");
        d.address = "x".repeat(65);
        assert!(matches!(
            d.validate(),
            Err(AddressError::TooLong { field: "address", .. })
        ));

        let mut d = draft(CountryCode::ES, "28013");
        d.city = "x".repeat(49);
        assert!(matches!(
            d.validate(),
            Err(AddressError::TooLong { field: "city", .. })
        ));
    }

    #[test]
    fn test_into_address_trims_fields() {
        let mut d = draft(CountryCode::ES, " 28013 ");
        d.address = " Calle Mayor 1 ".to_owned();
        let id = AddressId::random();
        let address = d.into_address(id);
        assert_eq!(address.id, id);
        assert_eq!(address.address, "Calle Mayor 1");
        assert_eq!(address.postal_code, "28013");
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let address = draft(CountryCode::ES, "28013").into_address(AddressId::random());
        let json = serde_json::to_value(&address).unwrap();
        assert!(json.get("countryCode").is_some());
        assert!(json.get("postalCode").is_some());
        assert!(json.get("country_code").is_none());
    }
}
