//! Addressing of embedded sub-resource sequences.
//!
//! Addresses and orders nested under a user are reachable two ways: by the
//! element's stable id, or by its 1-based position in insertion order. Both
//! modes are live on the same path parameter, so parsing tries the integer
//! reading first and falls back to an id.

use core::str::FromStr;

/// Error for a parameter that is neither a positive integer nor a valid id.
#[derive(Debug, Clone, thiserror::Error)]
#[error("not a position or id: {0}")]
pub struct SelectorError(pub String);

/// Error for a 1-based position past the end of the sequence.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("position {position} exceeds sequence length {len}")]
pub struct OutOfRange {
    /// The requested 1-based position.
    pub position: u64,
    /// Length of the sequence at lookup time.
    pub len: usize,
}

/// A parsed sub-resource path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<I> {
    /// 1-based position in insertion order.
    Position(u64),
    /// Stable element identifier.
    Id(I),
}

impl<I: FromStr> Selector<I> {
    /// Parse a raw path parameter.
    ///
    /// A string of digits (with optional sign) is read as a position; it
    /// must be positive. Anything non-numeric must parse as an id.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the value is a non-positive integer
    /// or neither an integer nor a well-formed id.
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<i64>() {
            if n > 0 {
                return Ok(Self::Position(n.unsigned_abs()));
            }
            return Err(SelectorError(raw.to_owned()));
        }
        I::from_str(raw)
            .map(Self::Id)
            .map_err(|_| SelectorError(raw.to_owned()))
    }
}

/// Convert a 1-based position into a 0-based index into a sequence of
/// `len` elements.
///
/// # Errors
///
/// Returns [`OutOfRange`] when `position` is zero or exceeds `len`.
/// [`Selector::parse`] already rejects non-positive positions.
pub fn resolve_position(position: u64, len: usize) -> Result<usize, OutOfRange> {
    position
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
        .filter(|index| *index < len)
        .ok_or(OutOfRange { position, len })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::AddressId;

    #[test]
    fn test_parse_positive_integer_as_position() {
        assert_eq!(
            Selector::<AddressId>::parse("3").unwrap(),
            Selector::Position(3)
        );
        assert_eq!(
            Selector::<AddressId>::parse(" 12 ").unwrap(),
            Selector::Position(12)
        );
    }

    #[test]
    fn test_parse_uuid_as_id() {
        let id = AddressId::random();
        assert_eq!(
            Selector::<AddressId>::parse(&id.to_string()).unwrap(),
            Selector::Id(id)
        );
    }

    #[test]
    fn test_parse_rejects_non_positive_and_garbage() {
        for raw in ["0", "-1", "foo", "1.5", ""] {
            assert!(Selector::<AddressId>::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_resolve_position_bounds() {
        // Appending then reading at position `length` returns the new last
        // element, so `position == len` must resolve.
        assert_eq!(resolve_position(1, 1).unwrap(), 0);
        assert_eq!(resolve_position(3, 3).unwrap(), 2);
        assert!(resolve_position(4, 3).is_err());
        assert!(resolve_position(1, 0).is_err());
        assert!(resolve_position(0, 3).is_err());
    }
}
