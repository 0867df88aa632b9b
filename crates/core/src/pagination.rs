//! Page arithmetic for list endpoints.
//!
//! Pages are 1-based with a fixed size. The raw `page` query parameter is
//! parsed here so every list endpoint rejects malformed values the same way.

/// Fixed page size for paginated list endpoints.
pub const PAGE_SIZE: u64 = 10;

/// Error returned for a `page` parameter that is not a positive integer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("page must be a positive integer")]
pub struct PageError;

/// Parse the raw `page` query parameter. Absent means page 1.
///
/// # Errors
///
/// Returns [`PageError`] when the value is non-numeric or not positive.
pub fn parse_page(raw: Option<&str>) -> Result<u64, PageError> {
    match raw {
        None => Ok(1),
        Some(s) => match s.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(n.unsigned_abs()),
            _ => Err(PageError),
        },
    }
}

/// Offset of the first item on `page` (0-based).
#[must_use]
pub const fn offset(page: u64, page_size: u64) -> u64 {
    (page - 1).saturating_mul(page_size)
}

/// Index of the last page: the smallest `n` with `n * page_size >= count`.
///
/// Zero when the collection is empty.
#[must_use]
pub const fn last_page(count: u64, page_size: u64) -> u64 {
    count.div_ceil(page_size)
}

/// Whether `page` starts past the end of a collection of `count` items.
///
/// The boundary is deliberately lax: a page starting exactly at `count`
/// is in range and yields an empty slice.
#[must_use]
pub const fn out_of_range(page: u64, page_size: u64, count: u64) -> bool {
    offset(page, page_size) > count
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_defaults_to_one() {
        assert_eq!(parse_page(None).unwrap(), 1);
    }

    #[test]
    fn test_parse_page_accepts_positive_integers() {
        assert_eq!(parse_page(Some("1")).unwrap(), 1);
        assert_eq!(parse_page(Some("42")).unwrap(), 42);
        assert_eq!(parse_page(Some(" 7 ")).unwrap(), 7);
    }

    #[test]
    fn test_parse_page_rejects_non_positive_and_garbage() {
        for raw in ["0", "-1", "abc", "1.5", ""] {
            assert!(parse_page(Some(raw)).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1, PAGE_SIZE), 0);
        assert_eq!(offset(2, PAGE_SIZE), 10);
        assert_eq!(offset(5, 3), 12);
    }

    #[test]
    fn test_last_page_bounds() {
        // lastPage * size >= count and (lastPage - 1) * size < count,
        // for every count >= 0.
        for count in 0..=103u64 {
            let last = last_page(count, PAGE_SIZE);
            assert!(last * PAGE_SIZE >= count, "count={count}");
            let signed_last = i64::try_from(last).unwrap();
            let signed_count = i64::try_from(count).unwrap();
            assert!((signed_last - 1) * 10 < signed_count, "count={count}");
        }
        assert_eq!(last_page(0, PAGE_SIZE), 0);
        assert_eq!(last_page(10, PAGE_SIZE), 1);
        assert_eq!(last_page(11, PAGE_SIZE), 2);
    }

    #[test]
    fn test_out_of_range_boundary() {
        // A page starting exactly at count is still in range.
        assert!(!out_of_range(2, PAGE_SIZE, 10));
        assert!(out_of_range(2, PAGE_SIZE, 9));
        assert!(!out_of_range(1, PAGE_SIZE, 0));
        assert!(out_of_range(3, PAGE_SIZE, 19));
    }
}
