//! # Pagination
//!
//! Page math shared by the category list and the item list of a category.
//!
//! ```text
//! total = 12, RESULTS_PER_PAGE = 5
//!
//!   page 0: rows  0..5
//!   page 1: rows  5..10
//!   page 2: rows 10..12   ← max_page = ceil(12 / 5) - 1 = 2
//! ```

/// Rows shown per listing page.
pub const RESULTS_PER_PAGE: i64 = 5;

/// Highest valid page index for `total` rows.
///
/// An empty listing still has page 0.
pub fn max_page(total: usize) -> u64 {
    if total == 0 {
        return 0;
    }
    let total = total as u64;
    let per_page = RESULTS_PER_PAGE as u64;
    total.div_ceil(per_page) - 1
}

/// Row offset of the first entry on `page`.
pub fn offset(page: u64) -> i64 {
    i64::try_from(page)
        .unwrap_or(i64::MAX)
        .saturating_mul(RESULTS_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_page() {
        assert_eq!(max_page(0), 0);
        assert_eq!(max_page(1), 0);
        assert_eq!(max_page(5), 0);
        assert_eq!(max_page(6), 1);
        assert_eq!(max_page(12), 2);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(0), 0);
        assert_eq!(offset(3), 15);
        assert_eq!(offset(u64::MAX), i64::MAX);
    }
}
