//! # Pagination
//!
//! Slices the deduplicated result set into pages.
//!
//! ```text
//! 250 unique rows, perPage = 100
//!
//!   page 1 → [0..100)    100 rows ┐
//!   page 2 → [100..200)  100 rows │ total = 250, totalPages = 3
//!   page 3 → [200..250)   50 rows │
//!   page 4 → []            0 rows ┘ (not an error)
//! ```
//!
//! `total` is the post-dedup length, never the raw SQL row count.

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

/// Cuts `page` (1-based) out of `rows`.
///
/// `page` is expected to be clamped to ≥ 1 by the caller; 0 is treated as 1.
/// `total_pages` is `ceil(total / per_page)` when `per_page > 0`, else 1.
///
/// ## Example
/// ```rust
/// use catalog_core::pagination::paginate;
///
/// let rows: Vec<u32> = (0..250).collect();
/// let page = paginate(rows, 3, 100);
/// assert_eq!(page.items.len(), 50);
/// assert_eq!(page.total, 250);
/// assert_eq!(page.total_pages, 3);
/// ```
pub fn paginate<T>(rows: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let page = page.max(1);
    let total = rows.len();

    let total_pages = if per_page > 0 {
        total.div_ceil(per_page as usize) as u32
    } else {
        1
    };

    let items = if per_page == 0 {
        Vec::new()
    } else {
        let start = (page as usize - 1).saturating_mul(per_page as usize);
        rows.into_iter().skip(start).take(per_page as usize).collect()
    };

    Page {
        items,
        total: total as u64,
        page,
        total_pages,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: u32) -> Vec<u32> {
        (0..n).collect()
    }

    #[test]
    fn test_page_boundaries() {
        let first = paginate(rows(250), 1, 100);
        assert_eq!(first.items.len(), 100);
        assert_eq!(first.items[0], 0);
        assert_eq!(first.total_pages, 3);

        let last = paginate(rows(250), 3, 100);
        assert_eq!(last.items.len(), 50);
        assert_eq!(last.items[0], 200);

        let beyond = paginate(rows(250), 4, 100);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 250);
        assert_eq!(beyond.total_pages, 3);
        assert_eq!(beyond.page, 4);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, per_page, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2)] {
            assert_eq!(paginate(rows(total), 1, per_page).total_pages, expected);
        }
    }

    #[test]
    fn test_zero_per_page() {
        let page = paginate(rows(5), 1, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total, 5);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_zero_is_clamped() {
        let page = paginate(rows(5), 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![0, 1]);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = paginate(rows(5), u32::MAX, u32::MAX);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
