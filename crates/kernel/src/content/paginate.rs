//! Page slicing for listings.
//!
//! Page numbers come from URL query strings and may be stale or tampered,
//! so an out-of-range page yields an empty slice rather than an error.
//! The route layer coerces absent/zero/garbage values to 1 before calling
//! in; the paginator itself assumes `page >= 1`.

use serde::Serialize;

/// One page of a larger list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based index of the first item on this page: `(page-1)*page_size`.
    pub first_index: usize,
    /// Exclusive end index: `min(page*page_size, total)`.
    pub last_index: usize,
    /// Size of the unpaginated list.
    pub total: usize,
}

/// Slice `items` into the 1-based `page` of `page_size` entries.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let first_index = page.saturating_sub(1).saturating_mul(page_size);
    let last_index = first_index.saturating_add(page_size).min(total);

    let slice = if first_index >= total {
        Vec::new()
    } else {
        items[first_index..last_index].to_vec()
    };

    Page {
        items: slice,
        first_index,
        last_index,
        total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn twelve() -> Vec<u32> {
        (0..12).collect()
    }

    #[test]
    fn first_page_of_twelve() {
        let page = paginate(&twelve(), 1, 5);
        assert_eq!(page.items, vec![0, 1, 2, 3, 4]);
        assert_eq!(page.first_index, 0);
        assert_eq!(page.last_index, 5);
        assert_eq!(page.total, 12);
    }

    #[test]
    fn last_partial_page_of_twelve() {
        let page = paginate(&twelve(), 3, 5);
        assert_eq!(page.items, vec![10, 11]);
        assert_eq!(page.first_index, 10);
        assert_eq!(page.last_index, 12);
    }

    #[test]
    fn out_of_range_page_is_empty_not_an_error() {
        let page = paginate(&twelve(), 99, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 12);
    }

    #[test]
    fn empty_list() {
        let page = paginate::<u32>(&[], 1, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.last_index, 0);
    }

    #[test]
    fn exact_multiple_boundary() {
        let items: Vec<u32> = (0..10).collect();
        let page = paginate(&items, 2, 5);
        assert_eq!(page.items, vec![5, 6, 7, 8, 9]);
        assert_eq!(page.last_index, 10);

        let beyond = paginate(&items, 3, 5);
        assert!(beyond.items.is_empty());
    }
}
