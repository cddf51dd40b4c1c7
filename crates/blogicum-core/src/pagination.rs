//! Page-number pagination for post collections.

use std::num::IntErrorKind;

use serde::Serialize;

/// Posts shown per page on index, category and profile pages.
pub const POSTS_PER_PAGE: u64 = 10;

/// Number of pages needed for `count` items. An empty collection still has
/// one (empty) page.
pub fn num_pages(count: u64, page_size: u64) -> u64 {
    if count == 0 || page_size == 0 {
        1
    } else {
        count.div_ceil(page_size)
    }
}

/// Resolve the raw `page` query parameter against a collection size.
///
/// Missing or non-numeric values give the first page; numbers below one or
/// past the end give the last page, including ones too large to parse.
pub fn resolve_page(raw: Option<&str>, count: u64, page_size: u64) -> u64 {
    let last = num_pages(count, page_size);
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 1;
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 && (n as u64) <= last => n as u64,
        Ok(_) => last,
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            last
        }
        Err(_) => 1,
    }
}

/// A single page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub number: u64,
    pub num_pages: u64,
    /// Total number of items across all pages.
    pub count: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u64, count: u64, page_size: u64) -> Self {
        let num_pages = num_pages(count, page_size);
        Self {
            items,
            number,
            num_pages,
            count,
            page_size,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_pages() {
        assert_eq!(num_pages(0, 10), 1);
        assert_eq!(num_pages(10, 10), 1);
        assert_eq!(num_pages(11, 10), 2);
        assert_eq!(num_pages(12, 10), 2);
    }

    #[test]
    fn test_resolve_page_defaults_to_first() {
        assert_eq!(resolve_page(None, 12, 10), 1);
        assert_eq!(resolve_page(Some(""), 12, 10), 1);
        assert_eq!(resolve_page(Some("abc"), 12, 10), 1);
    }

    #[test]
    fn test_resolve_page_out_of_range_gives_last() {
        assert_eq!(resolve_page(Some("2"), 12, 10), 2);
        assert_eq!(resolve_page(Some("7"), 12, 10), 2);
        assert_eq!(resolve_page(Some("0"), 12, 10), 2);
        assert_eq!(resolve_page(Some("-3"), 12, 10), 2);
        assert_eq!(resolve_page(Some("4"), 0, 10), 1);
    }

    #[test]
    fn test_resolve_page_overflowing_number_gives_last() {
        assert_eq!(resolve_page(Some("99999999999999999999"), 12, 10), 2);
        assert_eq!(resolve_page(Some("-99999999999999999999"), 12, 10), 2);
        assert_eq!(resolve_page(Some("9999999999999999999x"), 12, 10), 1);
    }

    #[test]
    fn test_page_flags() {
        let first = Page::new(vec![1; 10], 1, 12, 10);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last = Page::new(vec![1; 2], 2, 12, 10);
        assert!(!last.has_next);
        assert!(last.has_previous);
        assert_eq!(last.num_pages, 2);
    }
}
