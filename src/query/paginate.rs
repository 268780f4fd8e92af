//! Fixed-size, 1-based pagination.

use serde::Serialize;

/// Page size used by the match list and leaderboards.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        }
    }

    /// Number of pages for `total_items`. An empty list still has one (empty) page.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// The requested page clamped into `1..=total_pages`.
    pub fn clamped_page(&self, total_items: usize) -> usize {
        self.page.clamp(1, self.total_pages(total_items))
    }
}

/// One window of a list plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually served, after clamping
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Slice out one page. Out-of-range requests are clamped to the nearest valid page.
pub fn paginate<T: Clone>(items: &[T], pagination: &Pagination) -> Page<T> {
    let total_items = items.len();
    let total_pages = pagination.total_pages(total_items);
    let page = pagination.clamped_page(total_items);

    let start = ((page - 1) * pagination.page_size).min(total_items);
    let end = (start + pagination.page_size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size: pagination.page_size,
        total_items,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 9);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(Some(0), Some(0));
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);
    }

    #[test]
    fn test_middle_page() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(&items, &Pagination::new(Some(2), Some(10)));

        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_last_partial_page() {
        let items: Vec<u32> = (1..=20).collect();
        let page = paginate(&items, &Pagination::new(Some(3), None));

        assert_eq!(page.items, vec![19, 20]);
        assert!(!page.has_next);
    }

    #[test]
    fn test_past_end_clamps_to_last_page() {
        let items: Vec<u32> = (1..=20).collect();
        let page = paginate(&items, &Pagination::new(Some(99), None));

        assert_eq!(page.page, 3);
        assert_eq!(page.items, vec![19, 20]);
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let page = paginate::<u32>(&[], &Pagination::new(Some(4), None));
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_pages_cover_everything_once() {
        for len in [0usize, 1, 8, 9, 10, 18, 19, 40] {
            let items: Vec<usize> = (0..len).collect();
            let total_pages = Pagination::default().total_pages(len);

            let mut joined = Vec::new();
            for n in 1..=total_pages {
                joined.extend(paginate(&items, &Pagination::new(Some(n), None)).items);
            }
            assert_eq!(joined, items, "len {}", len);
        }
    }
}
