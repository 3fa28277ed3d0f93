//! Page-number pagination primitives shared by aula-backend endpoints.
//!
//! Listing and search operations accept a caller-supplied page and page size
//! that must be clamped before any query runs: a non-positive page becomes 1,
//! and a non-positive or over-ceiling page size becomes the configured
//! ceiling. [`PageRequest`] encodes a request that has already passed through
//! that clamping, so repositories never see unbounded limits. [`Page`] is the
//! serialisable envelope carrying the items together with the total count of
//! the filtered predicate, so clients can render pagination controls.

use serde::{Deserialize, Serialize};

/// Ceiling applied when a caller configures a non-positive ceiling.
pub const FALLBACK_PAGE_SIZE: i64 = 20;

/// A clamped pagination request.
///
/// Construct via [`PageRequest::clamped`]; the invariants `page >= 1` and
/// `1 <= page_size <= ceiling` hold for every value of this type.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::clamped(0, 500, 50);
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.page_size(), 50);
/// assert_eq!(request.offset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Clamp a raw page/page-size pair against a ceiling.
    ///
    /// A non-positive `page` becomes 1. A non-positive `page_size`, or one
    /// exceeding `ceiling`, becomes `ceiling`. A non-positive `ceiling`
    /// falls back to [`FALLBACK_PAGE_SIZE`].
    #[must_use]
    pub fn clamped(page: i64, page_size: i64, ceiling: i64) -> Self {
        let ceiling = if ceiling > 0 {
            ceiling
        } else {
            FALLBACK_PAGE_SIZE
        };
        let page_size = if page_size <= 0 || page_size > ceiling {
            ceiling
        } else {
            page_size
        };
        let page = if page <= 0 { 1 } else { page };
        Self { page, page_size }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Row limit to apply to the query; identical to the page size.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size
    }
}

/// One page of results plus the pagination metadata clients need.
///
/// `total` is the count of the *filtered* predicate, computed before any
/// limit/offset was applied, so it stays correct on every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, at most `page_size` of them.
    pub items: Vec<T>,
    /// Total number of matching rows across all pages.
    pub total: i64,
    /// One-based page number this envelope refers to.
    pub page: i64,
    /// Page size the listing was produced with.
    pub page_size: i64,
}

impl<T> Page<T> {
    /// Wrap query results with the request they were produced for.
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
        }
    }

    /// An empty page with zero total, used when a search short-circuits.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{FALLBACK_PAGE_SIZE, Page, PageRequest};

    #[rstest]
    #[case(0, 0, 20, 1, 20)]
    #[case(-3, -1, 20, 1, 20)]
    #[case(2, 10, 20, 2, 10)]
    #[case(2, 50, 20, 2, 20)]
    #[case(1, 20, 20, 1, 20)]
    fn clamps_page_and_size(
        #[case] page: i64,
        #[case] page_size: i64,
        #[case] ceiling: i64,
        #[case] expected_page: i64,
        #[case] expected_size: i64,
    ) {
        let request = PageRequest::clamped(page, page_size, ceiling);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.page_size(), expected_size);
    }

    #[rstest]
    fn non_positive_ceiling_falls_back() {
        let request = PageRequest::clamped(1, 10, 0);
        assert_eq!(request.page_size(), 10);
        let request = PageRequest::clamped(1, 0, -5);
        assert_eq!(request.page_size(), FALLBACK_PAGE_SIZE);
    }

    #[rstest]
    #[case(1, 20, 0)]
    #[case(2, 20, 20)]
    #[case(5, 10, 40)]
    fn offset_skips_prior_pages(#[case] page: i64, #[case] size: i64, #[case] expected: i64) {
        let request = PageRequest::clamped(page, size, 50);
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    fn envelope_carries_request_metadata() {
        let request = PageRequest::clamped(3, 10, 50);
        let page = Page::new(vec!["a", "b"], 42, request);
        assert_eq!(page.total, 42);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.items.len(), 2);
    }

    #[rstest]
    fn empty_page_has_zero_total() {
        let request = PageRequest::clamped(1, 10, 50);
        let page: Page<u8> = Page::empty(request);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
