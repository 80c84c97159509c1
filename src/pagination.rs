//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The page size to use when a request does not specify a valid one.
    pub default_page_size: u64,
    /// The largest page size a request may ask for. Larger requests are clamped to this value.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// The page number, starting from 1.
    pub page: u64,
    /// The number of items per page, always at least 1.
    pub page_size: u64,
}

impl Pagination {
    /// Create a page request, clamping `page` and `page_size` to at least 1.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// The number of items to skip to reach the start of the page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The number of pages needed to show `total` items.
    ///
    /// There is always at least one page, even when there are no items.
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size).max(1)
    }
}
