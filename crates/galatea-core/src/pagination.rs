//! Pagination value types shared by repositories and services.

use serde::{Deserialize, Serialize};

/// Page size used when the caller asks for none (or an invalid one).
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Build a request, normalising `page < 1` to 1 and `page_size < 1`
    /// to [`DEFAULT_PAGE_SIZE`].
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
        }
    }

    /// Number of items to skip. Saturates for pages far past the end.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.page_size)
    }

    /// Apply the request to an already ordered sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size)
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: usize, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            total_pages: total_count.div_ceil(request.page_size.max(1)),
            page: request.page,
            page_size: request.page_size,
        }
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}
