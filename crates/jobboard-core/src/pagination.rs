//! # Pagination
//!
//! Page numbers are 1-based. Client input is clamped rather than rejected:
//! a page below 1 becomes 1, a missing or non-positive page size becomes
//! [`PageRequest::DEFAULT_PAGE_SIZE`], and anything above
//! [`PageRequest::MAX_PAGE_SIZE`] is capped.

use serde::{Deserialize, Serialize};

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl PageRequest {
    /// Page size used when the client does not ask for one.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Upper bound on the page size.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Build a request from raw (possibly absent or out of range) values.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => s.min(Self::MAX_PAGE_SIZE as i64) as u32,
            _ => Self::DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    /// Number of items to skip before this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Page metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of matching items across all pages.
    pub total: usize,
    /// The page that was returned.
    pub page: u32,
    /// The page size that was applied.
    pub page_size: u32,
    /// Number of pages needed to hold `total` items.
    pub total_page: usize,
}

impl PageMeta {
    /// Derive metadata for `total` items under `request`.
    pub fn new(total: usize, request: PageRequest) -> Self {
        let size = request.page_size as usize;
        Self {
            total,
            page: request.page,
            page_size: request.page_size,
            total_page: total.div_ceil(size),
        }
    }
}

/// Cut one page out of an already filtered and ordered list.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> (Vec<T>, PageMeta) {
    let meta = PageMeta::new(items.len(), request);
    let page = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size as usize)
        .collect();
    (page, meta)
}
