//! Pagination types
//!
//! This module provides:
//! - `PaginationRequest`, the normalized page/limit pair used by list queries
//! - `PageItem`, one entry of a rendered page window
//! - `PagedResult`, a page of items with its totals

use serde::{Deserialize, Serialize};

/// Number of pages needed for `count` items, `ceil(count / limit)`
pub fn page_count(count: i64, limit: u32) -> u32 {
    if count <= 0 || limit == 0 {
        return 0;
    }
    let pages = (count as u64).div_ceil(limit as u64);
    pages.min(u32::MAX as u64) as u32
}

/// Page/limit pair for list queries. `page` is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    pub page: u32,
    pub limit: u32,
}

impl PaginationRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.limit as i64
    }
}

/// One entry of a page window.
///
/// `Page` holds a 0-based page index; renderers add 1 for display.
/// `Ellipsis` marks a run of hidden pages and is not navigable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "lowercase")]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl PageItem {
    pub fn index(&self) -> Option<u32> {
        match self {
            PageItem::Page(index) => Some(*index),
            PageItem::Ellipsis => None,
        }
    }

    pub fn is_ellipsis(&self) -> bool {
        matches!(self, PageItem::Ellipsis)
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed), after correction
    pub page: u32,
    /// Number of items per page
    pub limit: u32,
    /// True when the requested page was out of range and has been moved
    pub corrected: bool,
}

impl<T> PagedResult<T> {
    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        page_count(self.total, self.limit)
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
