//! Common API utilities and shared types

use serde::{Deserialize, Serialize};

use crate::models::{PageItem, PagedResult};
use crate::services::pagination::build_page_window;

// ============================================================================
// Query Types
// ============================================================================

// Page and limit stay raw strings so that junk like `?page=abc` falls back to
// defaults instead of being rejected by the extractor.

/// Query parameters for the public recipe list
#[derive(Debug, Default, Deserialize)]
pub struct PublicListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub lang: Option<String>,
}

/// Query parameters for the admin recipe list
#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Filter by status (draft, published)
    pub status: Option<String>,
}

/// Query parameters for single recipe lookups
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

// ============================================================================
// Pagination Block
// ============================================================================

/// Pagination metadata returned with every list
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationBlock {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub window: Vec<PageItem>,
}

impl<T> From<&PagedResult<T>> for PaginationBlock {
    fn from(result: &PagedResult<T>) -> Self {
        let total_pages = result.total_pages();
        Self {
            page: result.page,
            limit: result.limit,
            total: result.total,
            total_pages,
            has_next: result.has_next(),
            has_prev: result.has_prev(),
            window: build_page_window(result.page, total_pages),
        }
    }
}

/// Query string pointing at a corrected page, carrying one extra parameter
pub fn page_query(page: u32, limit: u32, extra: Option<(&str, &str)>) -> String {
    let mut query = format!("page={}&limit={}", page, limit);
    if let Some((key, value)) = extra {
        query.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_block_from_result() {
        let result: PagedResult<()> = PagedResult {
            items: vec![],
            total: 95,
            page: 5,
            limit: 10,
            corrected: false,
        };
        let block = PaginationBlock::from(&result);
        assert_eq!(block.total_pages, 10);
        assert!(block.has_next);
        assert!(block.has_prev);
        assert_eq!(
            block.window,
            vec![
                PageItem::Page(0),
                PageItem::Ellipsis,
                PageItem::Page(3),
                PageItem::Page(4),
                PageItem::Page(5),
                PageItem::Ellipsis,
                PageItem::Page(9),
            ]
        );
    }

    #[test]
    fn test_page_query() {
        assert_eq!(page_query(3, 10, None), "page=3&limit=10");
        assert_eq!(page_query(1, 20, Some(("lang", "bg"))), "page=1&limit=20&lang=bg");
        assert_eq!(
            page_query(2, 50, Some(("status", "draft"))),
            "page=2&limit=50&status=draft"
        );
        assert_eq!(page_query(1, 20, Some(("lang", "en US"))), "page=1&limit=20&lang=en%20US");
    }
}
