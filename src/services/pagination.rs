//! Pagination engine
//!
//! Pure helpers used by list endpoints:
//! - `PaginationPolicy::request` turns raw query values into a `PaginationRequest`
//! - `correct_page` pulls an out-of-range page back once the item count is known
//! - `build_page_window` computes the page buttons (with ellipsis breaks) to render

use crate::config::PaginationConfig;
pub use crate::models::page_count;
use crate::models::{PageItem, PaginationRequest};

/// Number of pages shown on each side of the current page
pub const SIBLING_COUNT: u32 = 1;

/// Outcome of `correct_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCorrection {
    pub request: PaginationRequest,
    /// True when the page differs from the one that was asked for
    pub corrected: bool,
}

/// Clamp `page` to the last page that exists for `count` items.
///
/// An empty collection still has page 1.
pub fn correct_page(page: u32, limit: u32, count: i64) -> PageCorrection {
    let requested = PaginationRequest::new(page, limit);
    let last = page_count(count, requested.limit).max(1);

    if requested.page > last {
        PageCorrection {
            request: PaginationRequest::new(last, requested.limit),
            corrected: true,
        }
    } else {
        PageCorrection {
            request: requested,
            corrected: requested.page != page,
        }
    }
}

/// Compute the page window for a 1-based `page` out of `total_pages`.
///
/// Returned indices are 0-based. `total_pages == 0` is treated as a single
/// page and `page` is clamped into range.
pub fn build_page_window(page: u32, total_pages: u32) -> Vec<PageItem> {
    let total = total_pages.max(1) as i64;
    let page = (page.max(1) as i64).min(total);
    let siblings = SIBLING_COUNT as i64;

    let page_items = siblings + 5;
    if page_items >= total {
        return dense(0, total - 1);
    }

    let left_sibling = (page - 1 - siblings).max(1);
    let right_sibling = (page - 1 + siblings).min(total - 1);
    let show_left_break = left_sibling > 1;
    let show_right_break = right_sibling < total - 2;

    match (show_left_break, show_right_break) {
        (false, false) => dense(0, total - 1),
        (false, true) => {
            // Reached for the first three pages; the block runs through the
            // current page's right sibling.
            let mut items = dense(0, 1 + 2 * siblings);
            items.push(PageItem::Ellipsis);
            items.push(PageItem::Page((total - 1) as u32));
            items
        }
        (true, false) => {
            let right_count = 3 + 2 * siblings;
            let mut items = vec![PageItem::Page(0), PageItem::Ellipsis];
            items.extend(dense(total - right_count, total - 1));
            items
        }
        (true, true) => {
            let mut items = vec![PageItem::Page(0), PageItem::Ellipsis];
            items.extend(dense(left_sibling, right_sibling));
            items.push(PageItem::Ellipsis);
            items.push(PageItem::Page((total - 1) as u32));
            items
        }
    }
}

fn dense(from: i64, to: i64) -> Vec<PageItem> {
    (from..=to).map(|i| PageItem::Page(i as u32)).collect()
}

/// Page/limit defaults and the set of page sizes a client may ask for
#[derive(Debug, Clone)]
pub struct PaginationPolicy {
    default_limit: u32,
    allowed_limits: Vec<u32>,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self::from_config(&PaginationConfig::default())
    }
}

impl PaginationPolicy {
    pub fn from_config(config: &PaginationConfig) -> Self {
        Self {
            default_limit: config.default_limit.max(1),
            allowed_limits: config.allowed_limits.clone(),
        }
    }

    /// Build a request from raw query values.
    ///
    /// Missing or unparsable values fall back to page 1 and the default limit;
    /// a limit outside the allowed set falls back to the default limit.
    pub fn request(&self, page: Option<&str>, limit: Option<&str>) -> PaginationRequest {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| p.clamp(1, u32::MAX as i64) as u32)
            .unwrap_or(1);

        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .and_then(|l| u32::try_from(l).ok())
            .filter(|l| self.allowed_limits.contains(l))
            .unwrap_or(self.default_limit);

        PaginationRequest::new(page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pages(indices: &[u32]) -> Vec<PageItem> {
        indices.iter().map(|i| PageItem::Page(*i)).collect()
    }

    #[test]
    fn test_correct_page_past_end() {
        let result = correct_page(99, 10, 25);
        assert_eq!(result.request, PaginationRequest { page: 3, limit: 10 });
        assert!(result.corrected);
    }

    #[test]
    fn test_correct_page_empty_collection() {
        let result = correct_page(1, 10, 0);
        assert_eq!(result.request, PaginationRequest { page: 1, limit: 10 });
        assert!(!result.corrected);

        let result = correct_page(4, 10, 0);
        assert_eq!(result.request.page, 1);
        assert!(result.corrected);
    }

    #[test]
    fn test_correct_page_in_range_unchanged() {
        let result = correct_page(2, 10, 25);
        assert_eq!(result.request, PaginationRequest { page: 2, limit: 10 });
        assert!(!result.corrected);

        let result = correct_page(3, 10, 30);
        assert_eq!(result.request.page, 3);
        assert!(!result.corrected);
    }

    #[test]
    fn test_correct_page_zero_page() {
        let result = correct_page(0, 10, 25);
        assert_eq!(result.request.page, 1);
        assert!(result.corrected);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(-5, 10), 0);
    }

    #[test]
    fn test_window_small_totals_are_dense() {
        assert_eq!(build_page_window(1, 0), pages(&[0]));
        assert_eq!(build_page_window(1, 1), pages(&[0]));
        assert_eq!(build_page_window(4, 6), pages(&[0, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_window_both_breaks() {
        let mut expected = vec![PageItem::Page(0), PageItem::Ellipsis];
        expected.extend(pages(&[3, 4, 5]));
        expected.push(PageItem::Ellipsis);
        expected.push(PageItem::Page(9));
        assert_eq!(build_page_window(5, 10), expected);
    }

    #[test]
    fn test_window_right_break_only() {
        let mut expected = pages(&[0, 1, 2, 3]);
        expected.push(PageItem::Ellipsis);
        expected.push(PageItem::Page(19));
        assert_eq!(build_page_window(1, 20), expected);
        assert_eq!(build_page_window(2, 20), expected);
        assert_eq!(build_page_window(3, 20), expected);
        assert!(build_page_window(3, 20).contains(&PageItem::Page(3)));
    }

    #[test]
    fn test_window_left_break_only() {
        let mut expected = vec![PageItem::Page(0), PageItem::Ellipsis];
        expected.extend(pages(&[15, 16, 17, 18, 19]));
        assert_eq!(build_page_window(20, 20), expected);
        assert_eq!(build_page_window(18, 20), expected);
    }

    #[test]
    fn test_window_page_past_end_is_clamped() {
        assert_eq!(build_page_window(500, 20), build_page_window(20, 20));
        assert_eq!(build_page_window(0, 20), build_page_window(1, 20));
    }

    #[test]
    fn test_policy_defaults() {
        let policy = PaginationPolicy::default();
        assert_eq!(policy.request(None, None), PaginationRequest { page: 1, limit: 10 });
        assert_eq!(
            policy.request(Some("3"), Some("20")),
            PaginationRequest { page: 3, limit: 20 }
        );
    }

    #[test]
    fn test_policy_rejects_unknown_limit() {
        let policy = PaginationPolicy::default();
        assert_eq!(policy.request(Some("2"), Some("7")).limit, 10);
        assert_eq!(policy.request(Some("2"), Some("-20")).limit, 10);
        assert_eq!(policy.request(Some("2"), Some("lots")).limit, 10);
    }

    #[test]
    fn test_policy_clamps_page() {
        let policy = PaginationPolicy::default();
        assert_eq!(policy.request(Some("-4"), None).page, 1);
        assert_eq!(policy.request(Some("0"), None).page, 1);
        assert_eq!(policy.request(Some("abc"), None).page, 1);
        assert_eq!(policy.request(Some("99999999999"), None).page, u32::MAX);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_small_totals_are_dense(total in 0u32..=6, page in 0u32..10) {
            let window = build_page_window(page, total);
            let expected: Vec<PageItem> = (0..total.max(1)).map(PageItem::Page).collect();
            prop_assert_eq!(window, expected);
        }

        #[test]
        fn prop_window_is_well_formed(page in 0u32..2000, total in 0u32..1000) {
            let window = build_page_window(page, total);
            let last = total.max(1) - 1;
            let indices: Vec<u32> = window.iter().filter_map(PageItem::index).collect();

            prop_assert!(indices.len() as u32 <= SIBLING_COUNT * 2 + 5);
            prop_assert!(window.iter().filter(|i| i.is_ellipsis()).count() <= 2);
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(indices.iter().all(|i| *i <= last));
            prop_assert_eq!(indices.first().copied(), Some(0));
            prop_assert_eq!(indices.last().copied(), Some(last));

            let current = page.clamp(1, total.max(1)) - 1;
            prop_assert!(indices.contains(&current));
        }

        #[test]
        fn prop_siblings_of_current_page_are_visible(page in 1u32..2000, total in 1u32..1000) {
            let window = build_page_window(page, total);
            let current = page.min(total) - 1;
            let lowest = current.saturating_sub(SIBLING_COUNT);
            let highest = (current + SIBLING_COUNT).min(total - 1);
            for index in lowest..=highest {
                prop_assert!(
                    window.contains(&PageItem::Page(index)),
                    "page index {} missing from {:?}",
                    index,
                    window
                );
            }
        }

        #[test]
        fn prop_ellipsis_always_hides_pages(page in 1u32..500, total in 7u32..500) {
            let window = build_page_window(page, total);
            prop_assert!(!window.first().unwrap().is_ellipsis());
            prop_assert!(!window.last().unwrap().is_ellipsis());
            for (pos, item) in window.iter().enumerate() {
                if item.is_ellipsis() {
                    let before = window[pos - 1].index().unwrap();
                    let after = window[pos + 1].index().unwrap();
                    prop_assert!(after - before >= 2);
                }
            }
        }

        #[test]
        fn prop_corrected_page_is_in_range(page in 0u32..10_000, limit in 1u32..100, count in 0i64..100_000) {
            let result = correct_page(page, limit, count);
            let last = page_count(count, limit).max(1);
            prop_assert!(result.request.page >= 1);
            prop_assert!(result.request.page <= last);
            prop_assert_eq!(result.request.limit, limit);
            if page >= 1 && page <= last {
                prop_assert_eq!(result.request.page, page);
                prop_assert!(!result.corrected);
            }
        }
    }
}
