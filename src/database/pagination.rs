use serde::{Deserialize, Serialize};

const FIRST_PAGE: i64 = 1;

/// Normalized skip/take parameters for list queries.
///
/// Client-supplied values are clamped rather than rejected: a missing, zero,
/// or negative page becomes page 1; a missing or non-positive page size
/// becomes the configured default; an oversized page size is capped at the
/// configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
}

impl PageParams {
    /// Clamp raw query values into a valid page window.
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        let pagination = &crate::config::config().pagination;
        Self::clamped_with(page, page_size, pagination.default_page_size, pagination.max_page_size)
    }

    fn clamped_with(page: Option<i64>, page_size: Option<i64>, default_size: i64, max_size: i64) -> Self {
        let page = match page {
            Some(p) if p >= FIRST_PAGE => p,
            _ => FIRST_PAGE,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => s.min(max_size),
            _ => default_size,
        };
        Self { page, page_size }
    }

    /// Rows to skip (OFFSET). Saturates so an absurdly large page number
    /// still yields a valid non-negative offset instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Rows to take (LIMIT)
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}
