//! Page-number pagination for list endpoints.
//!
//! List endpoints accept `?page=` and `?page_size=` and respond with a
//! `{count, results}` envelope. Page numbers are 1-based; out-of-range
//! values are clamped rather than rejected.

use serde::{Deserialize, Serialize};

/// Hard ceiling on page size, whatever the client asks for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageParams {
    /// Effective page size given the configured default.
    #[must_use]
    pub fn limit(&self, default_page_size: u32) -> i64 {
        let size = self.page_size.unwrap_or(default_page_size).max(1);
        i64::from(size.min(MAX_PAGE_SIZE))
    }

    /// Row offset for the requested page.
    #[must_use]
    pub fn offset(&self, default_page_size: u32) -> i64 {
        let page = i64::from(self.page.unwrap_or(1).max(1));
        (page - 1) * self.limit(default_page_size)
    }
}

/// A page of results with the total row count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page envelope.
    #[must_use]
    pub const fn new(count: i64, results: Vec<T>) -> Self {
        Self { count, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let params = PageParams::default();
        assert_eq!(params.limit(10), 10);
        assert_eq!(params.offset(10), 0);
    }

    #[test]
    fn offset_scales_with_page() {
        let params = PageParams {
            page: Some(3),
            page_size: Some(25),
        };
        assert_eq!(params.limit(10), 25);
        assert_eq!(params.offset(10), 50);
    }

    #[test]
    fn page_size_is_clamped() {
        let params = PageParams {
            page: Some(1),
            page_size: Some(10_000),
        };
        assert_eq!(params.limit(10), i64::from(MAX_PAGE_SIZE));
    }

    #[test]
    fn zero_values_are_clamped_to_one() {
        let params = PageParams {
            page: Some(0),
            page_size: Some(0),
        };
        assert_eq!(params.limit(10), 1);
        assert_eq!(params.offset(10), 0);
    }
}
