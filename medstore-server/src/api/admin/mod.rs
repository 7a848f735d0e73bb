//! Back-office API handlers (JWT authenticated)

pub mod analytics;
pub mod auth;
pub mod customers;
pub mod orders;
pub mod products;

use axum::Json;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

pub type ApiResult<T> = Result<Json<T>, AppError>;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Common `?page=&limit=` query parameters for paginated listings
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Resolve to (page, limit, offset) with sane bounds
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        // Saturate: an absurd page number yields an empty page, not overflow
        (page, limit, (page - 1).saturating_mul(limit))
    }
}

/// Pagination block returned with every listing
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

/// Treat an absent or literal `all` filter value as no filter
pub(crate) fn filter_value(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != "all")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults() {
        let (page, limit, offset) = PageParams::default().resolve();
        assert_eq!((page, limit, offset), (1, 20, 0));
    }

    #[test]
    fn test_page_params_bounds() {
        let params = PageParams {
            page: Some(0),
            limit: Some(1000),
        };
        let (page, limit, offset) = params.resolve();
        assert_eq!((page, limit, offset), (1, 100, 0));

        let params = PageParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.resolve(), (3, 10, 20));
    }

    #[test]
    fn test_page_params_huge_page_saturates() {
        let params = PageParams {
            page: Some(i64::MAX),
            limit: Some(100),
        };
        let (page, limit, offset) = params.resolve();
        assert_eq!((page, limit), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn test_pagination_pages() {
        assert_eq!(Pagination::new(1, 20, 0).pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).pages, 2);
    }

    #[test]
    fn test_filter_value() {
        assert_eq!(filter_value(None), None);
        assert_eq!(filter_value(Some("all")), None);
        assert_eq!(filter_value(Some("  ")), None);
        assert_eq!(filter_value(Some("shipped")), Some("shipped"));
    }
}
