//! Page-based pagination utilities.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size accepted from clients.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for page-based pagination.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageParams {
    /// Clamped page size (1 to MAX_PAGE_SIZE).
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the current page.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Current page number (1-based).
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
}

impl PageInfo {
    /// Builds page info from the request params and a total row count.
    pub fn new(params: &PageParams, total: i64) -> Self {
        let limit = params.limit();
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            current_page: params.page(),
            total_pages,
            total,
        }
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: &PageParams, total: i64) -> Self {
        Self {
            items,
            pagination: PageInfo::new(params, total),
        }
    }
}
