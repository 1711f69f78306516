//! Pagination types shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination parameters shared across all list endpoints.
///
/// - `limit`: 1–100, default 6
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_limit() -> u32 {
    6
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    pub fn new(limit: Option<u32>, page: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or_else(default_limit),
            page: page.unwrap_or_else(default_page),
        }
        .clamped()
    }

    /// Clamp `limit` to the valid range 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 100),
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        let PageRequest { limit, page } = self.clamped();
        u64::from(page - 1) * u64::from(limit)
    }
}

/// One page of results together with the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: u64, results: Vec<T>) -> Self {
        Self { count, results }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
