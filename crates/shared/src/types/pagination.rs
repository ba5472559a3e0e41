//! Pagination types for list endpoints.
//!
//! Lists are unpaginated unless the caller supplies a `limit`; with one, the
//! request becomes a `skip = (page - 1) * limit` window.

use serde::{Deserialize, Serialize};

/// Request parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    pub page: u64,
    /// Page size; `None` returns every matching record.
    pub limit: Option<u64>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::all()
    }
}

/// Offset/limit pair handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Records to skip.
    pub offset: u64,
    /// Records to return at most.
    pub limit: u64,
}

impl PageRequest {
    /// An unpaginated request.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            page: 1,
            limit: None,
        }
    }

    /// A paginated request.
    #[must_use]
    pub const fn paged(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit: Some(limit),
        }
    }

    /// Builds a request from raw query-string values.
    ///
    /// Unparsable, zero or out-of-range values fall back to the defaults:
    /// page 1 and no limit.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let limit = parse_positive(limit);
        Self { page, limit }
    }

    /// The window to fetch, or `None` when the request is unpaginated.
    #[must_use]
    pub fn window(&self) -> Option<PageWindow> {
        self.limit.map(|limit| PageWindow {
            offset: self
                .page
                .saturating_sub(1)
                .saturating_mul(limit)
                .min(MAX_WINDOW_VALUE),
            limit: limit.min(MAX_WINDOW_VALUE),
        })
    }
}

/// Largest offset or limit Postgres accepts as a `BIGINT` bind.
pub const MAX_WINDOW_VALUE: u64 = i64::MAX.unsigned_abs();

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| (1..=MAX_WINDOW_VALUE).contains(v))
}

/// A page of records plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of matching records.
    pub total: u64,
    /// Current page number.
    pub page: u64,
    /// Page size used.
    pub limit: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl PageMeta {
    /// Metadata for `total` matching records under `request`.
    #[must_use]
    pub fn new(request: &PageRequest, total: u64) -> Self {
        match request.limit {
            Some(limit) => Self {
                total,
                page: request.page,
                limit,
                total_pages: total.div_ceil(limit),
            },
            None => Self {
                total,
                page: 1,
                limit: total,
                total_pages: 1,
            },
        }
    }
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: PageMeta::new(request, total),
        }
    }

    /// Maps every item, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
