//! Page/limit handling shared by every list endpoint.
//!
//! A [`PageRequest`] is parsed from the raw `page` and `limit` query values,
//! turned into a row [`Window`] for the data query, and combined with the
//! total from the independent count query into [`PageMeta`].

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Rejected pagination input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be a positive integer, got `{0}`")]
    InvalidPage(String),
    #[error("limit must be a positive integer, got `{0}`")]
    InvalidLimit(String),
    #[error("page {page} with limit {limit} is beyond the last addressable row")]
    OutOfRange { page: usize, limit: usize },
}

/// Validated `page`/`limit` pair. Both are always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage(page.to_string()));
        }
        if limit == 0 {
            return Err(PaginationError::InvalidLimit(limit.to_string()));
        }
        Self::addressable(page, limit)
    }

    /// Parses raw query-string values. Absent or blank values fall back to
    /// [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`]; anything that is not a positive
    /// integer is rejected.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let page = parse_positive(page, DEFAULT_PAGE).map_err(PaginationError::InvalidPage)?;
        let limit = parse_positive(limit, DEFAULT_LIMIT).map_err(PaginationError::InvalidLimit)?;
        Self::addressable(page, limit)
    }

    /// The whole window `[offset, offset + limit)` must fit a SQL `BIGINT`.
    fn addressable(page: usize, limit: usize) -> Result<Self, PaginationError> {
        (page - 1)
            .checked_mul(limit)
            .and_then(|offset| offset.checked_add(limit))
            .filter(|end| i64::try_from(*end).is_ok())
            .map(|_| Self { page, limit })
            .ok_or(PaginationError::OutOfRange { page, limit })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }

    pub fn window(&self) -> Window {
        Window {
            offset: self.offset(),
            limit: self.limit,
        }
    }
}

fn parse_positive(raw: Option<&str>, default: usize) -> Result<usize, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(value) => match value.parse::<usize>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(value.to_string()),
        },
    }
}

/// Row window applied to a sorted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

impl Window {
    /// Index of the last row in the window; the window is `[offset, range_end]`.
    pub fn range_end(&self) -> usize {
        self.offset + self.limit - 1
    }
}

/// Page metadata serialized next to list results.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: usize) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(request.limit),
        }
    }
}

/// One page of items with its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: usize) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total),
        }
    }
}
