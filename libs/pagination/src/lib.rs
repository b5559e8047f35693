//! Offset/limit pagination primitives shared by the resource clients.
//!
//! The backend paginates with zero-based page indices and returns a
//! `Page<T>` envelope (see [`page`]). Requests carry `page`/`size` plus an
//! optional `sort`/`direction` pair; [`PageRequest`] renders those into
//! query parameters so the per-resource API modules stay free of string
//! plumbing.

mod page;

pub use page::Page;

use serde::{Deserialize, Serialize};

/// Sort order accepted by the backend's `direction` query parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

/// Query parameters for a paginated listing request.
///
/// `sort` is optional; when absent the backend applies its own default order
/// and the `direction` parameter is omitted as well.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
            direction: SortDirection::Asc,
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(field.into());
        self.direction = direction;
        self
    }

    /// Render as `(key, value)` pairs ready for URL query encoding.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
            query.push(("direction", self.direction.as_str().to_string()));
        }
        query
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// Page size used when the caller does not specify one (matches the backend
/// controller default).
pub const DEFAULT_PAGE_SIZE: u32 = 20;
