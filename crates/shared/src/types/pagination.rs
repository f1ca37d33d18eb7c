//! Cursor pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: u32 = 1;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 1000;
/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Request parameters for cursor-paginated listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Opaque resume token from a previous page.
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            cursor: None,
        }
    }
}

impl PageRequest {
    /// Creates a page request, rejecting sizes outside the accepted range.
    ///
    /// An empty cursor string is treated as no cursor.
    pub fn new(page_size: Option<u32>, cursor: Option<String>) -> AppResult<Self> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::invalid_argument(format!(
                "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        Ok(Self {
            page_size,
            cursor: cursor.filter(|c| !c.is_empty()),
        })
    }

    /// Returns the limit for store queries.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items in the current page.
    pub items: Vec<T>,
    /// Token for the next page; `None` at the end of the listing.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
