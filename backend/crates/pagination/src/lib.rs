//! Page-number pagination primitives shared by list endpoints.
//!
//! Requests are 1-based `page`/`limit` pairs. A [`Page`] carries one slice of
//! items together with the total number of matching records, from which the
//! `next`/`prev` navigation links are derived.
//!
//! ```
//! use pagination::PageRequest;
//!
//! let request = PageRequest::from_query(Some("3"), Some("10"));
//! let links = request.links(25);
//! assert!(links.next.is_none());
//! assert_eq!(links.prev.map(|link| link.page), Some(2));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the client omits or garbles `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits or garbles `limit`.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised by the strict [`PageRequest::new`] constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// Largest accepted limit.
        max: u32,
    },
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
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
    /// Build a request, rejecting zero values and oversized limits.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` or `limit` is zero or when
    /// `limit` exceeds [`MAX_LIMIT`].
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing, unparsable, zero or negative values fall back to the
    /// defaults. Limits above [`MAX_LIMIT`] are clamped.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(limit).map_or(DEFAULT_LIMIT, |value| value.min(MAX_LIMIT));
        Self { page, limit }
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// The page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Number of records skipped before this page starts.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64).saturating_sub(1) * self.limit as u64
    }

    /// Exclusive index of the last record on this page.
    #[must_use]
    pub const fn end(self) -> u64 {
        self.page as u64 * self.limit as u64
    }

    /// Navigation links for a result set holding `total` records.
    #[must_use]
    pub fn links(self, total: u64) -> PageLinks {
        let next = (self.end() < total).then(|| PageLink {
            page: self.page.saturating_add(1),
            limit: self.limit,
        });
        let prev = (self.offset() > 0).then(|| PageLink {
            page: self.page - 1,
            limit: self.limit,
        });
        PageLinks { next, prev }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let value: i64 = raw?.trim().parse().ok()?;
    if value <= 0 {
        return None;
    }
    u32::try_from(value).ok()
}

/// Descriptor pointing at a neighbouring page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Target page number.
    pub page: u32,
    /// Page size carried over from the request.
    pub limit: u32,
}

/// `next`/`prev` descriptors; absent links are omitted when serialised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Present when records remain after this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    /// Present when this page does not start at the first record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wrap a slice of items fetched for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of records across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The request this page answers.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Navigation links for this page.
    #[must_use]
    pub fn links(&self) -> PageLinks {
        self.request.links(self.total)
    }

    /// Transform every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}
