//! Single-page and all-pages listing.
//!
//! A list endpoint returns one [`Page`] per request. [`collect_all_pages`]
//! walks a [`PageSource`] from page 1, concatenating items in fetch order,
//! until the server stops reporting a `next` link or returns an empty page.
//! The first failing page aborts the walk and nothing collected so far is
//! returned.

use crate::error::Result;
use crate::jsonapi::PaginationInfo;
use async_trait::async_trait;
use tracing::{debug, info};

/// Page size used when fetching every page of a list.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Position in a paginated walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// 1-based page number
    pub number: u32,
    /// Items per page; `0` leaves the size to the server
    pub size: u32,
}

impl PageCursor {
    /// Cursor for the first page.
    #[must_use]
    pub const fn first(size: u32) -> Self {
        Self { number: 1, size }
    }

    /// Cursor for the page after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            number: self.number.saturating_add(1),
            size: self.size,
        }
    }
}

/// Items of one page plus its pagination envelope.
///
/// Also used for the result of an all-pages walk, where `info` is the
/// envelope of the last page fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in fetch order
    pub items: Vec<T>,
    /// Pagination envelope
    pub info: PaginationInfo,
}

impl<T> Page<T> {
    /// Create a page.
    #[must_use]
    pub const fn new(items: Vec<T>, info: PaginationInfo) -> Self {
        Self { items, info }
    }

    /// An empty page without a next link.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), PaginationInfo::default())
    }

    /// Returns true when no further page should be requested.
    ///
    /// Either a missing `next` link or an empty page ends the walk.
    #[must_use]
    pub fn is_last(&self) -> bool {
        !self.info.has_next_page() || self.items.is_empty()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Discard the envelope and keep the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Something that can fetch one page of a list.
#[cfg_attr(test, mockall::automock(type Item = u32;))]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type of the list.
    type Item: Send;

    /// Fetch the page at `cursor`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying request or decoding produced.
    async fn fetch_page(&self, cursor: PageCursor) -> Result<Page<Self::Item>>;
}

/// Fetch every page of `source`, starting at page 1 with `page_size` items per page.
///
/// # Errors
///
/// Returns the first error reported by `source`; items from earlier pages are discarded.
pub async fn collect_all_pages<S>(source: &S, page_size: u32) -> Result<Page<S::Item>>
where
    S: PageSource + ?Sized,
{
    let mut cursor = PageCursor::first(page_size);
    let mut aggregate = Page::empty();

    loop {
        let page = source.fetch_page(cursor).await?;
        let last = page.is_last();
        debug!(
            page = cursor.number,
            size = cursor.size,
            items = page.items.len(),
            has_next = page.info.has_next_page(),
            "Fetched page"
        );

        aggregate.items.extend(page.items);
        aggregate.info = page.info;

        if last {
            break;
        }
        cursor = cursor.next();
    }

    info!(
        pages = cursor.number,
        items = aggregate.items.len(),
        "Fetched all pages"
    );
    Ok(aggregate)
}
