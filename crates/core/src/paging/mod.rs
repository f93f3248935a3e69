//! Pagination and sort coordination for browse mode.
//!
//! Only browse mode is paginated by the service. Recommendation modes return
//! one bounded page, represented by [`PaginationState::single`].

mod sort;

pub use sort::{SortCriterion, SortField, SortOrder, TypeFilter};

use serde::{Deserialize, Serialize};

use crate::remote::{ListQuery, SearchQuery};

/// Number of page links shown around the current page.
pub const PAGE_WINDOW: u32 = 5;

/// Page position of the published result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// Always >= 1.
    pub current_page: u32,
    /// Always >= 1.
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
}

impl PaginationState {
    /// Server-paginated state, sanitized so page numbers stay >= 1 and the
    /// current page never exceeds the total.
    pub fn paged(current_page: u32, total_pages: u32, total_items: u64, page_size: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            current_page: current_page.clamp(1, total_pages),
            total_pages,
            total_items,
            page_size,
        }
    }

    /// A single bounded page with navigation disabled.
    pub fn single(total_items: u64, page_size: u32) -> Self {
        Self::paged(1, 1, total_items, page_size)
    }

    /// Whether `page` is a valid navigation target.
    pub fn can_goto(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    pub fn has_navigation(&self) -> bool {
        self.total_pages > 1
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.current_page, self.total_pages)
    }
}

/// Up to [`PAGE_WINDOW`] consecutive page numbers centered on `current`,
/// clamped to `[1, total]`.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    let total = total.max(1);
    let current = current.clamp(1, total);
    let half = PAGE_WINDOW / 2;

    let mut start = current.saturating_sub(half).max(1);
    let end = start.saturating_add(PAGE_WINDOW - 1).min(total);
    start = end.saturating_sub(PAGE_WINDOW - 1).max(1);

    (start..=end).collect()
}

/// Page list for rendering: the centered window plus detached first/last
/// links when they fall outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<u32>,
    /// `Some(1)` when page 1 is not inside `pages`.
    pub first: Option<u32>,
    /// `Some(total)` when the last page is not inside `pages`.
    pub last: Option<u32>,
}

impl PageWindow {
    pub fn new(current: u32, total: u32) -> Self {
        let total = total.max(1);
        let pages = page_window(current, total);
        let first = (pages.first() != Some(&1)).then_some(1);
        let last = (pages.last() != Some(&total)).then_some(total);
        Self { pages, first, last }
    }
}

/// Browse-mode intent: page, sort, type filter and free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseState {
    pub page: u32,
    pub sort: SortCriterion,
    pub type_filter: TypeFilter,
    /// A non-blank query switches browse to the search endpoint.
    pub query: Option<String>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortCriterion::default(),
            type_filter: TypeFilter::default(),
            query: None,
        }
    }
}

/// Request derived from [`BrowseState`].
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseRequest {
    List(ListQuery),
    Search(SearchQuery),
}

impl BrowseState {
    /// Set the free-text query; blank input clears it.
    pub fn set_query(&mut self, query: &str) {
        let trimmed = query.trim();
        self.query = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Build the request for the current intent.
    pub fn request(&self, page_size: u32, search_limit: u32) -> BrowseRequest {
        match &self.query {
            Some(query) => BrowseRequest::Search(SearchQuery {
                query: query.clone(),
                limit: search_limit,
                type_filter: self.type_filter,
            }),
            None => {
                let (sort_field, sort_order) = self.sort.server_order();
                BrowseRequest::List(ListQuery {
                    page: self.page.max(1),
                    limit: page_size,
                    sort_field,
                    sort_order,
                    type_filter: self.type_filter,
                })
            }
        }
    }
}
