//! Offset and cursor pagination over in-memory sequences.
//!
//! Both strategies operate on an already filtered and sorted slice and never
//! mix within one response.

use serde::Serialize;

/// Default page size when the caller omits `limit`.
pub const DEFAULT_LIMIT: usize = 10;

/// Pagination metadata for offset pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// An offset page: `{ data, pagination }`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

/// A cursor page: `{ data, nextCursor, hasMore }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<i64>,
    pub has_more: bool,
}

impl<T> CursorPage<T> {
    /// Terminal page returned for an unresolvable cursor.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}

/// Number of pages needed for `total` items (ceiling division).
pub fn total_pages(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Half-open index range `[start, end)` of a 1-based page, clamped to `total`.
///
/// The unclamped end is returned separately because `hasNext` compares it
/// against the total.
fn page_bounds(page: usize, limit: usize, total: usize) -> (usize, usize, usize) {
    let start = page.saturating_sub(1).saturating_mul(limit);
    let end = start.saturating_add(limit);
    (start.min(total), end.min(total), end)
}

/// Slice one offset page out of `items`.
///
/// `page` is 1-based; a page past the end yields an empty `data` list, never
/// an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let (start, end, raw_end) = page_bounds(page, limit, total);
    Page {
        data: items[start..end].to_vec(),
        pagination: PageInfo {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
            has_next: raw_end < total,
            has_prev: page > 1,
        },
    }
}

/// Return up to `limit` items strictly after the item whose id is `cursor`.
///
/// `next_cursor` is the id of the last returned item only when a full page
/// came back and more items remain beyond it.
pub fn cursor_page<T, F>(items: &[T], cursor: i64, limit: usize, id_of: F) -> CursorPage<T>
where
    T: Clone,
    F: Fn(&T) -> i64,
{
    let Some(position) = items.iter().position(|item| id_of(item) == cursor) else {
        return CursorPage::empty();
    };

    let start = position + 1;
    let end = start.saturating_add(limit).min(items.len());
    let data = items[start..end].to_vec();

    let next_cursor = if limit > 0 && data.len() == limit && start + limit < items.len() {
        data.last().map(&id_of)
    } else {
        None
    };

    CursorPage {
        data,
        has_more: next_cursor.is_some(),
        next_cursor,
    }
}
