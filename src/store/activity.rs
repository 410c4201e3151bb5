//! Activity log reads. Entries are only ever appended by other mutations.

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{CursorPage, Page, cursor_page, paginate};
use crate::types::{ActivityEntry, EntityKind};

impl Store {
    /// All entries, newest first. Ties keep insertion order.
    pub fn activity_newest_first(&self) -> Vec<ActivityEntry> {
        let mut entries = self.with_data(|data| data.activity.clone());
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    pub fn activity_page(&self, page: usize, limit: usize) -> Page<ActivityEntry> {
        paginate(&self.activity_newest_first(), page, limit)
    }

    /// Entries after the `cursor` entry in newest-first order.
    pub fn activity_after(&self, cursor: i64, limit: usize) -> CursorPage<ActivityEntry> {
        cursor_page(&self.activity_newest_first(), cursor, limit, |entry| entry.id)
    }

    pub fn get_activity(&self, id: i64) -> ApiResult<ActivityEntry> {
        self.with_data(|data| {
            data.activity
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| ApiError::not_found(EntityKind::Activity))
        })
    }
}
