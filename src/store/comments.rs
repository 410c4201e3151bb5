//! Comment operations.

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::types::{Comment, EntityKind, NewComment, activity_type, now};

impl Store {
    /// Comments, optionally for one task, newest first.
    pub fn list_comments(&self, task_id: Option<i64>) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self.with_data(|data| {
            data.comments
                .iter()
                .filter(|c| task_id.is_none_or(|id| c.task_id == id))
                .cloned()
                .collect()
        });
        // Stable, so equal timestamps keep insertion order.
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }

    pub fn get_comment(&self, id: i64) -> ApiResult<Comment> {
        self.with_data(|data| {
            data.comments
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| ApiError::not_found(EntityKind::Comment))
        })
    }

    /// Create a comment on an existing task by an existing user and log
    /// `comment_added`.
    pub fn create_comment(&self, input: NewComment) -> ApiResult<Comment> {
        self.with_data_mut(|data| {
            let task_title = data.require_task(input.task_id)?.title.clone();
            data.require_user(input.user_id)?;

            let comment = Comment {
                id: data.counters.next_id(EntityKind::Comment),
                task_id: input.task_id,
                user_id: input.user_id,
                content: input.content,
                created_at: now(),
            };
            data.comments.push(comment.clone());
            data.record_activity(
                activity_type::COMMENT_ADDED,
                format!("New comment on task '{}'", task_title),
            );
            Ok(comment)
        })
    }

    /// Replace a comment's content. `createdAt` never changes.
    pub fn update_comment(&self, id: i64, content: Option<String>) -> ApiResult<Comment> {
        self.with_data_mut(|data| {
            let comment = data
                .comments
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| ApiError::not_found(EntityKind::Comment))?;
            if let Some(content) = content {
                comment.content = content;
            }
            Ok(comment.clone())
        })
    }

    pub fn delete_comment(&self, id: i64) -> ApiResult<()> {
        self.with_data_mut(|data| {
            let index = data
                .comments
                .iter()
                .position(|c| c.id == id)
                .ok_or_else(|| ApiError::not_found(EntityKind::Comment))?;
            data.comments.remove(index);
            Ok(())
        })
    }
}
