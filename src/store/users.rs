//! User operations.

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::types::{EntityKind, User};

impl Store {
    pub fn list_users(&self) -> Vec<User> {
        self.with_data(|data| data.users.clone())
    }

    pub fn get_user(&self, id: i64) -> ApiResult<User> {
        self.with_data(|data| data.require_user(id).cloned())
    }

    pub fn create_user(&self, name: String) -> ApiResult<User> {
        self.with_data_mut(|data| {
            let user = User {
                id: data.counters.next_id(EntityKind::User),
                name,
            };
            data.users.push(user.clone());
            Ok(user)
        })
    }

    /// Rename a user. `None` leaves the user unchanged.
    pub fn update_user(&self, id: i64, name: Option<String>) -> ApiResult<User> {
        self.with_data_mut(|data| {
            let user = data
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| ApiError::not_found(EntityKind::User))?;
            if let Some(name) = name {
                user.name = name;
            }
            Ok(user.clone())
        })
    }

    /// Delete a user. Projects and tasks referencing the user keep their ids.
    pub fn delete_user(&self, id: i64) -> ApiResult<()> {
        self.with_data_mut(|data| {
            let index = data
                .users
                .iter()
                .position(|u| u.id == id)
                .ok_or_else(|| ApiError::not_found(EntityKind::User))?;
            data.users.remove(index);
            Ok(())
        })
    }
}
