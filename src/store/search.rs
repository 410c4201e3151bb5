//! Case-insensitive substring search across tasks, projects and users.

use super::Store;
use crate::types::{SearchResults, SearchScope};

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Store {
    /// Search for `term`, which must already be trimmed and lowercased.
    ///
    /// Tasks match on title or status, projects on name or description,
    /// users on name.
    pub fn search(&self, term: &str, scope: SearchScope) -> SearchResults {
        self.with_data(|data| {
            let mut results = SearchResults::default();
            if scope.tasks {
                results.tasks = data
                    .tasks
                    .iter()
                    .filter(|t| contains(&t.title, term) || contains(t.status.as_str(), term))
                    .cloned()
                    .collect();
            }
            if scope.projects {
                results.projects = data
                    .projects
                    .iter()
                    .filter(|p| contains(&p.name, term) || contains(&p.description, term))
                    .cloned()
                    .collect();
            }
            if scope.users {
                results.users = data
                    .users
                    .iter()
                    .filter(|u| contains(&u.name, term))
                    .cloned()
                    .collect();
            }
            results
        })
    }
}
