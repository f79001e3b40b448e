use async_trait::async_trait;
use std::collections::HashMap;

use super::user::{DuplicateEmailRow, UserStore};
use crate::database::Result;

/// In-memory [`UserStore`] answering like the Postgres query does.
/// Meant for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryUserStore {
    users: Vec<MemoryUser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryUser {
    pub username: String,
    pub email: String,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(mut self, username: impl Into<String>, email: impl Into<String>) -> Self {
        self.insert(username, email);
        self
    }

    pub fn insert(&mut self, username: impl Into<String>, email: impl Into<String>) {
        self.users.push(MemoryUser {
            username: username.into(),
            email: email.into(),
        });
    }

    pub fn users(&self) -> &[MemoryUser] {
        &self.users
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn duplicate_emails(&mut self) -> Result<Vec<DuplicateEmailRow>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for user in &self.users {
            *counts.entry(user.email.to_lowercase()).or_default() += 1;
        }

        let mut rows = self
            .users
            .iter()
            .map(|user| DuplicateEmailRow {
                email: user.email.to_lowercase(),
                username: user.username.clone(),
            })
            .filter(|row| counts.get(&row.email).is_some_and(|count| *count > 1))
            .collect::<Vec<_>>();

        rows.sort_by(|a, b| {
            a.email
                .cmp(&b.email)
                .then_with(|| a.username.cmp(&b.username))
        });

        Ok(rows)
    }
}
