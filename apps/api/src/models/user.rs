use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A user that has not been stored yet; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Sample users inserted into an empty table at startup.
pub fn seed_users() -> Vec<NewUser> {
    vec![
        NewUser::new("Alice Johnson", "alice@example.com"),
        NewUser::new("Bob Smith", "bob@example.com"),
        NewUser::new("Charlie Brown", "charlie@example.com"),
        NewUser::new("Diana Prince", "diana@example.com"),
    ]
}
