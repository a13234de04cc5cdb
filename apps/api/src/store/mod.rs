pub mod mysql;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::user::{NewUser, User};

/// Failure taxonomy for store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached or the connection dropped.
    #[error("{0}")]
    Unavailable(String),

    /// A uniqueness constraint rejected the write (duplicate email).
    #[error("{0}")]
    UniqueViolation(String),

    #[error("{0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::UniqueViolation(err.to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Opens fresh connections to the users store. One connection per request;
/// nothing is pooled or shared between callers.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Single connection attempt. Retrying is the caller's decision.
    async fn connect(&self) -> Result<Box<dyn UserConnection>, StoreError>;
}

/// A live connection. Dropping the box releases it on every exit path;
/// `close` additionally says goodbye to the server.
#[async_trait]
pub trait UserConnection: Send {
    async fn ping(&mut self) -> Result<(), StoreError>;

    async fn server_version(&mut self) -> Result<String, StoreError>;

    /// Creates the `users` table if it does not exist yet.
    async fn ensure_schema(&mut self) -> Result<(), StoreError>;

    async fn count_users(&mut self) -> Result<i64, StoreError>;

    /// Users ordered newest first (ties broken by descending id).
    async fn list_users(&mut self, limit: Option<i64>) -> Result<Vec<User>, StoreError>;

    /// Inserts one user and returns the id the store assigned.
    async fn insert_user(&mut self, user: &NewUser) -> Result<i64, StoreError>;

    /// Inserts a batch inside one committed transaction.
    async fn insert_users(&mut self, users: &[NewUser]) -> Result<u64, StoreError>;

    async fn close(self: Box<Self>) -> Result<(), StoreError>;
}

/// Graceful close for success paths. A failed goodbye only gets logged: the
/// socket is gone either way once the connection is dropped.
pub async fn release(conn: Box<dyn UserConnection>) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection cleanly: {e}");
    }
}
