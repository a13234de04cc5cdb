use thiserror::Error;
use tracing::{error, info};

use crate::db::retry::{with_retry, RetryExhausted, RetryPolicy};
use crate::models::user::seed_users;
use crate::store::{release, StoreError, UserStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table was empty and this many sample users were inserted.
    Seeded(u64),
    /// The table already held rows; nothing was inserted.
    AlreadyPopulated(i64),
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("could not connect: {0}")]
    Connect(#[from] RetryExhausted<StoreError>),

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Ensures the schema exists and seeds an empty table. Safe to run repeatedly.
pub async fn initialize(store: &dyn UserStore, policy: &RetryPolicy) -> Result<SeedOutcome, InitError> {
    let mut conn = with_retry(policy, || store.connect()).await?;

    conn.ensure_schema().await?;

    let existing = conn.count_users().await?;
    let outcome = if existing == 0 {
        let inserted = conn.insert_users(&seed_users()).await?;
        info!("Sample users inserted successfully ({inserted} rows)");
        SeedOutcome::Seeded(inserted)
    } else {
        info!("Users table already holds {existing} rows; skipping seed");
        SeedOutcome::AlreadyPopulated(existing)
    };

    release(conn).await;
    Ok(outcome)
}

/// Startup wrapper around [`initialize`]: failures are logged, never fatal.
/// The service still starts and reports store errors per request.
pub async fn init_database(store: &dyn UserStore, policy: &RetryPolicy) -> Option<SeedOutcome> {
    info!("Initializing database...");
    match initialize(store, policy).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error!("Database initialization error: {e}");
            None
        }
    }
}
