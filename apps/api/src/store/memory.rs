//! In-memory store used by tests. Mirrors the MySQL contract: ids grow
//! monotonically, emails are unique, rows are listed newest first.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::models::user::{NewUser, User};
use crate::store::{StoreError, UserConnection, UserStore};

#[derive(Default)]
struct Inner {
    schema: bool,
    users: Vec<User>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    unreachable: Arc<AtomicBool>,
    connects: Arc<AtomicU32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn users(&self) -> Vec<User> {
        self.inner.lock().unwrap().users.clone()
    }

    pub fn has_schema(&self) -> bool {
        self.inner.lock().unwrap().schema
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn connect(&self) -> Result<Box<dyn UserConnection>, StoreError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "Can't connect to MySQL server on 'unreachable:3306'".to_string(),
            ));
        }
        Ok(Box::new(MemoryConnection {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct MemoryConnection {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryConnection {
    fn with_table<T>(&self, f: impl FnOnce(&mut Inner) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.schema {
            return Err(StoreError::Query("Table 'test_db.users' doesn't exist".to_string()));
        }
        f(&mut inner)
    }
}

fn insert(inner: &mut Inner, user: &NewUser) -> Result<i64, StoreError> {
    if inner.users.iter().any(|u| u.email == user.email) {
        return Err(StoreError::UniqueViolation(format!(
            "Duplicate entry '{}' for key 'users.email'",
            user.email
        )));
    }
    inner.next_id += 1;
    let id = inner.next_id;
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    inner.users.push(User {
        id,
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: base + Duration::seconds(id),
    });
    Ok(id)
}

#[async_trait]
impl UserConnection for MemoryConnection {
    async fn ping(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn server_version(&mut self) -> Result<String, StoreError> {
        Ok("8.0.36-memory".to_string())
    }

    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.inner.lock().unwrap().schema = true;
        Ok(())
    }

    async fn count_users(&mut self) -> Result<i64, StoreError> {
        self.with_table(|inner| Ok(inner.users.len() as i64))
    }

    async fn list_users(&mut self, limit: Option<i64>) -> Result<Vec<User>, StoreError> {
        self.with_table(|inner| {
            let mut users = inner.users.clone();
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            if let Some(limit) = limit {
                users.truncate(limit.max(0) as usize);
            }
            Ok(users)
        })
    }

    async fn insert_user(&mut self, user: &NewUser) -> Result<i64, StoreError> {
        self.with_table(|inner| insert(inner, user))
    }

    async fn insert_users(&mut self, users: &[NewUser]) -> Result<u64, StoreError> {
        self.with_table(|inner| {
            // All-or-nothing, like the committed transaction in MySQL.
            // Ids consumed by a rolled-back batch are not handed out again.
            let snapshot = inner.users.clone();
            for user in users {
                if let Err(e) = insert(inner, user) {
                    inner.users = snapshot;
                    return Err(e);
                }
            }
            Ok(users.len() as u64)
        })
    }

    async fn close(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
