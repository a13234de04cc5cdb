use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Row};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::models::user::{NewUser, User};
use crate::store::{StoreError, UserConnection, UserStore};

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

const INSERT_USER: &str = "INSERT INTO users (name, email) VALUES (?, ?)";

/// MySQL-backed store. Holds only connect options; every `connect` dials anew.
#[derive(Clone)]
pub struct MySqlStore {
    options: MySqlConnectOptions,
}

impl MySqlStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);
        Self { options }
    }
}

#[async_trait]
impl UserStore for MySqlStore {
    async fn connect(&self) -> Result<Box<dyn UserConnection>, StoreError> {
        let conn = MySqlConnection::connect_with(&self.options).await?;
        debug!("Opened MySQL connection");
        Ok(Box::new(MySqlUserConnection { conn }))
    }
}

pub struct MySqlUserConnection {
    conn: MySqlConnection,
}

#[async_trait]
impl UserConnection for MySqlUserConnection {
    async fn ping(&mut self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&mut self.conn).await?;
        Ok(())
    }

    async fn server_version(&mut self) -> Result<String, StoreError> {
        Ok(sqlx::query_scalar::<_, String>("SELECT VERSION()")
            .fetch_one(&mut self.conn)
            .await?)
    }

    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    async fn count_users(&mut self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    async fn list_users(&mut self, limit: Option<i64>) -> Result<Vec<User>, StoreError> {
        let users = match limit {
            Some(limit) => {
                sqlx::query_as::<_, User>(
                    "SELECT id, name, email, created_at FROM users ORDER BY created_at DESC, id DESC LIMIT ?",
                )
                .bind(limit)
                .fetch_all(&mut self.conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(
                    "SELECT id, name, email, created_at FROM users ORDER BY created_at DESC, id DESC",
                )
                .fetch_all(&mut self.conn)
                .await?
            }
        };
        Ok(users)
    }

    async fn insert_user(&mut self, user: &NewUser) -> Result<i64, StoreError> {
        let result = sqlx::query(INSERT_USER)
            .bind(&user.name)
            .bind(&user.email)
            .execute(&mut self.conn)
            .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn insert_users(&mut self, users: &[NewUser]) -> Result<u64, StoreError> {
        let mut tx = self.conn.begin().await?;
        let mut inserted = 0;
        for user in users {
            inserted += sqlx::query(INSERT_USER)
                .bind(&user.name)
                .bind(&user.email)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn close(self: Box<Self>) -> Result<(), StoreError> {
        self.conn.close().await?;
        Ok(())
    }
}
