use anyhow::{Context, Result};

/// Connection parameters for the users store.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

/// Application configuration loaded once from environment variables.
/// Every variable has a default, so a bare environment yields a usable config.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let debug = var("FLASK_DEBUG", "false").eq_ignore_ascii_case("true");
        let default_log = if debug { "debug" } else { "info" };

        Ok(Config {
            database: DatabaseConfig {
                host: var("DB_HOST", "db"),
                port: var("DB_PORT", "3306")
                    .parse::<u16>()
                    .context("DB_PORT must be a valid port number")?,
                user: var("DB_USER", "root"),
                password: var("DB_PASSWORD", "example"),
                name: var("DB_NAME", "test_db"),
            },
            host: var("FLASK_HOST", "0.0.0.0"),
            port: var("FLASK_PORT", "5000")
                .parse::<u16>()
                .context("FLASK_PORT must be a valid port number")?,
            debug,
            rust_log: var("RUST_LOG", default_log),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
