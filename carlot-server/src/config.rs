//! Database and session configuration
//!
//! Values normally come from the environment (`DB_HOST`, `DB_USER`,
//! `DB_PASSWORD`, `DB_NAME`, ...) via the CLI; this module only holds the
//! parsed result.

use std::fmt;
use std::time::Duration;

use sqlx::mysql::MySqlConnectOptions;

/// Default pool ceiling, same as the reference driver's connection limit.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time to wait for a free pooled connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// MySQL connection parameters
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    /// Connect options for sqlx.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: None,
            database: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Per-connection session settings applied right after acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// `TRADITIONAL` turns invalid or missing values into errors instead
    /// of silently truncating or defaulting them.
    pub sql_mode: String,
    /// Fixed UTC offset for the session.
    pub time_zone: String,
}

impl SessionSettings {
    /// The statements to run, in order.
    pub fn statements(&self) -> [String; 2] {
        [
            format!("SET SESSION sql_mode = '{}'", self.sql_mode),
            format!("SET time_zone = '{}'", self.time_zone),
        ]
    }

    /// Whether the SQL mode rejects bad data rather than coercing it.
    pub fn is_strict(&self) -> bool {
        let mode = self.sql_mode.to_ascii_uppercase();
        mode.contains("TRADITIONAL") || mode.contains("STRICT_")
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sql_mode: "TRADITIONAL".to_string(),
            time_zone: "-8:00".to_string(),
        }
    }
}
