//! Command implementations for the carlot CLI

pub mod init_db;
pub mod serve;

use std::time::Duration;

use clap::Args;

use carlot_server::config::{DbConfig, DEFAULT_MAX_CONNECTIONS};

pub use init_db::run_init_db;
pub use serve::run_serve;

/// MySQL connection settings shared by every command
///
/// Fields carry a `db_` prefix so their argument ids never clash with a
/// command's own `port`/`host`.
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database host
    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long = "db-port", env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    /// Database user
    #[arg(long = "db-user", env = "DB_USER", default_value = "root")]
    pub db_user: String,

    /// Database password
    #[arg(long = "db-password", env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database (schema) name
    #[arg(long = "db-name", env = "DB_NAME")]
    pub db_name: String,

    /// Maximum pooled connections
    #[arg(long = "db-max-connections", env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub db_max_connections: u32,

    /// Seconds to wait for a free pooled connection
    #[arg(long = "db-acquire-timeout", env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 10)]
    pub db_acquire_timeout_secs: u64,
}

impl From<DbArgs> for DbConfig {
    fn from(args: DbArgs) -> Self {
        Self {
            host: args.db_host,
            port: args.db_port,
            user: args.db_user,
            password: args.db_password,
            database: args.db_name,
            max_connections: args.db_max_connections,
            acquire_timeout: Duration::from_secs(args.db_acquire_timeout_secs),
        }
    }
}
