//! MySQL connection pool
//!
//! Uses sqlx MySqlPool with explicit connection limits. Pooled
//! connections go back to the pool when the owning [`MySqlSession`] is
//! dropped.

use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use super::{ConnectionSource, DbError, MySqlSession};
use crate::config::DbConfig;

/// Create a MySQL connection pool.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::new("cars")).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<MySqlPool, sqlx::Error> {
    tracing::info!(
        host = %config.host,
        database = %config.database,
        max_connections = config.max_connections,
        "Connecting to MySQL"
    );

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(config.connect_options())
        .await
}

#[async_trait]
impl ConnectionSource for MySqlPool {
    type Conn = MySqlSession;

    async fn acquire(&self) -> Result<MySqlSession, DbError> {
        let conn = MySqlPool::acquire(self).await?;
        Ok(MySqlSession::new(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionSettings;
    use crate::db::CarConnection;

    // Integration tests require a real database
    // Run with: DB_NAME=... cargo test -p carlot-server -- --ignored

    fn config_from_env() -> DbConfig {
        let database = std::env::var("DB_NAME").expect("DB_NAME required");
        DbConfig {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            user: std::env::var("DB_USER").unwrap_or_else(|_| "root".into()),
            password: std::env::var("DB_PASSWORD").ok(),
            ..DbConfig::new(database)
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn session_settings_are_applied() {
        let pool = create_pool(&config_from_env()).await.expect("pool creation failed");
        let mut session = ConnectionSource::acquire(&pool).await.expect("acquire failed");
        session
            .configure(&SessionSettings::default())
            .await
            .expect("configure failed");
        assert!(session.named_placeholders());

        let (mode, tz): (String, String) =
            sqlx::query_as("SELECT @@SESSION.sql_mode, @@SESSION.time_zone")
                .fetch_one(session.connection())
                .await
                .expect("query failed");

        assert!(mode.contains("STRICT_TRANS_TABLES"));
        assert_eq!(tz, "-08:00");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connections_return_to_pool_on_drop() {
        let config = DbConfig {
            max_connections: 1,
            ..config_from_env()
        };
        let pool = create_pool(&config).await.expect("pool creation failed");

        // With a single slot, each acquire only succeeds if the previous
        // session went back to the pool.
        for _ in 0..3 {
            let session = ConnectionSource::acquire(&pool).await.expect("acquire failed");
            drop(session);
        }

        assert_eq!(pool.size(), 1);
    }
}
