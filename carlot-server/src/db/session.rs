//! A pooled MySQL connection configured for one request

use sqlx::mysql::{MySqlConnection, MySqlQueryResult};
use sqlx::pool::PoolConnection;
use sqlx::{FromRow, MySql};

use super::named::{NamedQuery, SqlValue};
use super::DbError;
use crate::config::SessionSettings;
use crate::models::Car;

/// One connection borrowed from the pool.
///
/// Named placeholders stay disabled until [`configure`] runs, so a
/// session that skipped configuration cannot run the car queries.
/// Dropping the session returns the connection to the pool.
///
/// [`configure`]: crate::db::CarConnection::configure
pub struct MySqlSession {
    conn: PoolConnection<MySql>,
    named_placeholders: bool,
}

impl MySqlSession {
    pub fn new(conn: PoolConnection<MySql>) -> Self {
        Self {
            conn,
            named_placeholders: false,
        }
    }

    pub fn named_placeholders(&self) -> bool {
        self.named_placeholders
    }

    /// The raw connection, for queries outside the car repository.
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.conn
    }

    pub(crate) async fn apply_settings(
        &mut self,
        settings: &SessionSettings,
    ) -> Result<(), DbError> {
        self.named_placeholders = true;
        for statement in settings.statements() {
            tracing::trace!(%statement, "session setting");
            sqlx::query(&statement).execute(&mut *self.conn).await?;
        }
        Ok(())
    }

    pub(crate) async fn execute_named(
        &mut self,
        sql: &str,
        params: &[(&str, SqlValue)],
    ) -> Result<MySqlQueryResult, DbError> {
        let query = self.compile(sql)?;
        let result = query.bind(params)?.execute(&mut *self.conn).await?;
        Ok(result)
    }

    pub(crate) async fn fetch_cars(
        &mut self,
        sql: &str,
        params: &[(&str, SqlValue)],
    ) -> Result<Vec<Car>, DbError> {
        let query = self.compile(sql)?;
        let rows = query.bind(params)?.fetch_all(&mut *self.conn).await?;
        rows.iter()
            .map(|row| Car::from_row(row).map_err(DbError::from))
            .collect()
    }

    fn compile(&self, sql: &str) -> Result<NamedQuery, DbError> {
        if !self.named_placeholders {
            return Err(DbError::NamedPlaceholdersDisabled);
        }
        Ok(NamedQuery::compile(sql))
    }
}
