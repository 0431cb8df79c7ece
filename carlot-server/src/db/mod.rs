//! Database layer - connection sources, session setup and car queries
//!
//! A [`ConnectionSource`] hands out one [`CarConnection`] at a time.
//! Dropping the connection returns it to its source; there is no
//! explicit release call to forget.

pub mod error;
pub mod memory;
pub mod named;
pub mod pool;
pub mod schema;
pub mod session;

mod cars;

use async_trait::async_trait;

use crate::config::SessionSettings;
use crate::models::{Car, NewCar};

pub use error::DbError;
pub use memory::MemoryPool;
pub use named::{NamedQuery, SqlValue};
pub use pool::create_pool;
pub use session::MySqlSession;

/// Something that lends out connections, e.g. a pool.
#[async_trait]
pub trait ConnectionSource: Send + Sync + 'static {
    type Conn: CarConnection;

    /// Borrow a connection. Waits while the source is exhausted, subject
    /// to the source's own timeout.
    async fn acquire(&self) -> Result<Self::Conn, DbError>;
}

/// A single borrowed connection and the queries the routes run on it.
#[async_trait]
pub trait CarConnection: Send + 'static {
    /// Enable named placeholders and apply the session statements.
    async fn configure(&mut self, settings: &SessionSettings) -> Result<(), DbError>;

    /// `SELECT * FROM car WHERE deleted_flag = 0`
    async fn list_active(&mut self) -> Result<Vec<Car>, DbError>;

    /// Insert a row; returns the affected row count.
    async fn insert(&mut self, car: &NewCar) -> Result<u64, DbError>;

    /// Set `make` on the row with `id`. A NULL id matches nothing.
    async fn update_make(&mut self, id: Option<i64>, make: Option<&str>)
        -> Result<u64, DbError>;

    /// The row with `id`, whatever its `deleted_flag`.
    async fn find_by_id(&mut self, id: Option<i64>) -> Result<Vec<Car>, DbError>;

    /// Set `deleted_flag = 1` on the row with `id`.
    async fn soft_delete(&mut self, id: i64) -> Result<u64, DbError>;
}
