//! In-process connection source
//!
//! Stands in for the MySQL pool in tests and local experiments. Rows live
//! in a shared table; every connection is counted on acquire and on drop,
//! and each step is written to an event log so callers can check what
//! ran on which connection and in which order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{CarConnection, ConnectionSource, DbError};
use crate::config::SessionSettings;
use crate::models::{Car, NewCar};

/// What happened on a connection, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Acquired { conn: usize },
    Configured { conn: usize },
    Query { conn: usize, op: &'static str, configured: bool },
    Released { conn: usize },
}

#[derive(Default)]
struct Table {
    rows: Vec<Car>,
    last_id: i64,
}

#[derive(Default)]
struct Inner {
    table: Mutex<Table>,
    events: Mutex<Vec<Event>>,
    acquired: AtomicUsize,
    released: AtomicUsize,
    fail_acquire: AtomicBool,
    fail_configure: AtomicBool,
    fail_queries: AtomicBool,
}

impl Inner {
    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Connection source backed by an in-memory `car` table.
#[derive(Clone, Default)]
pub struct MemoryPool {
    inner: Arc<Inner>,
}

impl MemoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly, bypassing any session.
    pub fn seed(&self, make: &str, model: &str, year: i64, deleted_flag: i8) -> Car {
        let mut table = self.inner.table();
        table.last_id += 1;
        let car = Car {
            id: table.last_id,
            make: make.to_owned(),
            model: model.to_owned(),
            year,
            deleted_flag,
        };
        table.rows.push(car.clone());
        car
    }

    /// Every stored row, soft-deleted ones included.
    pub fn rows(&self) -> Vec<Car> {
        self.inner.table().rows.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn acquired(&self) -> usize {
        self.inner.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.inner.released.load(Ordering::SeqCst)
    }

    /// Connections currently lent out.
    pub fn outstanding(&self) -> usize {
        self.acquired() - self.released()
    }

    pub fn fail_acquire(&self, fail: bool) {
        self.inner.fail_acquire.store(fail, Ordering::SeqCst);
    }

    pub fn fail_configure(&self, fail: bool) {
        self.inner.fail_configure.store(fail, Ordering::SeqCst);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.inner.fail_queries.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectionSource for MemoryPool {
    type Conn = MemoryConnection;

    async fn acquire(&self) -> Result<MemoryConnection, DbError> {
        if self.inner.fail_acquire.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("memory pool refused connection".into()));
        }

        let conn = self.inner.acquired.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.record(Event::Acquired { conn });
        Ok(MemoryConnection {
            id: conn,
            inner: Arc::clone(&self.inner),
            settings: None,
        })
    }
}

/// A connection lent out by [`MemoryPool`]; returned on drop.
pub struct MemoryConnection {
    id: usize,
    inner: Arc<Inner>,
    settings: Option<SessionSettings>,
}

impl MemoryConnection {
    fn begin(&self, op: &'static str) -> Result<(), DbError> {
        let configured = self.settings.is_some();
        self.inner.record(Event::Query {
            conn: self.id,
            op,
            configured,
        });

        if self.inner.fail_queries.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable(format!("{} failed", op)));
        }
        if !configured {
            return Err(DbError::NamedPlaceholdersDisabled);
        }
        Ok(())
    }

    fn strict(&self) -> bool {
        self.settings.as_ref().is_some_and(SessionSettings::is_strict)
    }

    /// NULL into a NOT NULL column: an error in strict mode, the type's
    /// implicit default otherwise.
    fn required<T: Default>(&self, column: &str, value: Option<T>) -> Result<T, DbError> {
        match value {
            Some(v) => Ok(v),
            None if self.strict() => Err(DbError::Rejected(format!(
                "Column '{}' cannot be null",
                column
            ))),
            None => Ok(T::default()),
        }
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.inner.released.fetch_add(1, Ordering::SeqCst);
        self.inner.record(Event::Released { conn: self.id });
    }
}

#[async_trait]
impl CarConnection for MemoryConnection {
    async fn configure(&mut self, settings: &SessionSettings) -> Result<(), DbError> {
        if self.inner.fail_configure.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("session setup failed".into()));
        }
        self.settings = Some(settings.clone());
        self.inner.record(Event::Configured { conn: self.id });
        Ok(())
    }

    async fn list_active(&mut self) -> Result<Vec<Car>, DbError> {
        self.begin("list_active")?;
        Ok(self
            .inner
            .table()
            .rows
            .iter()
            .filter(|car| !car.is_deleted())
            .cloned()
            .collect())
    }

    async fn insert(&mut self, car: &NewCar) -> Result<u64, DbError> {
        self.begin("insert")?;
        let make = self.required("make", car.make.clone())?;
        let model = self.required("model", car.model.clone())?;
        let year = self.required("year", car.year)?;
        let deleted_flag = self.required("deleted_flag", car.deleted_flag)?;

        let mut table = self.inner.table();
        table.last_id += 1;
        let id = table.last_id;
        table.rows.push(Car {
            id,
            make,
            model,
            year,
            deleted_flag,
        });
        Ok(1)
    }

    async fn update_make(
        &mut self,
        id: Option<i64>,
        make: Option<&str>,
    ) -> Result<u64, DbError> {
        self.begin("update_make")?;
        let Some(id) = id else {
            return Ok(0);
        };

        let mut table = self.inner.table();
        let Some(row) = table.rows.iter_mut().find(|car| car.id == id) else {
            return Ok(0);
        };
        row.make = self.required("make", make.map(str::to_owned))?;
        Ok(1)
    }

    async fn find_by_id(&mut self, id: Option<i64>) -> Result<Vec<Car>, DbError> {
        self.begin("find_by_id")?;
        Ok(self
            .inner
            .table()
            .rows
            .iter()
            .filter(|car| Some(car.id) == id)
            .cloned()
            .collect())
    }

    async fn soft_delete(&mut self, id: i64) -> Result<u64, DbError> {
        self.begin("soft_delete")?;
        let mut table = self.inner.table();
        let mut affected = 0;
        for car in table.rows.iter_mut().filter(|car| car.id == id) {
            car.deleted_flag = 1;
            affected += 1;
        }
        Ok(affected)
    }
}
