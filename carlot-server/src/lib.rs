//! carlot-server: HTTP API for the car inventory
//!
//! Every request borrows one pooled MySQL connection for its whole
//! lifetime. The connection middleware configures the session before a
//! route runs and hands the connection back to the pool afterwards, on
//! success and failure alike.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{DbConfig, SessionSettings};
pub use db::{CarConnection, ConnectionSource, DbError, MemoryPool};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use models::{Car, CarsEnvelope, NewCar, UpdateCar};
