//! HTTP layer
//!
//! Axum server with:
//! - Permissive CORS (any origin, credentials allowed)
//! - Request tracing
//! - One configured database connection per request
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use extractors::DbConn;
pub use middleware::Lease;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
