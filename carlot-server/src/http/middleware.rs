//! Request-scoped database connection
//!
//! [`request_connection`] runs in front of every route:
//!
//! 1. acquire one connection from the source
//! 2. enable named placeholders and apply the session settings
//! 3. attach it to the request as a [`Lease`]
//! 4. run the route
//! 5. make sure the connection is back in the pool before returning
//!
//! Connections return to the pool when dropped, so every exit path
//! (early return, `?`, panic unwind) releases it. The route takes the
//! connection out of the lease through the [`DbConn`] extractor and drops
//! it when it finishes; whatever is still in the lease afterwards is
//! dropped here.
//!
//! [`DbConn`]: super::extractors::DbConn

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::server::AppState;
use crate::db::{CarConnection, ConnectionSource};

/// Slot holding the request's connection until a handler claims it.
pub struct Lease<C> {
    slot: Arc<Mutex<Option<C>>>,
}

impl<C> Clone for Lease<C> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<C> Lease<C> {
    pub fn new(conn: C) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Move the connection out. `None` once it has been taken.
    pub fn take(&self) -> Option<C> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Axum middleware wrapping each request in a configured connection.
pub async fn request_connection<S: ConnectionSource>(
    State(state): State<AppState<S>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut conn = state.source().acquire().await.map_err(|e| {
        tracing::error!(%method, %path, error = %e, "Failed to acquire connection");
        ApiError::from(e)
    })?;

    if let Err(e) = conn.configure(state.session()).await {
        tracing::error!(%method, %path, error = %e, "Failed to configure session");
        drop(conn);
        return Err(e.into());
    }

    let lease = Lease::new(conn);
    request.extensions_mut().insert(lease.clone());

    let response = next.run(request).await;

    match lease.take() {
        Some(unused) => {
            drop(unused);
            tracing::trace!(%method, %path, "Released unused connection");
        }
        None => tracing::trace!(%method, %path, "Connection released by handler"),
    }

    if response.status().is_server_error() {
        tracing::error!(%method, %path, status = %response.status(), "Request failed");
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPool;

    #[tokio::test]
    async fn lease_hands_out_connection_once() {
        let pool = MemoryPool::new();
        let lease = Lease::new(pool.acquire().await.unwrap());
        let other = lease.clone();

        let conn = other.take();
        assert!(conn.is_some());
        assert!(lease.take().is_none());

        drop(conn);
        assert_eq!(pool.released(), 1);
    }

    #[tokio::test]
    async fn dropping_lease_releases_connection() {
        let pool = MemoryPool::new();
        let lease = Lease::new(pool.acquire().await.unwrap());
        drop(lease);
        assert_eq!(pool.outstanding(), 0);
    }
}
