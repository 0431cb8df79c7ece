//! Custom Axum extractors

use std::ops::{Deref, DerefMut};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;
use super::middleware::Lease;
use crate::db::CarConnection;

/// The request's configured connection, claimed from its [`Lease`].
///
/// Owned by the handler; dropping it returns the connection to the pool.
pub struct DbConn<C>(pub C);

impl<C> Deref for DbConn<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.0
    }
}

impl<C> DerefMut for DbConn<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.0
    }
}

impl<C, S> FromRequestParts<S> for DbConn<C>
where
    C: CarConnection,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let lease = parts
            .extensions
            .get::<Lease<C>>()
            .ok_or_else(|| ApiError::Internal {
                message: "no database connection attached to request".into(),
            })?;

        lease.take().map(Self).ok_or_else(|| ApiError::Internal {
            message: "database connection already claimed".into(),
        })
    }
}
