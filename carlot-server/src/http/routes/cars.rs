//! Car endpoints
//!
//! Every handler receives the request's configured connection through
//! [`DbConn`] and runs one or two statements on it. The write and the
//! read that follows are separate statements, not a transaction.

use axum::{
    extract::Path,
    routing::{delete, get},
    Json, Router,
};

use crate::db::{CarConnection, ConnectionSource};
use crate::http::error::ApiError;
use crate::http::extractors::DbConn;
use crate::http::server::AppState;
use crate::models::{Car, CarsEnvelope, NewCar, UpdateCar};

/// GET /car - all cars that are not soft-deleted
async fn list_cars<C: CarConnection>(
    mut db: DbConn<C>,
) -> Result<Json<CarsEnvelope>, ApiError> {
    let cars = db.list_active().await?;
    tracing::debug!(count = cars.len(), "Listed cars");
    Ok(Json(cars.into()))
}

/// POST /car - insert, then return the visible set
async fn create_car<C: CarConnection>(
    mut db: DbConn<C>,
    Json(req): Json<NewCar>,
) -> Result<Json<Vec<Car>>, ApiError> {
    db.insert(&req).await?;
    let cars = db.list_active().await?;
    Ok(Json(cars))
}

/// PUT /car - change `make`, then return that row whatever its flag
async fn update_car<C: CarConnection>(
    mut db: DbConn<C>,
    Json(req): Json<UpdateCar>,
) -> Result<Json<CarsEnvelope>, ApiError> {
    let affected = db.update_make(req.id, req.make.as_deref()).await?;
    tracing::debug!(id = ?req.id, affected, "Updated car make");

    let cars = db.find_by_id(req.id).await?;
    Ok(Json(cars.into()))
}

/// DELETE /car/{id} - soft delete, then return the visible set
async fn delete_car<C: CarConnection>(
    mut db: DbConn<C>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let affected = db.soft_delete(id).await?;
    tracing::debug!(id, affected, "Soft-deleted car");

    let cars = db.list_active().await?;
    Ok(Json(cars))
}

/// Car routes
pub fn router<S: ConnectionSource>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/car",
            get(list_cars::<S::Conn>)
                .post(create_car::<S::Conn>)
                .put(update_car::<S::Conn>),
        )
        .route("/car/{id}", delete(delete_car::<S::Conn>))
}
