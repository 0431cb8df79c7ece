//! Axum server setup
//!
//! Server skeleton with:
//! - CORS mirroring the caller's origin, credentials allowed
//! - Tracing middleware
//! - Per-request connection middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::request_connection;
use super::routes;
use crate::config::SessionSettings;
use crate::db::ConnectionSource;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

/// Shared application state: the connection source and the session
/// settings every borrowed connection gets.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    source: S,
    session: SessionSettings,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> AppState<S> {
    pub fn new(source: S, session: SessionSettings) -> Self {
        Self {
            inner: Arc::new(AppStateInner { source, session }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn session(&self) -> &SessionSettings {
        &self.inner.session
    }
}

/// Any origin may call the API with credentials. Browsers reject a
/// literal `*` alongside credentials, so the request's own origin,
/// method and headers are echoed back instead.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Build the application router with all routes.
///
/// The connection middleware wraps every route, so no handler runs
/// without a configured connection.
pub fn build_router<S: ConnectionSource>(state: AppState<S>) -> Router {
    Router::new()
        .merge(routes::cars::router::<S>())
        .layer(from_fn_with_state(state.clone(), request_connection::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::new("cars")).await?;
/// run_server(pool, SessionSettings::default(), ServerConfig::default()).await?;
/// ```
pub async fn run_server<S: ConnectionSource>(
    source: S,
    session: SessionSettings,
    config: ServerConfig,
) -> Result<(), ServerError> {
    tracing::info!(
        sql_mode = %session.sql_mode,
        time_zone = %session.time_zone,
        "Session settings loaded"
    );
    let app = build_router(AppState::new(source, session));

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server started at http://{}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPool;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.bind_addr.ip().is_unspecified());
    }

    #[tokio::test]
    async fn preflight_echoes_origin_with_credentials() {
        let pool = MemoryPool::new();
        let app = build_router(AppState::new(pool.clone(), SessionSettings::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/car")
                    .header(header::ORIGIN, "http://example.test")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://example.test"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        // Answered by the CORS layer, before any connection is borrowed
        assert_eq!(pool.acquired(), 0);
    }

    #[tokio::test]
    async fn simple_request_gets_cors_headers() {
        let pool = MemoryPool::new();
        let app = build_router(AppState::new(pool, SessionSettings::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/car")
                    .header(header::ORIGIN, "http://other.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://other.test"
        );
    }
}
