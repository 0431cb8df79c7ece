//! HTTP server command
//!
//! Opens the MySQL pool and serves the car routes until Ctrl+C/SIGTERM.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use carlot_server::config::{DbConfig, SessionSettings};
use carlot_server::db::create_pool;
use carlot_server::http::{run_server, ServerConfig};

use super::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Interface to bind (default: all)
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bind_addr = SocketAddr::new(args.host, args.port);
    let db_config = DbConfig::from(args.db);
    tracing::debug!(?db_config, "Database configuration");

    // Create database pool
    let pool = create_pool(&db_config)
        .await
        .context("Failed to create database pool")?;

    // Run server (blocks until shutdown)
    run_server(pool, SessionSettings::default(), ServerConfig { bind_addr })
        .await
        .context("Server error")?;

    Ok(())
}
