//! Schema bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use carlot_server::config::DbConfig;
use carlot_server::db::{create_pool, schema};

use super::DbArgs;

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Create the car table
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let db_config = DbConfig::from(args.db);
    let pool = create_pool(&db_config)
        .await
        .context("Failed to create database pool")?;

    schema::ensure_car_table(&pool)
        .await
        .context("Failed to create car table")?;

    tracing::info!(database = %db_config.database, "car table ready");
    pool.close().await;
    Ok(())
}
