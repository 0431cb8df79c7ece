//! carlot CLI - runs the car inventory HTTP API
//!
//! Subcommands:
//! - `serve`: start the HTTP server against MySQL
//! - `init-db`: create the `car` table if it is missing
//!
//! Settings come from flags or the environment (`PORT`, `DB_HOST`,
//! `DB_USER`, `DB_PASSWORD`, `DB_NAME`, ...). A `.env` file in the working
//! directory is loaded first; variables already set win.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "carlot",
    author,
    version,
    about = "HTTP API for a car inventory backed by MySQL"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the car table if it does not exist
    InitDb(commands::init_db::InitDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real environment variables take precedence
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb(args) => commands::run_init_db(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_reads_listen_and_db_settings_separately() {
        let cli = Cli::try_parse_from([
            "carlot",
            "serve",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--db-host",
            "db.internal",
            "--db-port",
            "3307",
            "--db-name",
            "cars",
        ])
        .expect("serve args should parse");

        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, 8080);
        assert_eq!(args.host.to_string(), "127.0.0.1");
        assert_eq!(args.db.db_host, "db.internal");
        assert_eq!(args.db.db_port, 3307);
        assert_eq!(args.db.db_name, "cars");
    }
}
