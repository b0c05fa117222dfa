//! HTTP server command
//!
//! Runs the pacientes/atenciones API against PostgreSQL, or against an
//! in-memory store with `--in-memory`.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use hospital_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use hospital_server::db::{create_pool_with_options, migrations};
use hospital_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8080", env = "HOSPITAL_BIND")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "HOSPITAL_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Serve from an in-memory store instead of PostgreSQL (data is lost on exit).
    /// Takes precedence over any configured database URL.
    #[arg(long)]
    pub in_memory: bool,

    /// Skip running migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let state = if args.in_memory {
        tracing::warn!("Using in-memory store; data will not persist");
        AppState::in_memory()
    } else {
        let database_url = args.database_url.context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env or .env, \
             or pass --in-memory",
        )?;

        let pool = create_pool_with_options(&database_url, args.max_connections)
            .await
            .context("Failed to create database pool")?;

        if !args.skip_migrations {
            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;
        }

        AppState::postgres(pool)
    };

    tracing::info!("Starting hospital server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
