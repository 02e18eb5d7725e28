//! `promptdeckd` — the promptdeck record service binary.
//!
//! Usage:
//!   promptdeckd -c <context-name-or-path> [--listen <addr>] [--seed]
//!
//! The context name resolves to `/etc/promptdeck/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth;
mod config;
mod routes;
mod seed;

use std::sync::Arc;

use clap::Parser;
use promptdeck_core::Module;
use tracing::info;

use config::ServerConfig;

/// Promptdeck record service.
#[derive(Parser, Debug)]
#[command(name = "promptdeckd", about = "Promptdeck record service")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the configured one).
    #[arg(long = "listen")]
    listen: Option<String>,

    /// Insert demo records if the database is empty, then continue serving.
    #[arg(long = "seed")]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    config::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = promptdeck_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.unwrap_or_else(|| server_config.listen.clone()),
        ..Default::default()
    };

    let sql: Arc<dyn promptdeck_sql::SQLStore> = Arc::new(
        promptdeck_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    let authenticator: Arc<dyn promptdeck_core::Authenticator> =
        Arc::new(auth::JwtAuthenticator::new(&server_config.jwt.secret));

    let records_module = records::RecordsModule::new(sql, authenticator)
        .map_err(|e| anyhow::anyhow!("failed to initialize records module: {}", e))?;

    if cli.seed {
        seed::seed_demo(&records_module.store())
            .map_err(|e| anyhow::anyhow!("seeding failed: {}", e))?;
    }

    let app = routes::build_router(vec![(records_module.name(), records_module.routes())]);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("promptdeckd listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
