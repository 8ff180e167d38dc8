use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use state_catalog::{
    build_router,
    config::{AppConfig, DatabaseBackend},
    repository::{InMemoryStateRepository, PgStateRepository, StateRepository},
    seed::seed_default_states,
    service::StateService,
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "state_catalog")]
#[command(about = "HTTP catalog of State records")]
struct Cli {
    /// Overrides DATABASE_BACKEND
    #[arg(long, global = true)]
    backend: Option<DatabaseBackend>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create the schema
    Migrate,
    /// Insert the default states that are missing
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("failed to load application configuration")?;
    if let Some(backend) = cli.backend {
        config.database_backend = backend;
    }

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Migrate => {
            let repository = connect(&config).await?;
            repository
                .init()
                .await
                .context("failed to initialize states schema")?;
            info!("migrations applied successfully");
            Ok(())
        }
        Command::Seed => {
            let repository = connect(&config).await?;
            repository
                .init()
                .await
                .context("failed to initialize states schema")?;
            let inserted = seed_default_states(&StateService::new(repository))
                .await
                .context("failed to insert default states")?;
            info!(inserted, "seed data inserted successfully");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let repository = connect(&config).await?;
    repository
        .init()
        .await
        .context("failed to initialize states schema")?;

    let app = build_router(AppState::new(repository));

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "state catalog started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn connect(config: &AppConfig) -> Result<Arc<dyn StateRepository>> {
    let repository: Arc<dyn StateRepository> = match config.database_backend {
        DatabaseBackend::Postgres => {
            info!("database backend: postgres");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(&config.database_url)
                .await
                .context("failed to connect to PostgreSQL")?;
            Arc::new(PgStateRepository::new(pool))
        }
        DatabaseBackend::Memory => {
            info!("database backend: memory");
            Arc::new(InMemoryStateRepository::new())
        }
    };

    Ok(repository)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("state_catalog=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
