use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use termsift_core::EventKind;
use termsift_service::{Engine, EngineConfig};
use termsift_storage::StorageBackend;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "termsift")]
#[command(about = "Infer final search terms from keystroke sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append one search event; a finalize event also finalizes its session
    Record {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        session: String,
        #[arg(short, long, default_value = "keystroke")]
        kind: EventKind,
        #[arg(short, long)]
        value: String,
        /// RFC 3339 timestamp, defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Finalize a session from its stored events
    Finalize {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        session: String,
    },
    /// Count a term for a user directly, skipping session reduction
    Reconcile {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        term: String,
    },
    /// Finalize every stored session
    Replay {
        #[arg(short, long)]
        user: Option<String>,
    },
    Analytics {
        #[arg(short, long)]
        user: String,
    },
    Top {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    Recent {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print the stored events of one session
    Events {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        session: String,
    },
    /// Copy the SQLite database into PostgreSQL (`DATABASE_URL`)
    #[cfg(feature = "postgres")]
    Migrate,
}

pub(crate) fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("TERMSIFT_DB_PATH") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("termsift").join("termsift.db")
}

pub(crate) fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub(crate) fn open_sqlite() -> Result<StorageBackend> {
    let db_path = get_db_path();
    ensure_db_dir(&db_path)?;
    Ok(StorageBackend::new_sqlite(&db_path)?)
}

async fn open_backend() -> Result<StorageBackend> {
    #[cfg(feature = "postgres")]
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let backend = StorageBackend::new_postgres(&url).await?;
        tracing::debug!(backend = backend.kind(), "storage opened");
        return Ok(backend);
    }
    let backend = open_sqlite()?;
    tracing::debug!(backend = backend.kind(), "storage opened");
    Ok(backend)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    #[cfg(feature = "postgres")]
    if matches!(cli.command, Commands::Migrate) {
        return commands::migrate::run().await;
    }

    let engine = Engine::new(Arc::new(open_backend().await?), EngineConfig::from_env());

    match cli.command {
        Commands::Record { user, session, kind, value, at } => {
            commands::events::run_record(&engine, user, session, kind, value, at).await
        },
        Commands::Finalize { user, session } => {
            commands::events::run_finalize(&engine, &user, &session).await
        },
        Commands::Events { user, session } => {
            commands::events::run_events(&engine, &user, &session).await
        },
        Commands::Reconcile { user, term } => {
            commands::terms::run_reconcile(&engine, &user, &term).await
        },
        Commands::Replay { user } => commands::terms::run_replay(&engine, user.as_deref()).await,
        Commands::Analytics { user } => commands::analytics::run_analytics(&engine, &user).await,
        Commands::Top { user, limit } => commands::analytics::run_top(&engine, &user, limit).await,
        Commands::Recent { user, limit } => {
            commands::analytics::run_recent(&engine, &user, limit).await
        },
        // Handled before the engine is opened.
        #[cfg(feature = "postgres")]
        Commands::Migrate => Ok(()),
    }
}
