//! Linkboard server
//!
//! Serves a public "link-in-bio" page from a pre-rendered cache and an
//! admin panel (behind basic auth) for managing the weight-ordered links.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use linkboard_core::{Config, LinkStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod handlers;
mod metadata;
mod render;

use app::App;

#[derive(Parser)]
#[command(name = "linkboard")]
#[command(about = "Self-hosted link-in-bio page")]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// First-time setup: create the database and a sample config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => init_app(&cli.config),
        None => run_app(&cli.config).await,
    }
}

/// Create the database with schema + example data and write a sample config
fn init_app(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        bail!(
            "{} already exists, refusing to overwrite",
            config_path.display()
        );
    }

    let store = LinkStore::open("app.db").context("failed to create app.db")?;
    match store.list() {
        Ok(_) => info!("database already initialized, leaving it untouched"),
        Err(err) if err.is_missing_table() => {
            store.apply_schema().context("failed to apply schema")?;
            store
                .seed_example_data()
                .context("failed to seed example data")?;
            store
                .run_migrations()
                .context("failed to stamp migration ledger")?;
        }
        Err(err) => return Err(err).context("failed to inspect app.db"),
    }

    std::fs::write(config_path, Config::sample_toml())
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    info!("{} and app.db generated", config_path.display());
    Ok(())
}

async fn run_app(config_path: &Path) -> Result<()> {
    let config = Config::load_from_path(config_path)?;

    let app = Arc::new(App::new(&config)?);
    app.bootstrap()?;

    let router = handlers::router(app);
    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;

    info!("starting server at {}", config.http_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
