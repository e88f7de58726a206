//! Application wiring and startup
//!
//! Builds the store, cache, renderer, and page assembler from configuration,
//! and drives the first-run bootstrap: when the very first refresh reports a
//! missing `links` table, the baseline schema is applied, example data
//! seeded, and the refresh retried exactly once. A second failure is fatal.

use std::sync::Arc;

use anyhow::{Context, Result};
use linkboard_core::{
    Config, LinkStore, PageAssembler, RenderCache, Renderer,
};
use linkboard_core::config::AuthConfig;
use tracing::info;

use crate::render::HtmlRenderer;

/// Shared application state for the HTTP layer
pub struct App {
    pub assembler: PageAssembler,
    pub store: Arc<LinkStore>,
    pub cache: Arc<RenderCache>,
    pub renderer: Arc<HtmlRenderer>,
    pub auth: AuthConfig,
}

pub type SharedApp = Arc<App>;

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let store = Arc::new(
            LinkStore::open(&config.db_file)
                .with_context(|| format!("failed to open database {:?}", config.db_file))?,
        );
        let cache = Arc::new(RenderCache::new());
        let renderer = Arc::new(HtmlRenderer::new().context("failed to load templates")?);

        let assembler = PageAssembler::new(
            config.page_meta(),
            Arc::clone(&store),
            Arc::clone(&cache),
            Arc::clone(&renderer) as Arc<dyn Renderer>,
        );

        Ok(Self {
            assembler,
            store,
            cache,
            renderer,
            auth: config.auth.clone(),
        })
    }

    /// Migrate, render the initial snapshot, and handle first run
    pub fn bootstrap(&self) -> Result<()> {
        self.store
            .run_migrations()
            .context("failed to run schema migrations")?;

        match self.assembler.refresh() {
            Ok(()) => Ok(()),
            Err(err) if err.is_missing_table() => {
                info!("links table missing, running first-run setup");
                self.store
                    .apply_schema()
                    .context("failed to apply baseline schema")?;
                self.store
                    .seed_example_data()
                    .context("failed to seed example data")?;
                self.store
                    .run_migrations()
                    .context("failed to stamp migration ledger")?;
                // Retried exactly once; a second failure is fatal
                self.assembler
                    .refresh()
                    .context("initial page refresh failed after first-run setup")?;
                Ok(())
            }
            Err(err) => Err(err).context("initial page refresh failed"),
        }
    }
}
