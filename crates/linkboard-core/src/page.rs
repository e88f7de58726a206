//! Page assembly
//!
//! `PageAssembler` orchestrates "recompute the public artifact": pull the
//! ranked link list from the store, merge it with the static page metadata,
//! render, and install the result into the cache. Invoked once at startup
//! and after every mutating admin action; never polled.

use std::sync::Arc;

use thiserror::Error;

use crate::cache::{RenderCache, RenderError, Renderer};
use crate::models::{PageContext, PageMeta};
use crate::storage::{LinkStore, StoreError};

/// A refresh failure, annotated with the stage that failed
///
/// Admin-facing callers use the stage to present a precise message without
/// leaking storage internals into the render path or vice versa.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("error while getting links: {0}")]
    Fetch(#[from] StoreError),

    #[error("failed to save rendered page: {0}")]
    Render(#[from] RenderError),
}

impl RefreshError {
    /// True when the fetch stage failed because the links table is absent;
    /// the first-run bootstrap trigger.
    pub fn is_missing_table(&self) -> bool {
        matches!(self, RefreshError::Fetch(err) if err.is_missing_table())
    }
}

/// Orchestrates store → render input → cache
pub struct PageAssembler {
    meta: PageMeta,
    store: Arc<LinkStore>,
    cache: Arc<RenderCache>,
    renderer: Arc<dyn Renderer>,
}

impl PageAssembler {
    pub fn new(
        meta: PageMeta,
        store: Arc<LinkStore>,
        cache: Arc<RenderCache>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            meta,
            store,
            cache,
            renderer,
        }
    }

    /// Recompute and install a new snapshot from current store data
    ///
    /// On a render failure the cache keeps serving the last good snapshot;
    /// the underlying data change (if any) is already durable and the page
    /// is merely stale until the next successful refresh.
    pub fn refresh(&self) -> Result<(), RefreshError> {
        let links = self.store.list()?;
        let ctx = PageContext::assemble(&self.meta, links);
        self.cache.refresh(self.renderer.as_ref(), &ctx)?;
        Ok(())
    }

    /// Assemble the render input without touching the cache
    ///
    /// Used by the admin page, which is rendered per request and never
    /// cached.
    pub fn context(&self) -> Result<PageContext, StoreError> {
        let links = self.store.list()?;
        Ok(PageContext::assemble(&self.meta, links))
    }

    /// The static page metadata
    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkDraft;

    struct JsonRenderer;

    impl Renderer for JsonRenderer {
        fn render(&self, ctx: &PageContext) -> Result<Vec<u8>, RenderError> {
            let urls: Vec<&str> = ctx.links.iter().map(|l| l.url.as_str()).collect();
            Ok(format!("{}|{}", ctx.title, urls.join(",")).into_bytes())
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, _ctx: &PageContext) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::new("template exploded"))
        }
    }

    fn assembler_with(renderer: Arc<dyn Renderer>) -> (PageAssembler, Arc<LinkStore>, Arc<RenderCache>) {
        let store = Arc::new(LinkStore::open_in_memory().unwrap());
        store.apply_schema().unwrap();
        let cache = Arc::new(RenderCache::new());
        let meta = PageMeta {
            title: "Links".to_string(),
            ..PageMeta::default()
        };
        let assembler = PageAssembler::new(meta, Arc::clone(&store), Arc::clone(&cache), renderer);
        (assembler, store, cache)
    }

    #[test]
    fn test_refresh_installs_snapshot() {
        let (assembler, store, cache) = assembler_with(Arc::new(JsonRenderer));
        store
            .insert(&LinkDraft::new("A", "https://a.example", "", ""))
            .unwrap();

        assembler.refresh().unwrap();
        assert_eq!(&*cache.read(), b"Links|https://a.example");
    }

    #[test]
    fn test_refresh_reflects_mutations() {
        let (assembler, store, cache) = assembler_with(Arc::new(JsonRenderer));
        store
            .insert(&LinkDraft::new("A", "https://a.example", "", ""))
            .unwrap();
        assembler.refresh().unwrap();

        store
            .insert(&LinkDraft::new("B", "https://b.example", "", ""))
            .unwrap();
        // Cache is stale until the next refresh
        assert_eq!(&*cache.read(), b"Links|https://a.example");

        assembler.refresh().unwrap();
        assert_eq!(&*cache.read(), b"Links|https://a.example,https://b.example");
    }

    #[test]
    fn test_fetch_stage_error() {
        let store = Arc::new(LinkStore::open_in_memory().unwrap());
        // No schema applied: list() fails with a missing table
        let cache = Arc::new(RenderCache::new());
        let assembler = PageAssembler::new(
            PageMeta::default(),
            store,
            Arc::clone(&cache),
            Arc::new(JsonRenderer),
        );

        let err = assembler.refresh().unwrap_err();
        assert!(matches!(err, RefreshError::Fetch(_)));
        assert!(err.is_missing_table());
        assert!(cache.read().is_empty());
    }

    #[test]
    fn test_render_stage_error_keeps_snapshot() {
        let (assembler, store, cache) = assembler_with(Arc::new(JsonRenderer));
        store
            .insert(&LinkDraft::new("A", "https://a.example", "", ""))
            .unwrap();
        assembler.refresh().unwrap();
        let before = cache.read();

        let failing = PageAssembler::new(
            PageMeta::default(),
            store,
            Arc::clone(&cache),
            Arc::new(FailingRenderer),
        );
        let err = failing.refresh().unwrap_err();
        assert!(matches!(err, RefreshError::Render(_)));
        assert!(!err.is_missing_table());
        assert_eq!(&*cache.read(), &*before);
    }

    #[test]
    fn test_hit_increment_does_not_touch_cache() {
        let (assembler, store, cache) = assembler_with(Arc::new(JsonRenderer));
        let id = store
            .insert(&LinkDraft::new("A", "https://a.example", "", ""))
            .unwrap();
        assembler.refresh().unwrap();
        let before = cache.read();

        store.increment_hit(id).unwrap();
        assert_eq!(&*cache.read(), &*before);
    }

    #[test]
    fn test_context_skips_render() {
        let (assembler, store, _cache) = assembler_with(Arc::new(FailingRenderer));
        store
            .insert(&LinkDraft::new("A", "https://a.example", "", ""))
            .unwrap();

        // context() never invokes the renderer
        let ctx = assembler.context().unwrap();
        assert_eq!(ctx.links.len(), 1);
    }
}
