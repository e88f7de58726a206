//! Render cache
//!
//! Holds the last successfully rendered public page as an immutable byte
//! snapshot. Unboundedly many readers fetch the snapshot concurrently; a
//! refresh renders into a private buffer first and takes the write lock only
//! for the pointer swap, so readers never block on the (possibly slow)
//! render itself and never observe a torn artifact.
//!
//! A failed render leaves the previous snapshot byte-for-byte untouched: the
//! public page keeps serving the last good render.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::models::PageContext;

/// Failure of the opaque render step
#[derive(Error, Debug)]
#[error("render failed: {message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The opaque render step: page data in, bytes out
///
/// Implemented outside the core (the server crate renders with templates);
/// the cache only cares that it either yields a complete byte sequence or
/// fails without side effects.
pub trait Renderer: Send + Sync {
    fn render(&self, ctx: &PageContext) -> Result<Vec<u8>, RenderError>;
}

/// Shared holder for the current page snapshot
pub struct RenderCache {
    snapshot: RwLock<Arc<[u8]>>,
}

impl RenderCache {
    /// Create an empty cache
    ///
    /// `read()` returns an empty slice until the first successful
    /// `refresh()`; the page assembler guarantees one happens at startup
    /// before the public route is reachable.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::from(&[][..])),
        }
    }

    /// Render `ctx` and install the result as the current snapshot
    ///
    /// The render runs without any lock held. On failure the previous
    /// snapshot is retained and the error returned.
    pub fn refresh(&self, renderer: &dyn Renderer, ctx: &PageContext) -> Result<(), RenderError> {
        let bytes = renderer.render(ctx)?;
        let next: Arc<[u8]> = Arc::from(bytes.into_boxed_slice());
        *self.snapshot.write() = next;
        Ok(())
    }

    /// The current snapshot
    ///
    /// Cheap: clones the `Arc` handle under the read lock.
    pub fn read(&self) -> Arc<[u8]> {
        self.snapshot.read().clone()
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}
