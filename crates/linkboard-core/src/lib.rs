//! Linkboard Core Library
//!
//! Core functionality for Linkboard, a self-hosted "link-in-bio" page: a
//! weight-ranked link store backed by SQLite and a concurrent render cache
//! that keeps a pre-rendered public page consistent with the mutable data.
//!
//! # Architecture
//!
//! - **Link Store**: durable CRUD over link records, ranking query, schema
//!   lifecycle (baseline schema + versioned migrations)
//! - **Render Cache**: the last-rendered byte snapshot; many concurrent
//!   readers, writer exclusive only for the pointer swap
//! - **Page Assembler**: pulls the ranked list, merges it with static page
//!   metadata, renders through an opaque `Renderer`, installs the snapshot
//!
//! Public-page reads touch only the cache; admin mutations go through the
//! store and then force a refresh.
//!
//! # Modules
//!
//! - `storage`: SQLite store, schema, migrations
//! - `cache`: render cache and the `Renderer` trait
//! - `page`: page assembler
//! - `models`: link records and page data
//! - `config`: application configuration

pub mod cache;
pub mod config;
pub mod models;
pub mod page;
pub mod storage;

pub use cache::{RenderCache, RenderError, Renderer};
pub use config::{Config, ConfigError};
pub use models::{Link, LinkDraft, PageContext, PageMeta, WeightAction};
pub use page::{PageAssembler, RefreshError};
pub use storage::{LinkStore, StoreError};
