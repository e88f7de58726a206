//! SQLite-backed link storage
//!
//! - `store`: CRUD, ranking query, hit counting
//! - `schema`: baseline schema for first-run setup
//! - `migrations`: versioned, idempotent schema changes
//! - `error`: typed storage errors

pub mod error;
pub mod migrations;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use migrations::{run_migrations, Migration, MIGRATIONS};
pub use store::LinkStore;
