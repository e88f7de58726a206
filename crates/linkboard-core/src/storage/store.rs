//! Durable CRUD over link records
//!
//! `LinkStore` owns the SQLite connection behind a mutex so it can be shared
//! across request-handling threads. SQLite serializes writers at the storage
//! engine level; no additional write-side coordination is added here.
//!
//! The ranked list is recomputed from scratch on every `list()` call; it is
//! never maintained incrementally.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection};

use crate::models::{Link, LinkDraft, WeightAction};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::migrations;
use crate::storage::schema;

/// Ranking query: weight descending, id ascending on ties
const RANKED_SELECT: &str = "SELECT link_id, message, url, description, image_url, weight, hits
     FROM links ORDER BY weight DESC, link_id ASC";

/// Example links inserted right after first-run schema creation, so a fresh
/// deployment is not blank.
const EXAMPLE_LINKS: &[(&str, &str, &str)] = &[
    (
        "Getting Started with Linkboard",
        "Learn how to customize your page and add your own links through the admin panel",
        "https://github.com/linkboard/linkboard",
    ),
    (
        "View Documentation",
        "Documentation covering installation, configuration, and deployment options",
        "https://github.com/linkboard/linkboard#features",
    ),
    (
        "Get Started",
        "Quick setup guide to get your page running in minutes",
        "https://github.com/linkboard/linkboard#get-started",
    ),
];

/// SQLite-backed store for link records
pub struct LinkStore {
    conn: Mutex<Connection>,
}

impl LinkStore {
    /// Open or create the database file
    ///
    /// Opening does not create any tables; first-run setup is driven by the
    /// caller once a missing `links` table is detected.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// All links, ordered by weight descending then id ascending
    ///
    /// Returns an empty vec on an empty table.
    pub fn list(&self) -> StoreResult<Vec<Link>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(RANKED_SELECT)?;
        let links = stmt
            .query_map([], row_to_link)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    /// Insert a new link, returning its assigned id
    ///
    /// New rows start at weight 0 and hits 0 via column defaults.
    pub fn insert(&self, draft: &LinkDraft) -> StoreResult<i64> {
        draft.validate()?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO links (message, url, description, image_url) VALUES (?1, ?2, ?3, ?4)",
            params![draft.text, draft.url, draft.description, draft.image_url],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Update an existing link's editable fields
    pub fn update(&self, id: i64, draft: &LinkDraft) -> StoreResult<()> {
        draft.validate()?;

        let conn = self.conn.lock();
        let affected = conn.execute(
            "UPDATE links SET message = ?1, url = ?2, description = ?3, image_url = ?4
             WHERE link_id = ?5",
            params![draft.text, draft.url, draft.description, draft.image_url, id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    /// Atomically nudge a link's weight by ±1
    pub fn adjust_weight(&self, id: i64, action: WeightAction) -> StoreResult<()> {
        let conn = self.conn.lock();
        let affected = conn.execute(
            "UPDATE links SET weight = weight + ?1 WHERE link_id = ?2",
            params![action.delta(), id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    /// Delete a link
    ///
    /// Idempotent: deleting a nonexistent id succeeds and touches no rows.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM links WHERE link_id = ?1", params![id])?;
        Ok(())
    }

    /// Bump a link's hit counter
    ///
    /// Fire-and-forget from the visitor's perspective: the HTTP caller logs
    /// failures instead of propagating them, and a hit never invalidates the
    /// render cache (hit counts are not rendered).
    pub fn increment_hit(&self, id: i64) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE links SET hits = hits + 1 WHERE link_id = ?1",
            params![id],
        )?;
        Ok(())
    }

    /// Apply the baseline schema (first-run only)
    pub fn apply_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock();
        schema::apply_schema(&conn)
    }

    /// Insert the fixed example links (first-run only, right after
    /// `apply_schema`)
    pub fn seed_example_data(&self) -> StoreResult<()> {
        for (text, description, url) in EXAMPLE_LINKS {
            self.insert(&LinkDraft::new(*text, *url, *description, ""))?;
        }
        Ok(())
    }

    /// Apply any pending schema migrations (every startup)
    pub fn run_migrations(&self) -> StoreResult<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }
}

fn row_to_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<Link> {
    Ok(Link {
        id: row.get(0)?,
        text: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        weight: row.get(5)?,
        hits: row.get(6)?,
    })
}
