//! Versioned schema migrations
//!
//! A ledger table records every applied migration as `(version, name,
//! applied_at)`. Versions apply in ascending order, each at most once. A
//! migration may carry a `skip_if` probe: when the probe reports the
//! structural change already exists (e.g. a manually patched database), the
//! version is recorded without re-executing the statement.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::schema::links_table_exists;

/// A single versioned schema change
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    /// The structural change itself
    pub up: &'static str,
    /// Optional probe returning a count; nonzero means the change already
    /// exists and only the ledger entry is written
    pub skip_if: Option<&'static str>,
}

/// All migrations, in ascending version order
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "add_description_column",
    up: "ALTER TABLE links ADD COLUMN description TEXT DEFAULT '' NOT NULL;",
    skip_if: Some(
        "SELECT COUNT(*) FROM pragma_table_info('links') WHERE name = 'description';",
    ),
}];

/// Ensure the ledger exists and apply every pending migration
///
/// On a fresh database (no `links` table yet) there is nothing to migrate:
/// the baseline schema carries every migrated column, so this returns Ok and
/// the ledger is stamped on a later run via the `skip_if` probes.
///
/// A failing migration aborts the remainder; versions already recorded stay
/// recorded.
pub fn run_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );",
    )?;

    if !links_table_exists(conn)? {
        debug!("links table absent, skipping migrations until first-run setup");
        return Ok(());
    }

    let current: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }

        if let Some(probe) = migration.skip_if {
            let already: i64 = conn.query_row(probe, [], |row| row.get(0))?;
            if already > 0 {
                record_migration(conn, migration)?;
                debug!(
                    version = migration.version,
                    name = migration.name,
                    "migration already in effect, recorded without executing"
                );
                continue;
            }
        }

        conn.execute_batch(migration.up)
            .map_err(|source| StoreError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        record_migration(conn, migration)?;
        info!(
            version = migration.version,
            name = migration.name,
            "applied schema migration"
        );
    }

    Ok(())
}

fn record_migration(conn: &Connection, migration: &Migration) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
        rusqlite::params![migration.version, migration.name],
    )?;
    Ok(())
}

/// Highest version recorded in the ledger, 0 when empty or absent
pub fn current_version(conn: &Connection) -> StoreResult<i64> {
    let exists = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'")?
        .exists([])?;
    if !exists {
        return Ok(0);
    }
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
