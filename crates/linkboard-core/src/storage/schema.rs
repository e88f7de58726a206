//! Baseline SQLite schema
//!
//! Applied exactly once, on first run, when the `links` table is found to be
//! absent. The baseline already includes every column that later migrations
//! would add, so a fresh database never replays structural migrations.

use rusqlite::Connection;

use crate::storage::error::StoreResult;

/// Baseline schema for a fresh database
pub const BASELINE_SCHEMA: &str = r#"
CREATE TABLE links (
    link_id     INTEGER PRIMARY KEY,
    message     TEXT NOT NULL,
    url         TEXT NOT NULL,
    description TEXT DEFAULT '' NOT NULL,
    image_url   TEXT DEFAULT '' NOT NULL,
    weight      INTEGER DEFAULT 0 NOT NULL,
    hits        INTEGER DEFAULT 0 NOT NULL
);
"#;

/// Execute the baseline schema batch
pub fn apply_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(BASELINE_SCHEMA)?;
    Ok(())
}

/// Check whether the `links` table exists
pub fn links_table_exists(conn: &Connection) -> StoreResult<bool> {
    let exists = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'links'")?
        .exists([])?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!links_table_exists(&conn).unwrap());

        apply_schema(&conn).unwrap();
        assert!(links_table_exists(&conn).unwrap());
    }

    #[test]
    fn test_baseline_includes_migrated_columns() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('links')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for expected in ["link_id", "message", "url", "description", "image_url", "weight", "hits"]
        {
            assert!(columns.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_defaults() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO links (message, url) VALUES ('a', 'https://a')",
            [],
        )
        .unwrap();

        let (weight, hits, description): (i64, i64, String) = conn
            .query_row(
                "SELECT weight, hits, description FROM links LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();

        assert_eq!(weight, 0);
        assert_eq!(hits, 0);
        assert_eq!(description, "");
    }
}
