//! SQL DDL for the comment store.
//!
//! Defines the `comments` table (text payload and attributes) and the
//! `comments_vec` vec0 virtual table (the vector index). All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// Core table: one row per ingested comment, keyed by the derived document key.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    key TEXT PRIMARY KEY,
    post_url TEXT NOT NULL,
    comment_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_post_url ON comments(post_url);
"#;

/// vec0 virtual table must be created separately (sqlite-vec syntax). The
/// embedding width is fixed per deployment, so the DDL is built at init time.
fn vec_table_sql(dimensions: usize) -> String {
    format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS comments_vec USING vec0(\n\
             key TEXT PRIMARY KEY,\n\
             embedding FLOAT[{dimensions}]\n\
         );"
    )
}

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection, dimensions: usize) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(&vec_table_sql(dimensions))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        crate::db::load_sqlite_vec();
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn, 8).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"comments".to_string()));

        // Verify the vec extension is live and the virtual table exists
        let version: String = conn
            .query_row("SELECT vec_version()", [], |r| r.get(0))
            .unwrap();
        assert!(!version.is_empty());
    }

    #[test]
    fn schema_is_idempotent() {
        crate::db::load_sqlite_vec();
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn, 8).unwrap();
        init_schema(&conn, 8).unwrap(); // second call should not error
    }
}
