use rusqlite::Connection;
use tracing::info;

use crate::error::StorageError;

/// Drop and recreate all tables. Only ever run against a file that was just
/// created.
pub fn reset_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(DROP_SQL)?;
    conn.execute_batch(SCHEMA_SQL)?;
    info!("created node, link and config tables");
    Ok(())
}

/// Create missing tables, leaving existing ones and their rows in place.
///
/// Older files mark root nodes with an empty parent uuid instead of NULL.
/// Those are rewritten to NULL so `parent == None` filters find them.
pub fn ensure_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(SCHEMA_SQL)?;
    let fixed = conn.execute("UPDATE node SET puuid = NULL WHERE puuid = ''", [])?;
    if fixed > 0 {
        info!(rows = fixed, "cleared empty parent uuids");
    }
    Ok(())
}

const DROP_SQL: &str = "
DROP TABLE IF EXISTS link;
DROP TABLE IF EXISTS node;
DROP TABLE IF EXISTS config;
";

// Column names match files written by earlier releases, hence the quoting of
// keywords such as "group" and "desc".
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS link (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT UNIQUE,
    node TEXT,
    system TEXT,
    client TEXT,
    "user" TEXT,
    password TEXT,
    language TEXT
);

CREATE TABLE IF NOT EXISTS node (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    node TEXT,
    "desc" TEXT,
    "group" TEXT,
    type TEXT,
    position INTEGER,
    uuid TEXT UNIQUE,
    puuid TEXT,
    expanded INTEGER DEFAULT 0
);

CREATE TABLE IF NOT EXISTS config (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    "key" TEXT UNIQUE,
    value TEXT
);
"#;
