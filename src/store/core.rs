use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::store::migrate;

/// Opens (creating if needed) the local store and brings its schema up to date.
pub fn open_store(path: &Path) -> Result<Connection> {
    crate::store::paths::ensure_parent_dir(path)?;
    let mut con = Connection::open(path)
        .with_context(|| format!("Unable to open local store: {}", path.display()))?;
    migrate::run(&mut con)?;
    Ok(con)
}

/// In-memory store with the current schema; nothing survives the connection.
pub fn open_in_memory() -> Result<Connection> {
    let mut con = Connection::open_in_memory().context("Unable to open in-memory store")?;
    migrate::run(&mut con)?;
    Ok(con)
}

pub fn has_table(con: &Connection, table: &str) -> Result<bool> {
    let n: i64 = con.query_row(
        r#"
        SELECT COUNT(*)
        FROM sqlite_master
        WHERE type = 'table' AND name = ?1
        "#,
        [table],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}
