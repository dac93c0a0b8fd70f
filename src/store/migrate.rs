use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Transaction};

pub const SCHEMA_VERSION: i64 = 2;

fn column_exists(tx: &Transaction<'_>, table: &str, col: &str) -> Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = tx.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?; // PRAGMA table_info: 1 = name
        if name.eq_ignore_ascii_case(col) {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn meta_get(con: &Connection, key: &str) -> Result<Option<String>> {
    con.query_row("SELECT value FROM meta WHERE key = ?1", [key], |r| r.get(0))
        .optional()
        .with_context(|| format!("Failed to read meta key: {}", key))
}

fn meta_get_i64(con: &Connection, key: &str) -> Result<Option<i64>> {
    match meta_get(con, key)? {
        None => Ok(None),
        Some(v) => Ok(Some(v.parse::<i64>().with_context(|| {
            format!(
                "Invalid integer value in meta table for key '{}': '{}'",
                key, v
            )
        })?)),
    }
}

fn meta_upsert(tx: &Transaction<'_>, key: &str, value: &str) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO meta(key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
        (key, value),
    )?;
    Ok(())
}

fn m_to_v1(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
    .context("Failed to migrate schema to v1 (create kv table)")?;
    Ok(())
}

fn m_to_v2(tx: &Transaction<'_>) -> Result<()> {
    if !column_exists(tx, "kv", "updated_at")? {
        tx.execute_batch(
            r#"
            ALTER TABLE kv
            ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';
            "#,
        )
        .context("Failed to add kv.updated_at")?;
    }
    Ok(())
}

/// Run schema migrations up to SCHEMA_VERSION.
/// Idempotent and safe to call on every open.
pub fn run(con: &mut Connection) -> Result<()> {
    con.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
    .context("Failed to create meta table")?;

    let current = meta_get_i64(con, "schema_version")?.unwrap_or(0);
    if current >= SCHEMA_VERSION {
        return Ok(());
    }

    tracing::debug!(current, target = SCHEMA_VERSION, "local store schema upgrade");

    let tx = con
        .transaction()
        .context("Failed to start migration transaction")?;

    if current < 1 {
        m_to_v1(&tx)?;
        meta_upsert(&tx, "schema_version", "1")
            .context("Failed to update meta.schema_version to 1")?;
        meta_upsert(&tx, "created_at_utc", &chrono::Utc::now().to_rfc3339())?;
    }

    if current < 2 {
        m_to_v2(&tx)?;
        meta_upsert(&tx, "schema_version", "2")
            .context("Failed to update meta.schema_version to 2")?;
    }

    tx.commit().context("Failed to commit migration")?;
    Ok(())
}
