use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn get(con: &Connection, key: &str) -> Result<Option<String>> {
    con.query_row("SELECT value FROM kv WHERE key = ?1", [key], |r| r.get(0))
        .optional()
        .with_context(|| format!("Failed to read key: {key}"))
}

pub fn set(con: &Connection, key: &str, value: &str) -> Result<()> {
    con.execute(
        r#"
        INSERT INTO kv(key, value, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        params![key, value, chrono::Utc::now().to_rfc3339()],
    )
    .with_context(|| format!("Failed to write key: {key}"))?;
    Ok(())
}

pub fn remove(con: &Connection, key: &str) -> Result<bool> {
    let n = con
        .execute("DELETE FROM kv WHERE key = ?1", [key])
        .with_context(|| format!("Failed to delete key: {key}"))?;
    Ok(n > 0)
}

pub fn get_json<T: DeserializeOwned>(con: &Connection, key: &str) -> Result<Option<T>> {
    let Some(raw) = get(con, key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Stored value for '{key}' is not valid JSON"))?;
    Ok(Some(value))
}

pub fn set_json<T: Serialize + ?Sized>(con: &Connection, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    set(con, key, &raw)
}

pub fn count_prefix(con: &Connection, prefix: &str) -> Result<i64> {
    let n = con.query_row(
        "SELECT COUNT(*) FROM kv WHERE substr(key, 1, ?2) = ?1",
        params![prefix, prefix.len() as i64],
        |r| r.get(0),
    )?;
    Ok(n)
}

pub fn remove_prefix(con: &Connection, prefix: &str) -> Result<usize> {
    let n = con
        .execute(
            "DELETE FROM kv WHERE substr(key, 1, ?2) = ?1",
            params![prefix, prefix.len() as i64],
        )
        .with_context(|| format!("Failed to delete keys with prefix: {prefix}"))?;
    Ok(n)
}
