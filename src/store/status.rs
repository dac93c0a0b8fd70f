use crate::store::{has_table, kv, migrate::meta_get};
use crate::ui::{error, success, warning};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub const CITY_IMAGE_PREFIX: &str = "cityImage:";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatus {
    pub schema_version: Option<String>,
    pub created_at_utc: Option<String>,
    pub entries: i64,
    pub city_images: i64,
    pub has_session: bool,
    pub has_spotlight: bool,
}

pub fn inspect(con: &Connection) -> Result<StoreStatus> {
    let entries: i64 = con
        .query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0))
        .context("Failed to count rows in table: kv")?;

    Ok(StoreStatus {
        schema_version: meta_get(con, "schema_version")?,
        created_at_utc: meta_get(con, "created_at_utc")?,
        entries,
        city_images: kv::count_prefix(con, CITY_IMAGE_PREFIX)?,
        has_session: kv::get(con, crate::session::AUTH_TOKEN_KEY)?.is_some(),
        has_spotlight: kv::get(con, crate::session::SPOTLIGHT_KEY)?.is_some(),
    })
}

pub fn run(path: &Path) -> Result<()> {
    println!("Store path: {}", path.display());

    if !path.exists() {
        error("Status: MISSING");
        println!("Hint: any command that needs the store (e.g. `plan`) creates it.");
        return Ok(());
    }

    let meta_fs = fs::metadata(path).context("Unable to read store file metadata")?;
    success("Status: OK");
    println!("Size: {} bytes", meta_fs.len());

    let con = Connection::open(path)
        .with_context(|| format!("Unable to open local store: {}", path.display()))?;

    if !has_table(&con, "meta")? || !has_table(&con, "kv")? {
        warning("Warning: store schema is missing (not initialized or not a trip_spotlight store)");
        return Ok(());
    }

    let s = inspect(&con)?;

    println!();
    println!("Meta:");
    println!("  schema_version: {}", s.schema_version.as_deref().unwrap_or("-"));
    println!("  created_at_utc: {}", s.created_at_utc.as_deref().unwrap_or("-"));

    println!();
    println!("Counts:");
    println!("  entries: {}", s.entries);
    println!("  city images: {}", s.city_images);
    println!("  signed in: {}", if s.has_session { "yes" } else { "no" });
    println!(
        "  spotlight data: {}",
        if s.has_spotlight { "present" } else { "-" }
    );

    Ok(())
}
