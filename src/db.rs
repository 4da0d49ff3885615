use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS packets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_mac TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    rssi REAL NOT NULL,
    sniffer_mac TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_packets_sniffer_timestamp
    ON packets (sniffer_mac, timestamp);
CREATE TABLE IF NOT EXISTS sniffers (
    mac TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    location TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS routers (
    mac TEXT NOT NULL,
    ssid TEXT NOT NULL,
    sniffer_mac TEXT NOT NULL,
    last_seen INTEGER NOT NULL,
    PRIMARY KEY (mac, sniffer_mac)
);
"#;

pub async fn connect(database_path: &str) -> Result<SqlitePool> {
    if let Some(parent) = Path::new(database_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);

    // sqlite cannot handle concurrent writers; a single pooled connection
    // serializes all writes.
    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(8))
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open sqlite database at {database_path}"))
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Seeds the well-known default sniffer when the registry is empty, so a
/// fresh install can ingest packets before any sniffer registers itself.
pub async fn ensure_default_sniffer(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sniffers")
        .fetch_one(pool)
        .await?;
    if count == 0 {
        sqlx::query("INSERT INTO sniffers (mac, name, location) VALUES (?, ?, ?)")
            .bind("00:00:00:00:00:00")
            .bind("default")
            .bind("default")
            .execute(pool)
            .await?;
    }
    Ok(())
}
