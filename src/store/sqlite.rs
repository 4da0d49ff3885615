use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::store::{Packet, PacketStore, RouterObservation, RouterStore, Sniffer, SnifferStore};

/// Storage backend over the sqlite pool built by [`crate::db::connect`].
/// The distinct-device count is pushed down to the engine.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PacketStore for SqliteStore {
    async fn create_packet(&self, packet: &Packet) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO packets (device_mac, timestamp, rssi, sniffer_mac)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&packet.device_mac)
        .bind(packet.timestamp)
        .bind(packet.rssi)
        .bind(&packet.sniffer_mac)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn packets_by_sniffer_between(
        &self,
        sniffer_mac: &str,
        from: i64,
        until: i64,
    ) -> Result<Vec<Packet>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT device_mac, timestamp, rssi, sniffer_mac
            FROM packets
            WHERE sniffer_mac = ? AND timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp ASC
            "#,
        )
        .bind(sniffer_mac)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
    }

    async fn unique_device_count_between(
        &self,
        sniffer_mac: &str,
        from: i64,
        until: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT device_mac)
            FROM packets
            WHERE sniffer_mac = ? AND timestamp >= ? AND timestamp <= ?
            "#,
        )
        .bind(sniffer_mac)
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await
    }
}

#[async_trait]
impl SnifferStore for SqliteStore {
    async fn create_sniffer(&self, sniffer: &Sniffer) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO sniffers (mac, name, location) VALUES (?, ?, ?)")
            .bind(&sniffer.mac)
            .bind(&sniffer.name)
            .bind(&sniffer.location)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn sniffers(&self) -> Result<Vec<Sniffer>, sqlx::Error> {
        sqlx::query_as("SELECT mac, name, location FROM sniffers ORDER BY mac ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn update_sniffer(&self, sniffer: &Sniffer) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sniffers SET name = ?, location = ? WHERE mac = ?")
            .bind(&sniffer.name)
            .bind(&sniffer.location)
            .bind(&sniffer.mac)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RouterStore for SqliteStore {
    async fn upsert_router(&self, router: &RouterObservation) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO routers (mac, ssid, sniffer_mac, last_seen)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (mac, sniffer_mac)
            DO UPDATE SET ssid = excluded.ssid, last_seen = excluded.last_seen
            "#,
        )
        .bind(&router.mac)
        .bind(&router.ssid)
        .bind(&router.sniffer_mac)
        .bind(router.last_seen)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn routers_by_sniffer(
        &self,
        sniffer_mac: &str,
    ) -> Result<Vec<RouterObservation>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT mac, ssid, sniffer_mac, last_seen
            FROM routers
            WHERE sniffer_mac = ?
            ORDER BY mac ASC
            "#,
        )
        .bind(sniffer_mac)
        .fetch_all(&self.pool)
        .await
    }
}
