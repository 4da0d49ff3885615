pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// One observation of a device by a sniffer. Append-only; `device_mac` is an
/// opaque identifier and is never parsed.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Packet {
    pub device_mac: String,
    pub timestamp: i64,
    pub rssi: f64,
    pub sniffer_mac: String,
}

/// A registered recording device. `mac` is the stable primary key.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Sniffer {
    pub mac: String,
    pub name: String,
    pub location: String,
}

/// A nearby access point reported by a sniffer, keyed by `(mac, sniffer_mac)`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RouterObservation {
    pub mac: String,
    pub ssid: String,
    pub sniffer_mac: String,
    pub last_seen: i64,
}

#[async_trait]
pub trait PacketStore: Send + Sync {
    async fn create_packet(&self, packet: &Packet) -> Result<(), sqlx::Error>;

    /// Packets recorded by `sniffer_mac` with `from <= timestamp <= until`,
    /// ascending by timestamp.
    async fn packets_by_sniffer_between(
        &self,
        sniffer_mac: &str,
        from: i64,
        until: i64,
    ) -> Result<Vec<Packet>, sqlx::Error>;

    /// Count of distinct device MACs over the same inclusive filter as
    /// [`packets_by_sniffer_between`](Self::packets_by_sniffer_between).
    async fn unique_device_count_between(
        &self,
        sniffer_mac: &str,
        from: i64,
        until: i64,
    ) -> Result<i64, sqlx::Error>;
}

#[async_trait]
pub trait SnifferStore: Send + Sync {
    async fn create_sniffer(&self, sniffer: &Sniffer) -> Result<(), sqlx::Error>;

    async fn sniffers(&self) -> Result<Vec<Sniffer>, sqlx::Error>;

    /// Full-record replace keyed by `sniffer.mac`. Updating an unknown MAC
    /// is a no-op.
    async fn update_sniffer(&self, sniffer: &Sniffer) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait RouterStore: Send + Sync {
    /// Inserts the router or, when `(mac, sniffer_mac)` is already known,
    /// refreshes its `ssid` and `last_seen`.
    async fn upsert_router(&self, router: &RouterObservation) -> Result<(), sqlx::Error>;

    async fn routers_by_sniffer(
        &self,
        sniffer_mac: &str,
    ) -> Result<Vec<RouterObservation>, sqlx::Error>;
}

/// Everything the HTTP layer needs from a storage backend.
pub trait Store: PacketStore + SnifferStore + RouterStore {}

impl<T: PacketStore + SnifferStore + RouterStore> Store for T {}
