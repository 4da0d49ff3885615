use async_trait::async_trait;
use std::sync::Mutex;

use crate::services::crowd::unique_device_count;
use crate::store::{Packet, PacketStore, RouterObservation, RouterStore, Sniffer, SnifferStore};

/// In-process storage backend. The distinct-device count deliberately goes
/// through fetch-then-count so tests can prove it equivalent to the SQL
/// `COUNT(DISTINCT ...)` path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    packets: Vec<Packet>,
    sniffers: Vec<Sniffer>,
    routers: Vec<RouterObservation>,
}

#[async_trait]
impl PacketStore for MemoryStore {
    async fn create_packet(&self, packet: &Packet) -> Result<(), sqlx::Error> {
        self.inner
            .lock()
            .expect("store poisoned")
            .packets
            .push(packet.clone());
        Ok(())
    }

    async fn packets_by_sniffer_between(
        &self,
        sniffer_mac: &str,
        from: i64,
        until: i64,
    ) -> Result<Vec<Packet>, sqlx::Error> {
        let inner = self.inner.lock().expect("store poisoned");
        let mut packets: Vec<Packet> = inner
            .packets
            .iter()
            .filter(|p| {
                p.sniffer_mac == sniffer_mac && p.timestamp >= from && p.timestamp <= until
            })
            .cloned()
            .collect();
        packets.sort_by_key(|p| p.timestamp);
        Ok(packets)
    }

    async fn unique_device_count_between(
        &self,
        sniffer_mac: &str,
        from: i64,
        until: i64,
    ) -> Result<i64, sqlx::Error> {
        let packets = self
            .packets_by_sniffer_between(sniffer_mac, from, until)
            .await?;
        Ok(unique_device_count(&packets) as i64)
    }
}

#[async_trait]
impl SnifferStore for MemoryStore {
    async fn create_sniffer(&self, sniffer: &Sniffer) -> Result<(), sqlx::Error> {
        self.inner
            .lock()
            .expect("store poisoned")
            .sniffers
            .push(sniffer.clone());
        Ok(())
    }

    async fn sniffers(&self) -> Result<Vec<Sniffer>, sqlx::Error> {
        Ok(self.inner.lock().expect("store poisoned").sniffers.clone())
    }

    async fn update_sniffer(&self, sniffer: &Sniffer) -> Result<(), sqlx::Error> {
        let mut inner = self.inner.lock().expect("store poisoned");
        for existing in inner.sniffers.iter_mut() {
            if existing.mac == sniffer.mac {
                *existing = sniffer.clone();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RouterStore for MemoryStore {
    async fn upsert_router(&self, router: &RouterObservation) -> Result<(), sqlx::Error> {
        let mut inner = self.inner.lock().expect("store poisoned");
        for existing in inner.routers.iter_mut() {
            if existing.mac == router.mac && existing.sniffer_mac == router.sniffer_mac {
                *existing = router.clone();
                return Ok(());
            }
        }
        inner.routers.push(router.clone());
        Ok(())
    }

    async fn routers_by_sniffer(
        &self,
        sniffer_mac: &str,
    ) -> Result<Vec<RouterObservation>, sqlx::Error> {
        let inner = self.inner.lock().expect("store poisoned");
        Ok(inner
            .routers
            .iter()
            .filter(|r| r.sniffer_mac == sniffer_mac)
            .cloned()
            .collect())
    }
}
