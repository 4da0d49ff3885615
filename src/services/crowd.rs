use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::store::{Packet, PacketStore};
use crate::time::Clock;

pub const DEFAULT_WINDOW_SECONDS: i64 = 5 * 60;

/// Count of distinct device MACs in a set of packets. Order-independent;
/// repeat sightings of the same device count once.
pub fn unique_device_count(packets: &[Packet]) -> usize {
    let mut devices: HashSet<&str> = HashSet::with_capacity(packets.len());
    for packet in packets {
        devices.insert(packet.device_mac.as_str());
    }
    devices.len()
}

/// One occupancy reading: distinct devices sighted by a sniffer within the
/// trailing window ending at `time` (epoch seconds). Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CrowdSample {
    pub count: i64,
    pub time: i64,
}

/// Computes occupancy samples for a sniffer scope. Stateless between calls;
/// the clock only matters for instant-mode sampling.
pub struct CrowdSampler {
    window_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl CrowdSampler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            clock,
        }
    }

    /// Overrides the trailing window length, clamped to at least one second.
    pub fn with_window(mut self, window_seconds: i64) -> Self {
        self.window_seconds = window_seconds.max(1);
        self
    }

    pub fn window_seconds(&self) -> i64 {
        self.window_seconds
    }

    /// Sample over `[at - window, at]`, both ends inclusive.
    pub async fn sample_at(
        &self,
        store: &dyn PacketStore,
        sniffer_mac: &str,
        at: i64,
    ) -> Result<CrowdSample, sqlx::Error> {
        let count = store
            .unique_device_count_between(sniffer_mac, at - self.window_seconds, at)
            .await?;
        Ok(CrowdSample { count, time: at })
    }

    /// Single sample at the clock's current instant.
    pub async fn sample_now(
        &self,
        store: &dyn PacketStore,
        sniffer_mac: &str,
    ) -> Result<CrowdSample, sqlx::Error> {
        let now = self.clock.now().timestamp();
        self.sample_at(store, sniffer_mac, now).await
    }

    /// Samples at `from, from + step, ...` while strictly before `until`,
    /// then always one more exactly at `until`, whether or not `until` lands
    /// on a step boundary. Ascending order. Callers must pass a positive
    /// `step`.
    pub async fn sample_range(
        &self,
        store: &dyn PacketStore,
        sniffer_mac: &str,
        from: i64,
        until: i64,
        step: i64,
    ) -> Result<Vec<CrowdSample>, sqlx::Error> {
        debug_assert!(step > 0, "sample_range requires a positive step");

        let mut samples = Vec::new();
        let mut t = from;
        while t < until {
            samples.push(self.sample_at(store, sniffer_mac, t).await?);
            t += step;
        }
        samples.push(self.sample_at(store, sniffer_mac, until).await?);
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::time::ManualClock;
    use chrono::Duration;

    const SNIFFER: &str = "11:22:00:33:44:55";

    fn packet(device_mac: &str, timestamp: i64) -> Packet {
        Packet {
            device_mac: device_mac.to_string(),
            timestamp,
            rssi: 23.4,
            sniffer_mac: SNIFFER.to_string(),
        }
    }

    /// Five sightings from two distinct devices, all within the last 15
    /// seconds relative to `now`.
    async fn store_with_two_devices(now: i64) -> MemoryStore {
        let store = MemoryStore::default();
        let packets = [
            packet("AA:BB:22:11:44:55", now - 15),
            packet("00:11:CC:CC:44:55", now - 10),
            packet("AA:BB:22:11:44:55", now - 7),
            packet("AA:BB:22:11:44:55", now - 5),
            packet("AA:BB:22:11:44:55", now),
        ];
        for p in &packets {
            store.create_packet(p).await.unwrap();
        }
        store
    }

    fn sampler_at(now: i64) -> CrowdSampler {
        CrowdSampler::new(Arc::new(ManualClock::at_epoch(now)))
    }

    #[test]
    fn unique_count_of_empty_set_is_zero() {
        assert_eq!(unique_device_count(&[]), 0);
    }

    #[test]
    fn repeat_sightings_of_one_device_count_once() {
        let packets: Vec<Packet> = (0..7).map(|i| packet("AA:BB:22:11:44:55", i)).collect();
        assert_eq!(unique_device_count(&packets), 1);
    }

    #[test]
    fn unique_count_is_order_independent() {
        let mut packets = vec![
            packet("aa", 3),
            packet("bb", 1),
            packet("aa", 2),
            packet("cc", 5),
        ];
        assert_eq!(unique_device_count(&packets), 3);
        packets.reverse();
        assert_eq!(unique_device_count(&packets), 3);
    }

    #[test]
    fn default_window_is_five_minutes() {
        let sampler = sampler_at(0);
        assert_eq!(sampler.window_seconds(), 300);
    }

    #[test]
    fn window_override_is_clamped_to_one_second() {
        let sampler = sampler_at(0).with_window(-10);
        assert_eq!(sampler.window_seconds(), 1);
    }

    #[tokio::test]
    async fn instant_sample_counts_distinct_devices_in_window() {
        let now = 3600;
        let store = store_with_two_devices(now).await;
        let sampler = sampler_at(now);

        let sample = sampler.sample_now(&store, SNIFFER).await.unwrap();
        assert_eq!(sample, CrowdSample { count: 2, time: now });
    }

    #[tokio::test]
    async fn instant_sample_equals_explicit_sample_at_now() {
        let now = 3600;
        let store = store_with_two_devices(now).await;
        let sampler = sampler_at(now);

        let via_now = sampler.sample_now(&store, SNIFFER).await.unwrap();
        let via_at = sampler.sample_at(&store, SNIFFER, now).await.unwrap();
        assert_eq!(via_now, via_at);
    }

    #[tokio::test]
    async fn range_steps_then_always_appends_until() {
        let now = 3600;
        let store = store_with_two_devices(now).await;
        let sampler = sampler_at(now).with_window(300);

        let from = now - 20;
        let until = now - 6;
        let samples = sampler
            .sample_range(&store, SNIFFER, from, until, 10)
            .await
            .unwrap();

        assert_eq!(
            samples,
            vec![
                CrowdSample { count: 0, time: from },
                CrowdSample { count: 2, time: from + 10 },
                CrowdSample { count: 2, time: until },
            ]
        );
    }

    #[tokio::test]
    async fn until_on_step_boundary_comes_from_the_final_append() {
        let now = 3600;
        let store = store_with_two_devices(now).await;
        let sampler = sampler_at(now);

        // Stepping is strict-before-until, so the boundary instant is only
        // ever emitted by the trailing append.
        let samples = sampler
            .sample_range(&store, SNIFFER, now - 20, now, 10)
            .await
            .unwrap();

        let times: Vec<i64> = samples.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![now - 20, now - 10, now]);
    }

    #[tokio::test]
    async fn range_element_count_follows_ceil_rule() {
        let store = MemoryStore::default();
        let sampler = sampler_at(0);

        // until - from = 14, step = 4: stepped samples at 0, 4, 8, 12
        // (ceil(14 / 4) = 4 of them) plus the final one at until.
        let samples = sampler
            .sample_range(&store, SNIFFER, 0, 14, 4)
            .await
            .unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples.last().unwrap().time, 14);
    }

    #[tokio::test]
    async fn inverted_range_yields_only_the_until_sample() {
        let store = MemoryStore::default();
        let sampler = sampler_at(0);

        let samples = sampler
            .sample_range(&store, SNIFFER, 100, 50, 10)
            .await
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].time, 50);
    }

    #[tokio::test]
    async fn window_boundaries_are_inclusive() {
        let store = MemoryStore::default();
        store.create_packet(&packet("aa", 100)).await.unwrap();
        store.create_packet(&packet("bb", 400)).await.unwrap();

        let sampler = sampler_at(400).with_window(300);
        let sample = sampler.sample_at(&store, SNIFFER, 400).await.unwrap();
        assert_eq!(sample.count, 2);
    }

    #[tokio::test]
    async fn repeated_queries_on_unchanged_store_are_identical() {
        let now = 3600;
        let store = store_with_two_devices(now).await;
        let sampler = sampler_at(now);

        let first = sampler
            .sample_range(&store, SNIFFER, now - 20, now - 6, 10)
            .await
            .unwrap();
        let second = sampler
            .sample_range(&store, SNIFFER, now - 20, now - 6, 10)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn sampler_scopes_by_sniffer() {
        let now = 3600;
        let store = store_with_two_devices(now).await;
        let sampler = sampler_at(now);

        let sample = sampler.sample_now(&store, "other-sniffer").await.unwrap();
        assert_eq!(sample.count, 0);
    }

    #[tokio::test]
    async fn clock_advance_moves_the_instant_window() {
        let now = 3600;
        let store = store_with_two_devices(now).await;
        let clock = Arc::new(ManualClock::at_epoch(now));
        let sampler = CrowdSampler::new(clock.clone()).with_window(300);

        assert_eq!(sampler.sample_now(&store, SNIFFER).await.unwrap().count, 2);

        // All sightings age out of the five-minute window.
        clock.advance(Duration::seconds(400));
        assert_eq!(sampler.sample_now(&store, SNIFFER).await.unwrap().count, 0);
    }
}
