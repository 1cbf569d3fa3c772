// ── Dashboard data store ──
//
// Volatile state shared between the scheduler, the form controller and
// consumers. Every write replaces a whole value; nothing is patched in
// place, so there is no merge logic and the last completed write wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};

use simcii_api::{Device, DeviceId, ZoneStatistic};

use crate::aggregate::{DashboardAggregate, aggregate};
use crate::signal::{DashboardSignal, Notification};
use crate::stream::SnapshotStream;

const SIGNAL_CHANNEL_SIZE: usize = 256;

type ZoneMap = BTreeMap<String, ZoneStatistic>;

/// Thread-safe store for the device cache, zone statistics and aggregate.
///
/// Backed by `watch` channels, so readers never block writers and
/// subscribers see every replacement. Mutations are also broadcast as
/// [`DashboardSignal`]s.
pub struct DataStore {
    devices: watch::Sender<Arc<Vec<Device>>>,
    zone_stats: watch::Sender<Arc<ZoneMap>>,
    aggregate: watch::Sender<DashboardAggregate>,
    last_devices_refresh: watch::Sender<Option<DateTime<Utc>>>,
    last_stats_refresh: watch::Sender<Option<DateTime<Utc>>>,
    signals: broadcast::Sender<DashboardSignal>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    pub fn new() -> Self {
        let (devices, _) = watch::channel(Arc::new(Vec::new()));
        let (zone_stats, _) = watch::channel(Arc::new(BTreeMap::new()));
        let (aggregate, _) = watch::channel(DashboardAggregate::default());
        let (last_devices_refresh, _) = watch::channel(None);
        let (last_stats_refresh, _) = watch::channel(None);
        let (signals, _) = broadcast::channel(SIGNAL_CHANNEL_SIZE);

        Self {
            devices,
            zone_stats,
            aggregate,
            last_devices_refresh,
            last_stats_refresh,
            signals,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn devices_snapshot(&self) -> Arc<Vec<Device>> {
        self.devices.borrow().clone()
    }

    pub fn zone_stats_snapshot(&self) -> Arc<ZoneMap> {
        self.zone_stats.borrow().clone()
    }

    pub fn aggregate(&self) -> DashboardAggregate {
        *self.aggregate.borrow()
    }

    /// Cached copy of a single device.
    pub fn device_by_id(&self, id: DeviceId) -> Option<Device> {
        self.devices.borrow().iter().find(|d| d.id == id).cloned()
    }

    pub fn last_devices_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_devices_refresh.borrow()
    }

    pub fn last_stats_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_stats_refresh.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_devices(&self) -> SnapshotStream<Vec<Device>> {
        SnapshotStream::new(self.devices.subscribe())
    }

    pub fn subscribe_zone_stats(&self) -> SnapshotStream<ZoneMap> {
        SnapshotStream::new(self.zone_stats.subscribe())
    }

    pub fn subscribe_aggregate(&self) -> watch::Receiver<DashboardAggregate> {
        self.aggregate.subscribe()
    }

    pub fn signals(&self) -> broadcast::Receiver<DashboardSignal> {
        self.signals.subscribe()
    }

    // ── Writers ──────────────────────────────────────────────────────

    /// Replace the device cache with a freshly listed set.
    pub(crate) fn apply_devices(&self, devices: Vec<Device>) -> Arc<Vec<Device>> {
        let snapshot = Arc::new(devices);
        self.devices.send_replace(Arc::clone(&snapshot));
        self.last_devices_refresh.send_replace(Some(Utc::now()));
        self.emit(DashboardSignal::DevicesUpdated(Arc::clone(&snapshot)));
        snapshot
    }

    /// Replace zone statistics and recompute the aggregate from them.
    pub(crate) fn apply_zone_stats(&self, zones: ZoneMap) -> DashboardAggregate {
        let derived = aggregate(&zones);
        let snapshot = Arc::new(zones);

        self.zone_stats.send_replace(Arc::clone(&snapshot));
        self.aggregate.send_replace(derived);
        self.last_stats_refresh.send_replace(Some(Utc::now()));

        self.emit(DashboardSignal::ZoneStatsUpdated(snapshot));
        self.emit(DashboardSignal::AggregateUpdated(derived));
        derived
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.emit(DashboardSignal::Notify(notification));
    }

    pub(crate) fn emit(&self, signal: DashboardSignal) {
        // No subscribers is fine: signals are fire-and-forget.
        let _ = self.signals.send(signal);
    }
}
