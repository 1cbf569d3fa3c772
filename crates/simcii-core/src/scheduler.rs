// ── Polling scheduler ──
//
// Two independent periodic tasks: the data refresh (device list plus zone
// statistics) and the clock. Each refresh tick spawns its fetches as
// separate tasks, so a hung request never delays the timer or the other
// fetch. Overlapping refreshes are allowed; the last one to resolve wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Local;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use simcii_api::{InventoryClient, StatisticsClient, ZoneStats};

use crate::aggregate::DashboardAggregate;
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::signal::{ClockTick, DashboardSignal};
use crate::store::DataStore;

/// Something that can be asked to refresh the dashboard out of band.
///
/// Implemented by [`PollingScheduler`]; the form controller only needs
/// this much of it.
pub trait RefreshTrigger: Send + Sync {
    /// Request an immediate refresh and return without waiting for it.
    fn refresh_now(&self);
}

/// Result of one statistics poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsOutcome {
    /// Fresh statistics were stored and the aggregate recomputed.
    Updated(DashboardAggregate),
    /// The service had nothing to report; the previous aggregate stands.
    NoData,
}

/// Result of a full refresh. The halves are independent: one failing
/// says nothing about the other.
#[derive(Debug)]
pub struct RefreshOutcome {
    /// Number of devices now cached.
    pub devices: Result<usize, CoreError>,
    pub statistics: Result<StatsOutcome, CoreError>,
}

impl RefreshOutcome {
    pub fn is_complete(&self) -> bool {
        self.devices.is_ok() && self.statistics.is_ok()
    }
}

/// Drives periodic polling of both services into the [`DataStore`].
///
/// Cheaply cloneable via `Arc<SchedulerInner>`.
#[derive(Clone)]
pub struct PollingScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    inventory: InventoryClient,
    statistics: StatisticsClient,
    store: Arc<DataStore>,
    refresh_interval: Duration,
    clock_interval: Duration,
    cancel: CancellationToken,
    /// Child token for the current run; replaced on every `start()`.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
    running: AtomicBool,
}

impl PollingScheduler {
    pub fn new(
        inventory: InventoryClient,
        statistics: StatisticsClient,
        store: Arc<DataStore>,
        config: &DashboardConfig,
    ) -> Self {
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(SchedulerInner {
                inventory,
                statistics,
                store,
                refresh_interval: config.refresh_interval,
                clock_interval: config.clock_interval,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
            }),
        }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the periodic refresh and clock tasks, then fire the startup
    /// refresh without waiting for it.
    ///
    /// Returns as soon as the tasks are spawned, so a hung request at
    /// startup never holds back the timers. Calling `start()` on a running
    /// scheduler does nothing. A zero interval disables the corresponding
    /// task.
    pub async fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            debug!("scheduler already running");
            return;
        }

        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        {
            let mut handles = self.inner.task_handles.lock().await;

            if !self.inner.refresh_interval.is_zero() {
                let sched = self.clone();
                let cancel = child.clone();
                let period = self.inner.refresh_interval;
                handles.push(tokio::spawn(refresh_task(sched, period, cancel)));
            }

            if !self.inner.clock_interval.is_zero() {
                let store = Arc::clone(&self.inner.store);
                let period = self.inner.clock_interval;
                handles.push(tokio::spawn(clock_task(store, period, child.clone())));
            }
        }

        self.spawn_refresh(&child);

        info!(
            refresh_ms = self.inner.refresh_interval.as_millis(),
            clock_ms = self.inner.clock_interval.as_millis(),
            "polling started"
        );
    }

    /// Cancel the periodic tasks and wait for them to finish.
    ///
    /// Fetches already in flight are abandoned at their next await point.
    pub async fn stop(&self) {
        // Cancel the child token (not the parent) so `start()` can run again.
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.running.store(false, Ordering::SeqCst);
        debug!("polling stopped");
    }

    // ── Refresh operations ───────────────────────────────────────────

    /// Refresh devices and statistics concurrently and wait for both.
    pub async fn refresh_all(&self) -> RefreshOutcome {
        let (devices, statistics) = tokio::join!(self.refresh_devices(), self.refresh_statistics());
        RefreshOutcome {
            devices,
            statistics,
        }
    }

    /// Replace the device cache with a fresh listing.
    ///
    /// On failure the cached list is left untouched.
    pub async fn refresh_devices(&self) -> Result<usize, CoreError> {
        match self.inner.inventory.list().await {
            Ok(devices) => {
                let snapshot = self.inner.store.apply_devices(devices);
                debug!(count = snapshot.len(), "device list refreshed");
                Ok(snapshot.len())
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "device refresh failed, keeping cached list");
                Err(err)
            }
        }
    }

    /// Replace zone statistics and recompute the aggregate.
    ///
    /// `NoData` and failures both leave the previous aggregate in place.
    pub async fn refresh_statistics(&self) -> Result<StatsOutcome, CoreError> {
        match self.inner.statistics.fetch_zone_stats().await {
            Ok(ZoneStats::Data(zones)) => {
                let count = zones.len();
                let derived = self.inner.store.apply_zone_stats(zones);
                debug!(zones = count, "zone statistics refreshed");
                Ok(StatsOutcome::Updated(derived))
            }
            Ok(ZoneStats::NoData) => {
                debug!("statistics service reported no data, keeping previous aggregate");
                Ok(StatsOutcome::NoData)
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "statistics refresh failed, keeping previous aggregate");
                Err(err)
            }
        }
    }

    /// Spawn one device fetch and one statistics fetch, each bound to the
    /// current run's cancellation token.
    fn spawn_refresh(&self, cancel: &CancellationToken) {
        let sched = self.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                _ = sched.refresh_devices() => {}
            }
        });

        let sched = self.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                _ = sched.refresh_statistics() => {}
            }
        });
    }
}

impl RefreshTrigger for PollingScheduler {
    /// Must be called from within a tokio runtime.
    fn refresh_now(&self) {
        debug!("out-of-band refresh requested");
        // Bound to the parent token so it also runs while stopped.
        self.spawn_refresh(&self.inner.cancel);
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodic data refresh. The immediate first tick is consumed because
/// `start()` fires its own startup refresh.
async fn refresh_task(scheduler: PollingScheduler, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => scheduler.spawn_refresh(&cancel),
        }
    }
}

/// Emit a clock signal immediately and then once per period.
async fn clock_task(store: Arc<DataStore>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                store.emit(DashboardSignal::Clock(ClockTick::at(Local::now())));
            }
        }
    }
}
