// ── Dashboard facade ──
//
// Wires the two service clients, the data store and the scheduler
// together. The single entry point for consumers.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::debug;

use simcii_api::{Device, InventoryClient, StatisticsClient, TransportConfig};

use crate::aggregate::DashboardAggregate;
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::form::FormController;
use crate::scheduler::{PollingScheduler, RefreshOutcome};
use crate::signal::DashboardSignal;
use crate::store::DataStore;
use crate::stream::SnapshotStream;

/// A running (or ready-to-run) dashboard.
///
/// Cheaply cloneable via `Arc<DashboardInner>`.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    inventory: InventoryClient,
    store: Arc<DataStore>,
    scheduler: PollingScheduler,
}

impl Dashboard {
    /// Build both clients from `config`. Does no I/O.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let transport = config
            .timeout
            .map_or_else(TransportConfig::default, TransportConfig::with_timeout);
        let inventory = InventoryClient::new(config.inventory_url.as_str(), &transport)?;
        let statistics = StatisticsClient::new(config.statistics_url.as_str(), &transport)?;
        Ok(Self::from_clients(config, inventory, statistics))
    }

    /// Assemble a dashboard around existing clients.
    pub fn from_clients(
        config: DashboardConfig,
        inventory: InventoryClient,
        statistics: StatisticsClient,
    ) -> Self {
        let store = Arc::new(DataStore::new());
        let scheduler = PollingScheduler::new(
            inventory.clone(),
            statistics,
            Arc::clone(&store),
            &config,
        );
        debug!(
            inventory = %inventory.base_url(),
            "dashboard assembled"
        );

        Self {
            inner: Arc::new(DashboardInner {
                config,
                inventory,
                store,
                scheduler,
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn scheduler(&self) -> &PollingScheduler {
        &self.inner.scheduler
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start periodic polling and the clock; the startup refresh runs in
    /// the background.
    pub async fn start(&self) {
        self.inner.scheduler.start().await;
    }

    pub async fn stop(&self) {
        self.inner.scheduler.stop().await;
    }

    /// One-shot refresh of both services without starting the timers.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.inner.scheduler.refresh_all().await
    }

    /// A form controller that refreshes this dashboard after mutations.
    pub fn form_controller(&self) -> FormController {
        FormController::new(
            self.inner.inventory.clone(),
            Arc::clone(&self.inner.store),
            Arc::new(self.inner.scheduler.clone()),
            self.inner.config.description_limit,
        )
    }

    // ── Read access ──────────────────────────────────────────────────

    pub fn signals(&self) -> broadcast::Receiver<DashboardSignal> {
        self.inner.store.signals()
    }

    pub fn devices(&self) -> SnapshotStream<Vec<Device>> {
        self.inner.store.subscribe_devices()
    }

    pub fn devices_snapshot(&self) -> Arc<Vec<Device>> {
        self.inner.store.devices_snapshot()
    }

    pub fn aggregate(&self) -> DashboardAggregate {
        self.inner.store.aggregate()
    }

    pub fn aggregate_updates(&self) -> watch::Receiver<DashboardAggregate> {
        self.inner.store.subscribe_aggregate()
    }
}
