//! Client-side synchronization and aggregation engine for the SIMCII dashboard.
//!
//! This crate sits between `simcii-api` and whatever renders the dashboard
//! (the `simcii` CLI, or any other front end):
//!
//! - **[`Dashboard`]**: Facade that owns both service clients, the
//!   [`DataStore`], and the [`PollingScheduler`]. Hands out
//!   [`FormController`]s and signal subscriptions.
//!
//! - **[`PollingScheduler`]**: Refreshes the device list and zone statistics
//!   once eagerly on [`start()`](PollingScheduler::start), then every 5 s,
//!   plus a 1 s clock tick. [`refresh_now()`](PollingScheduler::refresh_now)
//!   triggers an out-of-band refresh.
//!
//! - **[`DataStore`]**: `watch`-channel backed state. The device cache is
//!   replaced wholesale on every successful poll; zone statistics and the
//!   derived [`DashboardAggregate`] are recomputed from scratch.
//!
//! - **[`aggregate()`]**: Reduces per-zone statistics to dashboard-wide
//!   averages, skipping zones where a metric is absent.
//!
//! - **[`FormController`]** / **[`EditSession`]**: Create/edit/delete
//!   workflow. An open edit holds its own snapshot of the device, so
//!   background refreshes never change it underneath the user.
//!
//! Everything a presentation layer needs to react to is published as a
//! [`DashboardSignal`] on a broadcast channel.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod scheduler;
pub mod session;
pub mod signal;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{
    DashboardAggregate, Reading, aggregate, aggregate_optional, aggregate_zones,
};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use form::{DeletePrompt, DescriptionCounter, FormController, FormInput, FormMode, FormState};
pub use scheduler::{PollingScheduler, RefreshOutcome, RefreshTrigger, StatsOutcome};
pub use session::{EditSession, EditSessionState};
pub use signal::{ClockTick, DashboardSignal, Notification, NotificationLevel};
pub use store::DataStore;
pub use stream::SnapshotStream;

// Wire types are shared with the API crate.
pub use simcii_api::{Device, DeviceDraft, DeviceId, Metric, ZoneStatistic, ZoneStats};
