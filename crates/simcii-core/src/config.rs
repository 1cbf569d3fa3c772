// ── Runtime dashboard configuration ──
//
// Describes *where* the two services live and how often to poll them.
// Never touches disk: `simcii-config` builds one of these and hands it in.

use std::time::Duration;

use url::Url;

/// Device list / statistics poll cadence.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);
/// Date/time display tick.
pub const DEFAULT_CLOCK_INTERVAL: Duration = Duration::from_millis(1000);
/// Soft limit shown by the description character counter.
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 15;

pub const DEFAULT_INVENTORY_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_STATISTICS_URL: &str = "http://localhost:8000/api";

/// Configuration for a single dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Inventory service base URL (`{base}/dispositivos`).
    pub inventory_url: Url,
    /// Statistics service base URL (`{base}/estadisticas/zonas`).
    pub statistics_url: Url,
    pub refresh_interval: Duration,
    pub clock_interval: Duration,
    pub description_limit: usize,
    /// Per-request timeout. `None` means requests are never cut short.
    pub timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    // Both URLs are compile-time constants that always parse.
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            inventory_url: Url::parse(DEFAULT_INVENTORY_URL).expect("valid default inventory URL"),
            statistics_url: Url::parse(DEFAULT_STATISTICS_URL)
                .expect("valid default statistics URL"),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            clock_interval: DEFAULT_CLOCK_INTERVAL,
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            timeout: None,
        }
    }
}
