// simcii-api: Async Rust clients for the SIMCII inventory and statistics services

pub mod error;
pub mod inventory;
pub mod models;
mod response;
pub mod statistics;
pub mod transport;

pub use error::Error;
pub use inventory::InventoryClient;
pub use models::{Device, DeviceDraft, DeviceId, Metric, ZoneStatistic, ZoneStats};
pub use statistics::StatisticsClient;
pub use transport::TransportConfig;
