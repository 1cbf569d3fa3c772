// ── Outbound dashboard signals ──
//
// Everything the presentation layer reacts to: list and aggregate updates,
// user-facing notifications, and the clock tick.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use strum::{Display, EnumString};

use simcii_api::{Device, ZoneStatistic};

use crate::aggregate::DashboardAggregate;

/// Format used for the date/time display.
pub const CLOCK_FORMAT: &str = "%A, %-d %B %Y - %H:%M:%S";

#[derive(Debug, Clone)]
pub enum DashboardSignal {
    /// The device cache was replaced by a fresh list.
    DevicesUpdated(Arc<Vec<Device>>),
    /// Zone statistics were replaced by a fresh poll.
    ZoneStatsUpdated(Arc<BTreeMap<String, ZoneStatistic>>),
    /// The dashboard-wide averages were recomputed.
    AggregateUpdated(DashboardAggregate),
    /// A mutation succeeded or failed.
    Notify(Notification),
    /// Periodic date/time tick.
    Clock(ClockTick),
}

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClockTick {
    pub now: DateTime<Local>,
    pub label: String,
}

impl ClockTick {
    pub fn at(now: DateTime<Local>) -> Self {
        let label = now.format(CLOCK_FORMAT).to_string();
        Self { now, label }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn clock_label_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 9, 7, 3).unwrap();
        assert_eq!(ClockTick::at(now).label, "Tuesday, 5 March 2024 - 09:07:03");
    }

    #[test]
    fn level_round_trips_through_strings() {
        assert_eq!(NotificationLevel::Error.to_string(), "error");
        assert_eq!(
            "success".parse::<NotificationLevel>().unwrap(),
            NotificationLevel::Success
        );
    }
}
