// ── Dashboard-wide aggregation ──
//
// Reduces per-zone statistics into a plain arithmetic mean per metric.
// Only the presence of a metric gates inclusion: zero, negative and
// non-finite readings all count.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use simcii_api::{Metric, ZoneStatistic, ZoneStats};

/// Placeholder rendered for a metric with no contributing zones.
pub const UNAVAILABLE_LABEL: &str = "--";

/// A derived metric value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Reading {
    Available(f64),
    #[default]
    Unavailable,
}

impl Reading {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Format with a unit suffix, or the placeholder without one.
    pub fn label(self, unit: &str) -> String {
        match self {
            Self::Available(v) => format!("{v:.1}{unit}"),
            Self::Unavailable => UNAVAILABLE_LABEL.to_owned(),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(v) => write!(f, "{v:.1}"),
            Self::Unavailable => f.write_str(UNAVAILABLE_LABEL),
        }
    }
}

/// Dashboard-wide averages derived from the full zone statistic set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DashboardAggregate {
    pub avg_temp: Reading,
    pub avg_humidity: Reading,
    /// Number of zones that reported a temperature.
    pub temp_zones: usize,
    /// Number of zones that reported a humidity.
    pub humidity_zones: usize,
}

impl DashboardAggregate {
    pub fn temperature_label(&self) -> String {
        self.avg_temp.label("°C")
    }

    pub fn humidity_label(&self) -> String {
        self.avg_humidity.label("%")
    }
}

/// Aggregate a zone mapping as returned by the statistics service.
pub fn aggregate(stats: &BTreeMap<String, ZoneStatistic>) -> DashboardAggregate {
    aggregate_zones(stats.values())
}

/// Aggregate a statistics response; `NoData` gives an all-`Unavailable`
/// aggregate rather than zeros.
pub fn aggregate_optional(stats: &ZoneStats) -> DashboardAggregate {
    match stats {
        ZoneStats::Data(zones) => aggregate(zones),
        ZoneStats::NoData => DashboardAggregate::default(),
    }
}

/// Aggregate zones in any iteration order.
///
/// Contributing values are summed in a canonical (sorted) order, so
/// permuting the input cannot change the result, not even in the last bit.
pub fn aggregate_zones<'a, I>(zones: I) -> DashboardAggregate
where
    I: IntoIterator<Item = &'a ZoneStatistic>,
{
    let mut temps = Vec::new();
    let mut humidities = Vec::new();

    for zone in zones {
        if let Some(Metric { promedio }) = zone.temperatura {
            temps.push(promedio);
        }
        if let Some(Metric { promedio }) = zone.humedad {
            humidities.push(promedio);
        }
    }

    DashboardAggregate {
        temp_zones: temps.len(),
        humidity_zones: humidities.len(),
        avg_temp: mean(temps),
        avg_humidity: mean(humidities),
    }
}

fn mean(mut values: Vec<f64>) -> Reading {
    if values.is_empty() {
        return Reading::Unavailable;
    }
    values.sort_by(f64::total_cmp);

    let count = f64::from(u32::try_from(values.len()).unwrap_or(u32::MAX));
    let sum: f64 = values.iter().sum();
    Reading::Available(round_one_decimal(sum / count))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
