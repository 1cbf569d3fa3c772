//! Zone statistics handler.

use serde::Serialize;
use tabled::Tabled;

use simcii_core::{Dashboard, DashboardAggregate, Metric, Reading, StatsOutcome, ZoneStatistic};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zona: String,
    #[tabled(rename = "Avg Temp")]
    temperatura: String,
    #[tabled(rename = "Avg Humidity")]
    humedad: String,
}

impl From<&ZoneStatistic> for ZoneRow {
    fn from(z: &ZoneStatistic) -> Self {
        Self {
            zona: z.zona.clone(),
            temperatura: metric_label(z.temperatura, "°C"),
            humedad: metric_label(z.humedad, "%"),
        }
    }
}

fn metric_label(metric: Option<Metric>, unit: &str) -> String {
    metric.map_or(Reading::Unavailable, |m| Reading::Available(m.promedio)).label(unit)
}

/// Structured output: the per-zone rows plus the dashboard averages.
#[derive(Serialize)]
struct StatsReport<'a> {
    zones: Vec<&'a ZoneStatistic>,
    aggregate: DashboardAggregate,
}

fn summary(agg: &DashboardAggregate) -> String {
    format!(
        "Average temperature: {} ({} zones)\nAverage humidity:    {} ({} zones)",
        agg.temperature_label(),
        agg.temp_zones,
        agg.humidity_label(),
        agg.humidity_zones
    )
}

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    if let StatsOutcome::NoData = dashboard.scheduler().refresh_statistics().await? {
        if !global.quiet {
            eprintln!("The statistics service has no data yet");
        }
    }

    let zones = dashboard.store().zone_stats_snapshot();
    let aggregate = dashboard.aggregate();
    let list: Vec<&ZoneStatistic> = zones.values().collect();

    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            let rows = output::render_list(
                &global.output,
                &list,
                |z| ZoneRow::from(*z),
                |z| z.zona.clone(),
            )?;
            if matches!(global.output, OutputFormat::Table) {
                format!("{rows}\n{}", summary(&aggregate))
            } else {
                rows
            }
        }
        _ => {
            let report = StatsReport {
                zones: list,
                aggregate,
            };
            output::render_single(&global.output, &report, |_| String::new(), |_| String::new())?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
