//! `simcii watch`: run the scheduler and stream dashboard signals.

use tokio::sync::broadcast::error::RecvError;

use simcii_core::{Dashboard, DashboardSignal};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

/// One line per signal, or `None` for signals that are not shown.
fn format_signal(signal: &DashboardSignal, show_clock: bool, color: bool) -> Option<String> {
    match signal {
        DashboardSignal::DevicesUpdated(devices) => {
            let active = devices.iter().filter(|d| d.activo).count();
            Some(format!("Devices: {} ({active} active)", devices.len()))
        }
        DashboardSignal::ZoneStatsUpdated(zones) => {
            Some(format!("Zones reporting: {}", zones.len()))
        }
        DashboardSignal::AggregateUpdated(agg) => Some(format!(
            "Avg temperature: {} | Avg humidity: {}",
            agg.temperature_label(),
            agg.humidity_label()
        )),
        DashboardSignal::Notify(n) => Some(output::paint_level(&n.message, n.level, color)),
        DashboardSignal::Clock(tick) => show_clock.then(|| output::dim(&tick.label, color)),
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    // Subscribe before starting so the startup refresh is printed too.
    let mut signals = dashboard.signals();
    dashboard.start().await;

    if !global.quiet {
        eprintln!(
            "Watching {} and {} (refresh every {} ms, Ctrl-C to stop)",
            dashboard.config().inventory_url,
            dashboard.config().statistics_url,
            dashboard.config().refresh_interval.as_millis()
        );
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = signals.recv() => match received {
                Ok(signal) => {
                    if let Some(line) = format_signal(&signal, args.clock, color) {
                        output::print_output(&line, global.quiet);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "signal consumer lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    dashboard.stop().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use simcii_core::{DashboardAggregate, Notification, Reading};

    use super::*;

    #[test]
    fn aggregate_line_uses_placeholders() {
        let agg = DashboardAggregate {
            avg_temp: Reading::Available(25.0),
            temp_zones: 2,
            ..DashboardAggregate::default()
        };
        let line = format_signal(&DashboardSignal::AggregateUpdated(agg), false, false);
        assert_eq!(
            line.as_deref(),
            Some("Avg temperature: 25.0°C | Avg humidity: --")
        );
    }

    #[test]
    fn clock_is_hidden_unless_requested() {
        let tick = simcii_core::ClockTick::at(chrono::Local::now());
        let signal = DashboardSignal::Clock(tick);
        assert!(format_signal(&signal, false, false).is_none());
        assert!(format_signal(&signal, true, false).is_some());
    }

    #[test]
    fn devices_line_counts_active() {
        let signal = DashboardSignal::DevicesUpdated(Arc::new(Vec::new()));
        assert_eq!(
            format_signal(&signal, false, false).as_deref(),
            Some("Devices: 0 (0 active)")
        );

        let note = DashboardSignal::Notify(Notification::error("Failed to delete device"));
        assert_eq!(
            format_signal(&note, false, false).as_deref(),
            Some("Failed to delete device")
        );
    }
}
