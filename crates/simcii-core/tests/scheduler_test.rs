#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Integration tests for `PollingScheduler` against wiremock services.

use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use simcii_api::{InventoryClient, StatisticsClient};
use simcii_core::{
    Dashboard, DashboardConfig, DashboardSignal, DeviceId, Reading, RefreshTrigger, StatsOutcome,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn devices_body() -> Value {
    json!([
        { "id": 1, "nombre": "Sensor1", "tipo": "temperatura", "zona": "A", "activo": true },
        { "id": 2, "nombre": "Sensor2", "tipo": "humedad", "zona": "B", "activo": true }
    ])
}

fn stats_body() -> Value {
    json!({
        "estadisticas": {
            "A": { "zona": "A", "estadisticas": { "temperatura": { "promedio": 20.0 } } },
            "B": { "zona": "B", "estadisticas": { "humedad": { "promedio": 50.0 } } },
            "C": { "zona": "C", "estadisticas": { "temperatura": { "promedio": 30.0 } } }
        }
    })
}

async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

fn dashboard(inventory: &MockServer, statistics: &MockServer, refresh: Duration) -> Dashboard {
    dashboard_with_clock(inventory, statistics, refresh, Duration::ZERO)
}

fn dashboard_with_clock(
    inventory: &MockServer,
    statistics: &MockServer,
    refresh: Duration,
    clock: Duration,
) -> Dashboard {
    let inventory_base = format!("{}/api", inventory.uri());
    let statistics_base = format!("{}/api", statistics.uri());

    let config = DashboardConfig {
        inventory_url: Url::parse(&inventory_base).unwrap(),
        statistics_url: Url::parse(&statistics_base).unwrap(),
        refresh_interval: refresh,
        clock_interval: clock,
        ..DashboardConfig::default()
    };
    let inventory = InventoryClient::from_reqwest(&inventory_base, reqwest::Client::new()).unwrap();
    let statistics =
        StatisticsClient::from_reqwest(&statistics_base, reqwest::Client::new()).unwrap();

    Dashboard::from_clients(config, inventory, statistics)
}

// ── Failure isolation ────────────────────────────────────────────────

#[tokio::test]
async fn test_device_failure_does_not_block_statistics() {
    let inventory = MockServer::start().await;
    let statistics = MockServer::start().await;
    mount(&inventory, "/api/dispositivos", ResponseTemplate::new(503)).await;
    mount(
        &statistics,
        "/api/estadisticas/zonas",
        ResponseTemplate::new(200).set_body_json(stats_body()),
    )
    .await;

    let dash = dashboard(&inventory, &statistics, Duration::ZERO);
    let outcome = dash.refresh().await;

    assert!(outcome.devices.is_err());
    match outcome.statistics.unwrap() {
        StatsOutcome::Updated(agg) => {
            assert_eq!(agg.avg_temp, Reading::Available(25.0));
            assert_eq!(agg.temp_zones, 2);
            assert_eq!(agg.avg_humidity, Reading::Available(50.0));
        }
        StatsOutcome::NoData => panic!("expected fresh statistics"),
    }
    assert!(dash.devices_snapshot().is_empty());
    assert_eq!(dash.aggregate().avg_temp, Reading::Available(25.0));
}

#[tokio::test]
async fn test_statistics_failure_does_not_block_devices() {
    let inventory = MockServer::start().await;
    mount(
        &inventory,
        "/api/dispositivos",
        ResponseTemplate::new(200).set_body_json(devices_body()),
    )
    .await;

    // Nothing listening: statistics requests fail at the transport level.
    let config = DashboardConfig {
        inventory_url: Url::parse(&format!("{}/api", inventory.uri())).unwrap(),
        statistics_url: Url::parse("http://127.0.0.1:9/api").unwrap(),
        refresh_interval: Duration::ZERO,
        clock_interval: Duration::ZERO,
        ..DashboardConfig::default()
    };
    let dash = Dashboard::new(config).unwrap();
    let outcome = dash.refresh().await;

    assert_eq!(*outcome.devices.as_ref().unwrap(), 2);
    assert!(outcome.statistics.is_err());
    assert!(!outcome.is_complete());
    assert_eq!(dash.devices_snapshot().len(), 2);
    assert_eq!(dash.aggregate().avg_temp, Reading::Unavailable);
}

// ── Stale data is kept ───────────────────────────────────────────────

#[tokio::test]
async fn test_failed_poll_keeps_previous_state() {
    let inventory = MockServer::start().await;
    let statistics = MockServer::start().await;
    mount(
        &inventory,
        "/api/dispositivos",
        ResponseTemplate::new(200).set_body_json(devices_body()),
    )
    .await;
    mount(
        &statistics,
        "/api/estadisticas/zonas",
        ResponseTemplate::new(200).set_body_json(stats_body()),
    )
    .await;

    let dash = dashboard(&inventory, &statistics, Duration::ZERO);
    assert!(dash.refresh().await.is_complete());
    let before = dash.aggregate();

    inventory.reset().await;
    statistics.reset().await;
    mount(&inventory, "/api/dispositivos", ResponseTemplate::new(500)).await;
    mount(&statistics, "/api/estadisticas/zonas", ResponseTemplate::new(500)).await;

    let outcome = dash.refresh().await;

    assert!(outcome.devices.is_err());
    // A non-2xx statistics response is "no data", not an error.
    assert_eq!(outcome.statistics.unwrap(), StatsOutcome::NoData);
    assert_eq!(dash.devices_snapshot().len(), 2);
    assert_eq!(dash.aggregate(), before);
}

// ── Lifecycle ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_refreshes_before_first_tick() {
    let inventory = MockServer::start().await;
    let statistics = MockServer::start().await;
    mount(
        &inventory,
        "/api/dispositivos",
        ResponseTemplate::new(200).set_body_json(devices_body()),
    )
    .await;
    mount(
        &statistics,
        "/api/estadisticas/zonas",
        ResponseTemplate::new(200).set_body_json(stats_body()),
    )
    .await;

    let dash = dashboard(&inventory, &statistics, Duration::from_secs(3600));
    let mut devices = dash.devices();
    let mut aggregate = dash.aggregate_updates();
    dash.start().await;
    assert!(dash.scheduler().is_running());

    let loaded = tokio::time::timeout(Duration::from_secs(5), devices.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(dash.store().device_by_id(DeviceId(2)).is_some());

    tokio::time::timeout(Duration::from_secs(5), aggregate.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.borrow().avg_temp, Reading::Available(25.0));

    // Starting again is a no-op: no second startup refresh.
    dash.start().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(inventory.received_requests().await.unwrap().len(), 1);

    dash.stop().await;
    assert!(!dash.scheduler().is_running());
}

#[tokio::test]
async fn test_hung_startup_fetch_does_not_hold_back_timers() {
    let inventory = MockServer::start().await;
    let statistics = MockServer::start().await;
    mount(
        &inventory,
        "/api/dispositivos",
        ResponseTemplate::new(200)
            .set_body_json(devices_body())
            .set_delay(Duration::from_secs(30)),
    )
    .await;
    mount(
        &statistics,
        "/api/estadisticas/zonas",
        ResponseTemplate::new(200).set_body_json(stats_body()),
    )
    .await;

    let dash = dashboard_with_clock(
        &inventory,
        &statistics,
        Duration::from_millis(200),
        Duration::from_millis(100),
    );
    let mut signals = dash.signals();

    tokio::time::timeout(Duration::from_secs(1), dash.start())
        .await
        .expect("start() must not wait on the network");

    let mut clocks = 0;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while let Ok(Ok(signal)) = tokio::time::timeout_at(deadline, signals.recv()).await {
        if matches!(signal, DashboardSignal::Clock(_)) {
            clocks += 1;
        }
    }
    assert!(clocks >= 3, "clock ticked {clocks} times while a fetch hung");

    // The refresh timer keeps polling statistics while the device list hangs.
    let stats_polls = statistics.received_requests().await.unwrap().len();
    assert!(stats_polls >= 3, "expected several statistics polls, got {stats_polls}");
    assert!(dash.devices_snapshot().is_empty());
    assert_eq!(dash.aggregate().avg_temp, Reading::Available(25.0));

    tokio::time::timeout(Duration::from_secs(2), dash.stop())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_periodic_refresh_until_stopped() {
    let inventory = MockServer::start().await;
    let statistics = MockServer::start().await;
    mount(
        &inventory,
        "/api/dispositivos",
        ResponseTemplate::new(200).set_body_json(devices_body()),
    )
    .await;
    mount(
        &statistics,
        "/api/estadisticas/zonas",
        ResponseTemplate::new(200).set_body_json(stats_body()),
    )
    .await;

    let dash = dashboard(&inventory, &statistics, Duration::from_millis(50));
    dash.start().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    dash.stop().await;

    let polled = inventory.received_requests().await.unwrap().len();
    assert!(polled >= 3, "expected several polls, got {polled}");

    // Let any fetch spawned just before stop() settle, then confirm no
    // new polls are issued.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = inventory.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(inventory.received_requests().await.unwrap().len(), settled);
}

#[tokio::test]
async fn test_refresh_now_updates_the_store() {
    let inventory = MockServer::start().await;
    let statistics = MockServer::start().await;
    mount(
        &inventory,
        "/api/dispositivos",
        ResponseTemplate::new(200).set_body_json(devices_body()),
    )
    .await;
    mount(&statistics, "/api/estadisticas/zonas", ResponseTemplate::new(500)).await;

    let dash = dashboard(&inventory, &statistics, Duration::ZERO);
    let mut devices = dash.devices();

    dash.scheduler().refresh_now();

    let updated = tokio::time::timeout(Duration::from_secs(5), devices.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.len(), 2);
}

#[tokio::test]
async fn test_later_resolving_refresh_wins() {
    let inventory = MockServer::start().await;
    let statistics = MockServer::start().await;

    // The first listing is slow; every later one answers at once.
    Mock::given(method("GET"))
        .and(path("/api/dispositivos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(devices_body())
                .set_delay(Duration::from_millis(500)),
        )
        .up_to_n_times(1)
        .mount(&inventory)
        .await;
    mount(
        &inventory,
        "/api/dispositivos",
        ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "nombre": "Sensor9", "tipo": "temperatura", "zona": "A", "activo": true }
        ])),
    )
    .await;
    mount(&statistics, "/api/estadisticas/zonas", ResponseTemplate::new(500)).await;

    let dash = dashboard(&inventory, &statistics, Duration::ZERO);
    dash.scheduler().refresh_now();

    // Wait until the slow request is in flight and has claimed the delayed mock.
    tokio::time::timeout(Duration::from_secs(5), async {
        while inventory.received_requests().await.unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    // A faster refresh overtakes it.
    assert_eq!(dash.scheduler().refresh_devices().await.unwrap(), 1);
    assert!(dash.store().device_by_id(DeviceId(9)).is_some());

    // The slow one still completes and, resolving last, replaces the list.
    let mut devices = dash.devices();
    let latest = tokio::time::timeout(Duration::from_secs(5), devices.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.len(), 2);
    assert!(dash.store().device_by_id(DeviceId(9)).is_none());
    assert_eq!(inventory.received_requests().await.unwrap().len(), 2);
}
