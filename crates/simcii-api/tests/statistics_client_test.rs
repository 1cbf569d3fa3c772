#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Integration tests for `StatisticsClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use simcii_api::{Metric, StatisticsClient, ZoneStats};

async fn setup() -> (MockServer, StatisticsClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = StatisticsClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

async fn mount_stats(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/estadisticas/zonas"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_nested_service_shape() {
    let (server, client) = setup().await;

    mount_stats(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "estadisticas": {
                "Invernadero": {
                    "zona": "Invernadero",
                    "estadisticas": {
                        "temperatura": { "promedio": 24.5, "maximo": 30.0 },
                        "humedad": { "promedio": 61.0 }
                    }
                },
                "Bodega": {
                    "estadisticas": { "temperatura": { "promedio": 18.0 } }
                }
            }
        })),
    )
    .await;

    let stats = client.fetch_zone_stats().await.unwrap();
    let zones = stats.zones().unwrap();

    assert_eq!(zones.len(), 2);
    let greenhouse = &zones["Invernadero"];
    assert_eq!(greenhouse.temperatura, Some(Metric::new(24.5)));
    assert_eq!(greenhouse.humedad, Some(Metric::new(61.0)));

    // Missing `zona` falls back to the mapping key; missing humidity stays absent.
    let cellar = &zones["Bodega"];
    assert_eq!(cellar.zona, "Bodega");
    assert_eq!(cellar.temperatura.unwrap().promedio, 18.0);
    assert!(cellar.humedad.is_none());
}

#[tokio::test]
async fn test_flat_shape_and_null_promedio() {
    let (server, client) = setup().await;

    mount_stats(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "estadisticas": {
                "A": { "zona": "A", "temperatura": { "promedio": 20.0 }, "humedad": null },
                "B": { "zona": "B", "temperatura": { "promedio": null } }
            }
        })),
    )
    .await;

    let zones = client.fetch_zone_stats().await.unwrap().into_zones().unwrap();

    assert_eq!(zones["A"].temperatura, Some(Metric::new(20.0)));
    assert!(zones["A"].humedad.is_none());
    assert!(zones["B"].temperatura.is_none());
}

#[tokio::test]
async fn test_non_success_status_is_no_data() {
    let (server, client) = setup().await;

    mount_stats(&server, ResponseTemplate::new(500).set_body_string("boom")).await;

    let stats = client.fetch_zone_stats().await.unwrap();
    assert_eq!(stats, ZoneStats::NoData);
}

#[tokio::test]
async fn test_missing_estadisticas_is_no_data() {
    let (server, client) = setup().await;

    mount_stats(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    assert_eq!(client.fetch_zone_stats().await.unwrap(), ZoneStats::NoData);
}

#[tokio::test]
async fn test_empty_mapping_is_data() {
    let (server, client) = setup().await;

    mount_stats(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "estadisticas": {} })),
    )
    .await;

    let stats = client.fetch_zone_stats().await.unwrap();
    assert!(stats.zones().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let (server, client) = setup().await;

    mount_stats(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    assert!(client.fetch_zone_stats().await.is_err());
}
