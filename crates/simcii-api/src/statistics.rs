// Read-only client for the telemetry statistics service.
//
// Endpoint: GET {base}/estadisticas/zonas -> { "estadisticas": { zona: {...} } }
//
// The service nests each zone's metrics under an `estadisticas` object.
// Metrics placed directly on the zone object are accepted as well.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Metric, ZoneStatistic, ZoneStats};
use crate::response::decode_json;
use crate::transport::{TransportConfig, normalize_base_url};

const ZONE_STATS_PATH: &str = "estadisticas/zonas";

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    estadisticas: Option<HashMap<String, RawZoneStatistic>>,
}

#[derive(Deserialize)]
struct RawZoneStatistic {
    #[serde(default)]
    zona: Option<String>,
    #[serde(default)]
    estadisticas: Option<RawMetrics>,
    #[serde(default)]
    temperatura: Option<RawMetric>,
    #[serde(default)]
    humedad: Option<RawMetric>,
}

#[derive(Deserialize)]
struct RawMetrics {
    #[serde(default)]
    temperatura: Option<RawMetric>,
    #[serde(default)]
    humedad: Option<RawMetric>,
}

#[derive(Deserialize)]
struct RawMetric {
    #[serde(default)]
    promedio: Option<f64>,
}

impl RawMetric {
    fn into_metric(self) -> Option<Metric> {
        self.promedio.map(Metric::new)
    }
}

impl RawZoneStatistic {
    fn into_statistic(self, key: &str) -> ZoneStatistic {
        let (nested_temp, nested_hum) = self
            .estadisticas
            .map_or((None, None), |m| (m.temperatura, m.humedad));

        ZoneStatistic {
            zona: self.zona.unwrap_or_else(|| key.to_owned()),
            temperatura: nested_temp
                .or(self.temperatura)
                .and_then(RawMetric::into_metric),
            humedad: nested_hum.or(self.humedad).and_then(RawMetric::into_metric),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Client for per-zone telemetry aggregates.
///
/// Statistics are best-effort: a non-2xx status is reported as
/// [`ZoneStats::NoData`] instead of an error so that it never blocks the
/// device inventory.
#[derive(Debug, Clone)]
pub struct StatisticsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StatisticsClient {
    /// Build from a base URL such as `http://localhost:8000/api`.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET {base}/estadisticas/zonas`
    pub async fn fetch_zone_stats(&self) -> Result<ZoneStats, Error> {
        let url = self.base_url.join(ZONE_STATS_PATH)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "statistics service returned no data");
            return Ok(ZoneStats::NoData);
        }

        let envelope: StatsEnvelope = decode_json(resp).await?;
        let Some(raw) = envelope.estadisticas else {
            return Ok(ZoneStats::NoData);
        };

        let zones: BTreeMap<String, ZoneStatistic> = raw
            .into_iter()
            .map(|(key, zone)| {
                let stat = zone.into_statistic(&key);
                (key, stat)
            })
            .collect();

        Ok(ZoneStats::Data(zones))
    }
}
