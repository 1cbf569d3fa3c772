// Wire and domain types shared by both service clients.
//
// Field names follow the services' JSON (Spanish) so serde needs no renames.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── Devices ─────────────────────────────────────────────────────────

/// Server-assigned device identifier. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub i64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for DeviceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A device as stored by the inventory service.
///
/// `descripcion` is best-effort: the backend schema may not persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tipo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zona: String,
    #[serde(default = "default_activo", deserialize_with = "null_as_true")]
    pub activo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

fn default_activo() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|v| v.unwrap_or(true))
}

/// User-supplied fields for creating or updating a device.
///
/// `activo` is always `true`: devices are never created or saved disabled
/// through this path. An empty description is left out of the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDraft {
    pub nombre: String,
    pub tipo: String,
    pub zona: String,
    activo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

impl DeviceDraft {
    pub fn new(
        nombre: impl Into<String>,
        tipo: impl Into<String>,
        zona: impl Into<String>,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            tipo: tipo.into(),
            zona: zona.into(),
            activo: true,
            descripcion: None,
        }
    }

    /// Attach a description. Empty text clears it.
    pub fn with_descripcion(mut self, descripcion: impl Into<String>) -> Self {
        let descripcion = descripcion.into();
        self.descripcion = (!descripcion.is_empty()).then_some(descripcion);
        self
    }

    pub fn activo(&self) -> bool {
        self.activo
    }
}

// ── Zone statistics ─────────────────────────────────────────────────

/// A single aggregated telemetry value over the sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub promedio: f64,
}

impl Metric {
    pub fn new(promedio: f64) -> Self {
        Self { promedio }
    }
}

/// Per-zone statistics. Either metric is absent when the zone had no
/// readings of that kind in the sampling window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatistic {
    pub zona: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperatura: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humedad: Option<Metric>,
}

impl ZoneStatistic {
    pub fn new(zona: impl Into<String>) -> Self {
        Self {
            zona: zona.into(),
            temperatura: None,
            humedad: None,
        }
    }

    pub fn with_temperatura(mut self, promedio: f64) -> Self {
        self.temperatura = Some(Metric::new(promedio));
        self
    }

    pub fn with_humedad(mut self, promedio: f64) -> Self {
        self.humedad = Some(Metric::new(promedio));
        self
    }
}

/// Result of a statistics poll.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneStats {
    /// Statistics keyed by zone name.
    Data(BTreeMap<String, ZoneStatistic>),
    /// The service had nothing to report (non-2xx or empty payload).
    NoData,
}

impl ZoneStats {
    pub fn zones(&self) -> Option<&BTreeMap<String, ZoneStatistic>> {
        match self {
            Self::Data(zones) => Some(zones),
            Self::NoData => None,
        }
    }

    pub fn into_zones(self) -> Option<BTreeMap<String, ZoneStatistic>> {
        match self {
            Self::Data(zones) => Some(zones),
            Self::NoData => None,
        }
    }
}
