// Async HTTP client for the device inventory service.
//
// Base path: {base}/dispositivos
// Every call issues exactly one request. No retries, no deduplication.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Device, DeviceDraft, DeviceId};
use crate::response::{decode_json, expect_success};
use crate::transport::{TransportConfig, normalize_base_url};

const DEVICES_PATH: &str = "dispositivos";

/// Typed REST client for device CRUD.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
/// Concurrent calls for the same id are not coordinated; whichever response
/// arrives last reflects the backend's final state.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl InventoryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL such as `http://localhost:8080/api`.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The normalized service base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn collection_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(DEVICES_PATH)?)
    }

    fn item_url(&self, id: DeviceId) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("{DEVICES_PATH}/{id}"))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        decode_json(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        decode_json(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        let resp = self.http.put(url).json(body).send().await?;
        decode_json(resp).await
    }

    async fn delete_empty(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        expect_success(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET {base}/dispositivos`
    pub async fn list(&self) -> Result<Vec<Device>, Error> {
        self.get(self.collection_url()?).await
    }

    /// `POST {base}/dispositivos`
    pub async fn create(&self, draft: &DeviceDraft) -> Result<Device, Error> {
        self.post(self.collection_url()?, draft).await
    }

    /// `PUT {base}/dispositivos/{id}`
    pub async fn update(&self, id: DeviceId, draft: &DeviceDraft) -> Result<Device, Error> {
        self.put(self.item_url(id)?, draft).await
    }

    /// `DELETE {base}/dispositivos/{id}`. The response body is ignored.
    pub async fn delete(&self, id: DeviceId) -> Result<(), Error> {
        self.delete_empty(self.item_url(id)?).await
    }
}
