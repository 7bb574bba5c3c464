//! Console endpoint wrappers

use super::types::{Device, DeviceFilter, DeviceUpdate, ServerGroup};
use crate::auth::ORG_QUERY_PARAM;
use crate::error::{Error, Result};
use crate::http::{Envelope, HttpClient, RequestConfig};
use crate::types::{JsonValue, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Console API root used when the client config sets no base URL
pub const DEFAULT_BASE_URL: &str = "https://console.automox.com/api";

/// Typed access to the console endpoints
#[derive(Debug)]
pub struct ConsoleApi {
    client: HttpClient,
    base_url: String,
}

impl ConsoleApi {
    /// Wrap a client; its base URL (or the public console) roots every path
    pub fn new(client: HttpClient) -> Self {
        let base_url = client
            .config()
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self { client, base_url }
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn scoped(&self) -> RequestConfig {
        RequestConfig::new().query(ORG_QUERY_PARAM, self.client.credential().org_id())
    }

    /// List every device matching the filter
    pub async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>> {
        let mut request = self.scoped();
        filter.apply(&mut request.query);

        let envelope = self
            .client
            .execute_paged(Method::GET, &self.url("servers"), request)
            .await?;
        let devices: Vec<Device> = decode_list(envelope.data, "device list")?;
        info!("Fetched {} device(s)", devices.len());
        Ok(devices)
    }

    /// Fetch one device
    pub async fn get_device(&self, id: i64) -> Result<Device> {
        let envelope = self
            .client
            .execute(Method::GET, &self.url(&format!("servers/{id}")), &self.scoped())
            .await?;

        let data = envelope
            .data
            .ok_or_else(|| Error::decode("device", format!("empty response for device {id}")))?;
        serde_json::from_value(data).map_err(|e| Error::decode("device", e.to_string()))
    }

    /// Apply a partial update to a device
    pub async fn update_device(&self, id: i64, update: &DeviceUpdate) -> Result<Envelope> {
        debug!("Updating device {} with {:?}", id, update);
        let request = self.scoped().json(serde_json::to_value(update)?);
        self.client
            .execute(Method::PUT, &self.url(&format!("servers/{id}")), &request)
            .await
    }

    /// List every server group
    pub async fn list_groups(&self) -> Result<Vec<ServerGroup>> {
        let envelope = self
            .client
            .execute_paged(Method::GET, &self.url("servergroups"), self.scoped())
            .await?;
        let groups: Vec<ServerGroup> = decode_list(envelope.data, "group list")?;
        info!("Fetched {} group(s)", groups.len());
        Ok(groups)
    }

    /// Remove a device from the console
    pub async fn delete_device(&self, id: i64) -> Result<Envelope> {
        debug!("Deleting device {}", id);
        self.client
            .execute(
                Method::DELETE,
                &self.url(&format!("servers/{id}")),
                &self.scoped(),
            )
            .await
    }
}

fn decode_list<T: DeserializeOwned>(data: Option<JsonValue>, what: &str) -> Result<Vec<T>> {
    match data {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|e| Error::decode(what, e.to_string())),
    }
}
