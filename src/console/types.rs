//! Console resource types

use crate::types::{JsonObject, StringMap};
use serde::{Deserialize, Deserializer, Serialize};

/// A managed device ("server" in the console API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default)]
    pub server_group_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// ISO-8601 timestamp, `None` while the agent is connected
    #[serde(default)]
    pub last_disconnect_time: Option<String>,
    /// Every other field, kept so listings can print the full object
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// A server group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerGroup {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Partial device update; only the fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_addrs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl DeviceUpdate {
    /// Move a device to another server group
    pub fn group(server_group_id: i64) -> Self {
        Self {
            server_group_id: Some(server_group_id),
            ..Default::default()
        }
    }

    /// Replace a device's tags; the group is resent because the console
    /// requires it on every update
    pub fn tags(tags: Vec<String>, server_group_id: Option<i64>) -> Self {
        Self {
            server_group_id,
            tags: Some(tags),
            ..Default::default()
        }
    }
}

/// Filters accepted by the device list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub group_id: Option<i64>,
    pub ps_version: Option<i64>,
    pub pending: Option<i64>,
    /// Only devices with patches available but not installed
    pub missing_patches: bool,
    pub policy_id: Option<i64>,
    pub exception: Option<i64>,
    pub managed: Option<i64>,
    pub compatible: Option<i64>,
    pub sort_column: Option<String>,
    pub sort_dir: Option<String>,
}

impl DeviceFilter {
    /// Add the filters that are set to a query map
    pub fn apply(&self, query: &mut StringMap) {
        let mut set = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                query.insert(key.to_string(), value);
            }
        };

        set("groupId", self.group_id.map(|v| v.to_string()));
        set("PS_VERSION", self.ps_version.map(|v| v.to_string()));
        set("pending", self.pending.map(|v| v.to_string()));
        set(
            "patchStatus",
            self.missing_patches.then(|| "missing".to_string()),
        );
        set("policyId", self.policy_id.map(|v| v.to_string()));
        set("exception", self.exception.map(|v| v.to_string()));
        set("managed", self.managed.map(|v| v.to_string()));
        set(
            "filters[is_compatible]",
            self.compatible.map(|v| v.to_string()),
        );
        set("sortColumns[]", self.sort_column.clone());
        set("sortDir", self.sort_dir.clone());
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
