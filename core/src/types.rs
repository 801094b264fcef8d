//! Domain types for the NinjaOne API.
//!
//! Responses from the `/v2` surface are returned to callers as
//! `serde_json::Value` and never reshaped. The types here cover the few
//! places where the client itself produces or consumes a fixed shape: the
//! activity-log filter, the script-run payload, and the two device
//! projections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DeviceId = u64;
pub type OrganizationId = u64;
pub type LocationId = u64;

/// Page size requested from the activity log when none is given.
pub const DEFAULT_ACTIVITY_PAGE_SIZE: u32 = 200;

/// Optional filters for a device's activity log.
///
/// Empty strings and zero values count as "not set" and are left out of
/// the request. `activity_type` and `status` are upper-cased on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityFilter {
    pub activity_type: Option<String>,
    /// Only activities older than this activity id.
    pub older_than: Option<u64>,
    /// Only activities newer than this activity id.
    pub newer_than: Option<u64>,
    pub status: Option<String>,
    pub page_size: Option<u32>,
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self {
            activity_type: None,
            older_than: None,
            newer_than: None,
            status: None,
            page_size: Some(DEFAULT_ACTIVITY_PAGE_SIZE),
        }
    }
}

impl ActivityFilter {
    /// Query pairs for the filters that are set, in a fixed order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(activity_type) = self.activity_type.as_deref().filter(|s| !s.is_empty()) {
            query.push(("activityType".to_string(), activity_type.to_uppercase()));
        }
        if let Some(older_than) = self.older_than.filter(|&id| id != 0) {
            query.push(("olderThan".to_string(), older_than.to_string()));
        }
        if let Some(newer_than) = self.newer_than.filter(|&id| id != 0) {
            query.push(("newerThan".to_string(), newer_than.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            query.push(("status".to_string(), status.to_uppercase()));
        }
        if let Some(page_size) = self.page_size.filter(|&n| n != 0) {
            query.push(("pageSize".to_string(), page_size.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScriptType {
    /// A built-in action, identified by `uid`.
    Action,
    /// A script from the automation library, identified by `id`.
    Script,
}

/// Body of `POST /v2/device/{id}/script/run`, sent as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRunRequest {
    #[serde(rename = "type")]
    pub run_type: ScriptType,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    #[serde(default)]
    pub parameters: String,
    #[serde(default)]
    pub run_as: String,
}

/// Read-only view of the device-record fields the projections use.
///
/// Every other field of the record is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeviceRecord {
    pub id: Option<u64>,
    pub organization_id: Option<u64>,
    pub location_id: Option<u64>,
    pub node_class: Option<String>,
    pub display_name: Option<String>,
    pub system_name: Option<String>,
    pub dns_name: Option<String>,
    pub device_type: Option<String>,
    pub last_logged_in_user: Option<String>,
    pub uid: Option<String>,
    #[serde(default)]
    pub system: Option<DeviceSystem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeviceSystem {
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub chassis_type: Option<String>,
}

/// Identity of a device found by MAC address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicDeviceInfo {
    pub id: DeviceId,
    pub organization_id: Option<OrganizationId>,
    pub location_id: Option<LocationId>,
    /// The device's node class, e.g. `WINDOWS_WORKSTATION`.
    pub workstation: Option<String>,
    /// The device's display name.
    pub name: Option<String>,
    pub system_name: Option<String>,
    pub dns_name: Option<String>,
}

/// Extended identity of a single device, including hardware details from
/// its `system` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedDeviceInfo {
    pub id: Option<DeviceId>,
    pub organization_id: Option<OrganizationId>,
    pub location_id: Option<LocationId>,
    pub workstation: Option<String>,
    /// `system.name` as reported by the agent.
    pub name: Option<String>,
    pub system_name: Option<String>,
    pub dns_name: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(rename = "chassisType")]
    pub chassis_type: Option<String>,
    pub device_type: Option<String>,
    pub last_logged_user: Option<String>,
    pub uid: Option<String>,
}
