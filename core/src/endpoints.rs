//! Request shapes for the NinjaOne `/v2` REST surface.
//!
//! # Design
//! Every domain call is a path template plus a handful of query pairs.
//! `Endpoint` names each resource once; `path()` fills in the identifiers
//! and `query()` yields the pairs that are actually set. A device filter
//! (`df`) that is absent or empty produces no pair at all.

use crate::types::{ActivityFilter, DeviceId, LocationId, OrganizationId};

/// Path of the OAuth2 token endpoint, relative to the base URL.
pub const TOKEN_PATH: &str = "/ws/oauth/token";

/// The `/v2/queries/*` family: cross-device reports filtered by `df`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    NetworkInterfaces,
    OperatingSystems,
    DeviceHealth,
    CustomFields,
    Disks,
    Volumes,
    LoggedOnUsers,
    Software,
}

impl QueryKind {
    pub const ALL: [QueryKind; 8] = [
        QueryKind::NetworkInterfaces,
        QueryKind::OperatingSystems,
        QueryKind::DeviceHealth,
        QueryKind::CustomFields,
        QueryKind::Disks,
        QueryKind::Volumes,
        QueryKind::LoggedOnUsers,
        QueryKind::Software,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::NetworkInterfaces => "network-interfaces",
            QueryKind::OperatingSystems => "operating-systems",
            QueryKind::DeviceHealth => "device-health",
            QueryKind::CustomFields => "custom-fields",
            QueryKind::Disks => "disks",
            QueryKind::Volumes => "volumes",
            QueryKind::LoggedOnUsers => "logged-on-users",
            QueryKind::Software => "software",
        }
    }
}

/// A GET resource of the `/v2` surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Devices { filter: Option<&'a str> },
    DevicesDetailed { filter: Option<&'a str> },
    Device(DeviceId),
    SearchDevices { query: &'a str, limit: Option<u32> },
    DeviceJobs(DeviceId),
    LastLoggedOnUser(DeviceId),
    DeviceProcessors(DeviceId),
    DeviceSoftware(DeviceId),
    DeviceVolumes(DeviceId),
    DeviceDashboardUrl(DeviceId),
    DeviceDisks(DeviceId),
    DeviceNetworkInterfaces(DeviceId),
    DeviceCustomFields(DeviceId),
    DeviceActivities(DeviceId, &'a ActivityFilter),
    OrganizationLocations(OrganizationId),
    LocationCustomFields(OrganizationId, LocationId),
    OrganizationDevices(OrganizationId),
    OrganizationCustomFields(OrganizationId),
    Organization(OrganizationId),
    SoftwareProducts,
    AutomationScripts,
    Query(QueryKind, Option<&'a str>),
}

impl Endpoint<'_> {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Devices { .. } => "/v2/devices".to_string(),
            Endpoint::DevicesDetailed { .. } => "/v2/devices-detailed".to_string(),
            Endpoint::Device(id) => format!("/v2/device/{id}"),
            Endpoint::SearchDevices { .. } => "/v2/devices/search".to_string(),
            Endpoint::DeviceJobs(id) => format!("/v2/device/{id}/jobs"),
            Endpoint::LastLoggedOnUser(id) => format!("/v2/device/{id}/last-logged-on-user"),
            Endpoint::DeviceProcessors(id) => format!("/v2/device/{id}/processors"),
            Endpoint::DeviceSoftware(id) => format!("/v2/device/{id}/software"),
            Endpoint::DeviceVolumes(id) => format!("/v2/device/{id}/volumes"),
            Endpoint::DeviceDashboardUrl(id) => format!("/v2/device/{id}/dashboard-url"),
            Endpoint::DeviceDisks(id) => format!("/v2/device/{id}/disks"),
            Endpoint::DeviceNetworkInterfaces(id) => format!("/v2/device/{id}/network-interfaces"),
            Endpoint::DeviceCustomFields(id) => format!("/v2/device/{id}/custom-fields"),
            Endpoint::DeviceActivities(id, _) => format!("/v2/device/{id}/activities"),
            Endpoint::OrganizationLocations(org) => format!("/v2/organization/{org}/locations"),
            Endpoint::LocationCustomFields(org, loc) => {
                format!("/v2/organization/{org}/location/{loc}/custom-fields")
            }
            Endpoint::OrganizationDevices(org) => format!("/v2/organization/{org}/devices"),
            Endpoint::OrganizationCustomFields(org) => {
                format!("/v2/organization/{org}/custom-fields")
            }
            Endpoint::Organization(org) => format!("/v2/organization/{org}"),
            Endpoint::SoftwareProducts => "/v2/software-products".to_string(),
            Endpoint::AutomationScripts => "/v2/automation/scripts".to_string(),
            Endpoint::Query(kind, _) => format!("/v2/queries/{}", kind.as_str()),
        }
    }

    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            Endpoint::Devices { filter }
            | Endpoint::DevicesDetailed { filter }
            | Endpoint::Query(_, filter) => device_filter(*filter),
            Endpoint::SearchDevices { query, limit } => {
                let mut pairs = vec![("q".to_string(), query.to_string())];
                if let Some(limit) = limit {
                    pairs.push(("limit".to_string(), limit.to_string()));
                }
                pairs
            }
            Endpoint::DeviceActivities(_, filter) => filter.to_query(),
            _ => Vec::new(),
        }
    }
}

fn device_filter(filter: Option<&str>) -> Vec<(String, String)> {
    match filter {
        Some(df) if !df.is_empty() => vec![("df".to_string(), df.to_string())],
        _ => Vec::new(),
    }
}

/// Path of the script-run endpoint for a device.
pub fn script_run_path(device_id: DeviceId) -> String {
    format!("/v2/device/{device_id}/script/run")
}
