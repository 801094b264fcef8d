//! Canned NinjaOne data served by the mock.
//!
//! One organization with two locations and two devices. Device records use
//! the field names of the real `/v2/devices-detailed` payload.

use serde_json::{json, Value};

pub const ORGANIZATION_ID: u64 = 1;
pub const HQ_LOCATION_ID: u64 = 10;
pub const BRANCH_LOCATION_ID: u64 = 11;

pub const WORKSTATION_ID: u64 = 101;
pub const WORKSTATION_MAC: &str = "AA:BB:CC:DD:EE:FF";
pub const SERVER_ID: u64 = 102;
pub const SERVER_MAC: &str = "11:22:33:44:55:66";

/// Script id present in the automation library.
pub const LIBRARY_SCRIPT_ID: i64 = 12;

pub fn detailed_devices() -> Vec<Value> {
    vec![
        json!({
            "id": WORKSTATION_ID,
            "uid": "0a1b2c3d-0000-4000-8000-000000000101",
            "organizationId": ORGANIZATION_ID,
            "locationId": HQ_LOCATION_ID,
            "nodeClass": "WINDOWS_WORKSTATION",
            "nodeRoleId": 1,
            "approvalStatus": "APPROVED",
            "offline": false,
            "displayName": "Front desk",
            "systemName": "FRONT-DESK-01",
            "dnsName": "front-desk-01.corp.local",
            "matchAttrValue": WORKSTATION_MAC,
            "deviceType": "AGENT",
            "lastLoggedInUser": "CORP\\jdoe",
            "system": {
                "name": "FRONT-DESK-01",
                "manufacturer": "Dell Inc.",
                "model": "OptiPlex 7090",
                "serialNumber": "5CG1234XYZ",
                "chassisType": "DESKTOP"
            }
        }),
        json!({
            "id": SERVER_ID,
            "uid": "0a1b2c3d-0000-4000-8000-000000000102",
            "organizationId": ORGANIZATION_ID,
            "locationId": BRANCH_LOCATION_ID,
            "nodeClass": "WINDOWS_SERVER",
            "nodeRoleId": 2,
            "approvalStatus": "APPROVED",
            "offline": true,
            "displayName": "File server",
            "systemName": "FILESRV",
            "dnsName": "filesrv.corp.local",
            "matchAttrValue": SERVER_MAC,
            "deviceType": "AGENT",
            "lastLoggedInUser": "CORP\\administrator",
            "system": {
                "name": "FILESRV",
                "manufacturer": "HPE",
                "model": "ProLiant DL360 Gen10",
                "serialNumber": "CZJ0000001",
                "chassisType": "RACK_MOUNT"
            }
        }),
    ]
}

const BASIC_FIELDS: [&str; 12] = [
    "id",
    "uid",
    "organizationId",
    "locationId",
    "nodeClass",
    "nodeRoleId",
    "approvalStatus",
    "offline",
    "displayName",
    "systemName",
    "dnsName",
    "matchAttrValue",
];

/// The `/v2/devices` view of a detailed record.
pub fn basic_view(device: &Value) -> Value {
    let mut basic = serde_json::Map::new();
    for field in BASIC_FIELDS {
        if let Some(value) = device.get(field) {
            basic.insert(field.to_string(), value.clone());
        }
    }
    Value::Object(basic)
}

pub fn find_device(id: u64) -> Option<Value> {
    detailed_devices()
        .into_iter()
        .find(|d| d["id"].as_u64() == Some(id))
}

/// Per-device sub-resources, keyed by the last path segment.
pub fn device_resource(device: &Value, resource: &str) -> Option<Value> {
    let id = device["id"].as_u64().unwrap_or_default();
    let value = match resource {
        "jobs" => json!([{
            "uid": "7c1e8b0a-0000-4000-8000-000000000001",
            "deviceId": id,
            "jobStatus": "IN_PROCESS",
            "jobType": "SOFTWARE_PATCH_MANAGEMENT"
        }]),
        "last-logged-on-user" => json!({
            "userName": device["lastLoggedInUser"],
            "logonTime": 1_700_000_000.0
        }),
        "processors" => json!([{
            "name": "Intel(R) Core(TM) i7-11700",
            "numCores": 8,
            "numLogicalCores": 16,
            "clockSpeed": 2_500_000_000u64
        }]),
        "software" => json!([
            {"name": "7-Zip 23.01 (x64)", "publisher": "Igor Pavlov", "version": "23.01"},
            {"name": "Google Chrome", "publisher": "Google LLC", "version": "120.0.6099.130"}
        ]),
        "volumes" => json!([{
            "name": "C:",
            "driveLetter": "C:",
            "fileSystem": "NTFS",
            "capacity": 511_000_000_000u64,
            "freeSpace": 203_000_000_000u64
        }]),
        "dashboard-url" => json!({
            "url": format!("https://app.ninjarmm.com/#/deviceDashboard/{id}/overview")
        }),
        "disks" => json!([{
            "model": "NVMe PC SN730 512GB",
            "mediaType": "Fixed hard disk media",
            "size": 512_110_190_592u64,
            "status": "OK"
        }]),
        "network-interfaces" => json!([{
            "adapterName": "Intel(R) Ethernet Connection",
            "interfaceName": "Ethernet",
            "macAddress": [device["matchAttrValue"]],
            "ipAddress": ["10.0.0.21"]
        }]),
        "custom-fields" => json!({
            "assetTag": format!("ASSET-{id}"),
            "warrantyExpires": "2027-03-31"
        }),
        _ => return None,
    };
    Some(value)
}

pub fn organization() -> Value {
    json!({
        "id": ORGANIZATION_ID,
        "name": "Acme Corp",
        "description": "Managed since 2019",
        "nodeApprovalMode": "AUTOMATIC",
        "locations": locations()
    })
}

pub fn locations() -> Value {
    json!([
        {"id": HQ_LOCATION_ID, "name": "Headquarters", "address": "1 Main St"},
        {"id": BRANCH_LOCATION_ID, "name": "Branch office", "address": "22 Side Rd"}
    ])
}

pub fn software_products() -> Value {
    json!([
        {
            "id": "b2f3c4d5-0000-4000-8000-000000000001",
            "name": "Google Chrome",
            "publisher": "Google LLC"
        },
        {
            "id": "b2f3c4d5-0000-4000-8000-000000000002",
            "name": "Mozilla Firefox",
            "publisher": "Mozilla"
        }
    ])
}

pub fn automation_scripts() -> Value {
    json!([
        {
            "id": LIBRARY_SCRIPT_ID,
            "name": "Clear temp files",
            "language": "powershell",
            "operatingSystems": ["WINDOWS"]
        },
        {
            "id": 13,
            "name": "Restart print spooler",
            "language": "batchfile",
            "operatingSystems": ["WINDOWS"]
        }
    ])
}

pub fn script_exists(id: i64) -> bool {
    automation_scripts()
        .as_array()
        .is_some_and(|scripts| scripts.iter().any(|s| s["id"].as_i64() == Some(id)))
}
