//! Field projections over device records.
//!
//! The MAC scan compares `matchAttrValue` against the upper-cased MAC,
//! ignoring ASCII case on both sides, and stops at the first match.

use serde::de::Error as _;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::{BasicDeviceInfo, DetailedDeviceInfo, DeviceRecord};

/// Finds the first record whose `matchAttrValue` is `mac` and projects its
/// identity fields.
pub fn extract_basic_info(records: &[Value], mac: &str) -> Result<BasicDeviceInfo> {
    let record = find_by_mac(records, mac)?;
    let device: DeviceRecord = serde_json::from_value(record.clone())?;
    // A matched record without an id is malformed, not missing.
    let id = device
        .id
        .ok_or_else(|| ApiError::Decode(serde_json::Error::missing_field("id")))?;

    Ok(BasicDeviceInfo {
        id,
        organization_id: device.organization_id,
        location_id: device.location_id,
        workstation: device.node_class,
        name: device.display_name,
        system_name: device.system_name,
        dns_name: device.dns_name,
    })
}

/// Projects a single detailed device record. Absent fields become `None`.
pub fn extract_detailed_info(record: &Value) -> Result<DetailedDeviceInfo> {
    let device: DeviceRecord = serde_json::from_value(record.clone())?;
    let system = device.system.unwrap_or_default();

    Ok(DetailedDeviceInfo {
        id: device.id,
        organization_id: device.organization_id,
        location_id: device.location_id,
        workstation: device.node_class,
        name: system.name,
        system_name: device.system_name,
        dns_name: device.dns_name,
        model: system.model,
        serial_number: system.serial_number,
        chassis_type: system.chassis_type,
        device_type: device.device_type,
        last_logged_user: device.last_logged_in_user,
        uid: device.uid,
    })
}

/// The `devices` array of a search response; a response without one has
/// no matches.
pub fn search_results(response: &Value) -> &[Value] {
    response
        .get("devices")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn find_by_mac<'a>(records: &'a [Value], mac: &str) -> Result<&'a Value> {
    let wanted = mac.to_uppercase();
    records
        .iter()
        .find(|record| {
            record
                .get("matchAttrValue")
                .and_then(Value::as_str)
                .is_some_and(|value| value.eq_ignore_ascii_case(&wanted))
        })
        .ok_or_else(|| ApiError::NotFound(format!("no device with MAC {wanted}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Value> {
        vec![
            json!({
                "id": 101,
                "organizationId": 1,
                "locationId": 10,
                "nodeClass": "WINDOWS_WORKSTATION",
                "displayName": "FRONT-DESK-01",
                "systemName": "FRONT-DESK-01",
                "dnsName": "front-desk-01.corp.local",
                "matchAttrValue": "AA:BB:CC:DD:EE:FF"
            }),
            json!({
                "id": 102,
                "organizationId": 1,
                "locationId": 11,
                "nodeClass": "WINDOWS_SERVER",
                "displayName": "FILESRV",
                "systemName": "FILESRV",
                "dnsName": "filesrv.corp.local",
                "matchAttrValue": "11:22:33:44:55:66"
            }),
        ]
    }

    #[test]
    fn lowercase_mac_matches_uppercase_record() {
        let info = extract_basic_info(&records(), "aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(
            info,
            BasicDeviceInfo {
                id: 101,
                organization_id: Some(1),
                location_id: Some(10),
                workstation: Some("WINDOWS_WORKSTATION".to_string()),
                name: Some("FRONT-DESK-01".to_string()),
                system_name: Some("FRONT-DESK-01".to_string()),
                dns_name: Some("front-desk-01.corp.local".to_string()),
            }
        );
    }

    #[test]
    fn projection_renames_fields() {
        let info = extract_basic_info(&records(), "11:22:33:44:55:66").unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["workstation"], "WINDOWS_SERVER");
        assert_eq!(json["name"], "FILESRV");
        assert_eq!(json["organization_id"], 1);
        assert!(json.get("matchAttrValue").is_none());
    }

    #[test]
    fn unmatched_mac_is_not_found() {
        let err = extract_basic_info(&records(), "de:ad:be:ef:00:01").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn empty_records_are_not_found() {
        assert!(matches!(
            extract_basic_info(&[], "aa:bb:cc:dd:ee:ff"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn first_match_wins() {
        let mut recs = records();
        recs.push(json!({"id": 999, "matchAttrValue": "AA:BB:CC:DD:EE:FF"}));
        assert_eq!(extract_basic_info(&recs, "AA:BB:CC:DD:EE:FF").unwrap().id, 101);
    }

    #[test]
    fn record_without_mac_field_is_skipped() {
        let recs = vec![json!({"id": 5}), records()[1].clone()];
        assert_eq!(extract_basic_info(&recs, "11:22:33:44:55:66").unwrap().id, 102);
    }

    #[test]
    fn malformed_matched_record_is_decode_error() {
        let recs = vec![json!({"id": "not-a-number", "matchAttrValue": "AA:BB:CC:DD:EE:FF"})];
        assert!(matches!(
            extract_basic_info(&recs, "aa:bb:cc:dd:ee:ff"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn matched_record_without_id_is_decode_error() {
        let recs = vec![json!({"matchAttrValue": "AA:BB:CC:DD:EE:FF", "displayName": "x"})];
        match extract_basic_info(&recs, "aa:bb:cc:dd:ee:ff") {
            Err(ApiError::Decode(e)) => assert!(e.to_string().contains("id")),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn detailed_projection_reads_nested_system() {
        let record = json!({
            "id": 101,
            "uid": "0a1b2c3d-0000-4000-8000-000000000101",
            "organizationId": 1,
            "locationId": 10,
            "nodeClass": "WINDOWS_WORKSTATION",
            "displayName": "Front desk",
            "systemName": "FRONT-DESK-01",
            "dnsName": "front-desk-01.corp.local",
            "deviceType": "AGENT",
            "lastLoggedInUser": "CORP\\jdoe",
            "system": {
                "name": "FRONT-DESK-01",
                "model": "OptiPlex 7090",
                "serialNumber": "5CG1234XYZ",
                "chassisType": "DESKTOP",
                "manufacturer": "Dell Inc."
            }
        });
        let info = extract_detailed_info(&record).unwrap();
        assert_eq!(info.id, Some(101));
        assert_eq!(info.name.as_deref(), Some("FRONT-DESK-01"));
        assert_eq!(info.model.as_deref(), Some("OptiPlex 7090"));
        assert_eq!(info.serial_number.as_deref(), Some("5CG1234XYZ"));
        assert_eq!(info.chassis_type.as_deref(), Some("DESKTOP"));
        assert_eq!(info.device_type.as_deref(), Some("AGENT"));
        assert_eq!(info.last_logged_user.as_deref(), Some("CORP\\jdoe"));
        assert_eq!(
            info.uid.as_deref(),
            Some("0a1b2c3d-0000-4000-8000-000000000101")
        );
    }

    #[test]
    fn detailed_projection_tolerates_missing_fields() {
        let info = extract_detailed_info(&json!({"id": 7})).unwrap();
        assert_eq!(info.id, Some(7));
        assert!(info.name.is_none());
        assert!(info.model.is_none());
        assert!(info.last_logged_user.is_none());
    }

    #[test]
    fn search_results_defaults_to_empty() {
        assert!(search_results(&json!({"query": "x"})).is_empty());
        assert_eq!(search_results(&json!({"devices": [{"id": 1}]})).len(), 1);
    }
}
