//! In-memory stand-in for the NinjaOne public API.
//!
//! Serves the OAuth2 token endpoint and the `/v2` device-management surface
//! from the fixtures in `fixtures`. Every `/v2` route requires
//! `Authorization: Bearer <ACCESS_TOKEN>`; the token is only issued for
//! `CLIENT_ID` / `CLIENT_SECRET`. Script runs are accepted and recorded so
//! tests can inspect them.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CLIENT_ID: &str = "mock-client-id";
pub const CLIENT_SECRET: &str = "mock-client-secret";
pub const ACCESS_TOKEN: &str = "mock-access-token";

const QUERY_KINDS: [&str; 8] = [
    "network-interfaces",
    "operating-systems",
    "device-health",
    "custom-fields",
    "disks",
    "volumes",
    "logged-on-users",
    "software",
];

/// Body of `POST /v2/device/{id}/script/run` as the mock understands it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRun {
    #[serde(rename = "type")]
    pub run_type: String,
    pub id: Option<i64>,
    pub uid: Option<Uuid>,
    pub parameters: Option<String>,
    pub run_as: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRun {
    pub device_id: u64,
    pub run: ScriptRun,
}

#[derive(Clone, Default)]
pub struct MockState {
    runs: Arc<RwLock<Vec<RecordedRun>>>,
}

impl MockState {
    pub async fn recorded_runs(&self) -> Vec<RecordedRun> {
        self.runs.read().await.clone()
    }
}

#[derive(Deserialize)]
struct TokenForm {
    #[serde(default)]
    grant_type: String,
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
    #[serde(default)]
    scope: String,
}

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/ws/oauth/token", post(issue_token))
        .route("/v2/devices", get(list_devices))
        .route("/v2/devices-detailed", get(list_devices_detailed))
        .route("/v2/devices/search", get(search_devices))
        .route("/v2/device/{id}", get(get_device))
        .route("/v2/device/{id}/activities", get(device_activities))
        .route("/v2/device/{id}/script/run", post(run_script))
        .route("/v2/device/{id}/{resource}", get(device_resource))
        .route("/v2/organization/{id}", get(get_organization))
        .route(
            "/v2/organization/{id}/location/{location}/custom-fields",
            get(location_custom_fields),
        )
        .route("/v2/organization/{id}/{resource}", get(organization_resource))
        .route("/v2/software-products", get(software_products))
        .route("/v2/automation/scripts", get(automation_scripts))
        .route("/v2/queries/{kind}", get(run_query))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn authorize(headers: &HeaderMap) -> Result<(), Failure> {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(failure(StatusCode::UNAUTHORIZED, "invalid_token")),
    }
}

/// Supports the two filter shapes the tests use, `id = N` and `org = N`.
/// Any other expression selects every device.
fn matches_filter(device: &Value, df: Option<&str>) -> bool {
    let Some(df) = df.filter(|s| !s.is_empty()) else {
        return true;
    };
    let mut parts = df.splitn(2, '=').map(str::trim);
    let (Some(field), Some(value)) = (parts.next(), parts.next()) else {
        return true;
    };
    let Ok(value) = value.parse::<u64>() else {
        return true;
    };
    match field {
        "id" => device["id"].as_u64() == Some(value),
        "org" => device["organizationId"].as_u64() == Some(value),
        _ => true,
    }
}

fn filtered_devices(params: &HashMap<String, String>) -> Vec<Value> {
    fixtures::detailed_devices()
        .into_iter()
        .filter(|d| matches_filter(d, params.get("df").map(String::as_str)))
        .collect()
}

async fn issue_token(Form(form): Form<TokenForm>) -> (StatusCode, Json<Value>) {
    if form.grant_type != "client_credentials" {
        return failure(StatusCode::BAD_REQUEST, "unsupported_grant_type");
    }
    if form.client_id != CLIENT_ID || form.client_secret != CLIENT_SECRET {
        return failure(StatusCode::UNAUTHORIZED, "invalid_client");
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": form.scope
        })),
    )
}

async fn list_devices(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    let devices: Vec<Value> = filtered_devices(&params)
        .iter()
        .map(fixtures::basic_view)
        .collect();
    Ok(Json(Value::Array(devices)))
}

async fn list_devices_detailed(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(Value::Array(filtered_devices(&params))))
}

async fn search_devices(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    let q = params.get("q").cloned().unwrap_or_default();
    let needle = q.to_lowercase();
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(usize::MAX);

    let devices: Vec<Value> = fixtures::detailed_devices()
        .iter()
        .filter(|d| {
            !needle.is_empty()
                && ["displayName", "systemName", "dnsName", "matchAttrValue", "lastLoggedInUser"]
                    .iter()
                    .filter_map(|field| d[*field].as_str())
                    .any(|value| value.to_lowercase().contains(&needle))
        })
        .take(limit)
        .map(fixtures::basic_view)
        .collect();

    Ok(Json(json!({ "query": q, "devices": devices })))
}

async fn get_device(headers: HeaderMap, Path(id): Path<u64>) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    fixtures::find_device(id)
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "device not found"))
}

async fn device_resource(
    headers: HeaderMap,
    Path((id, resource)): Path<(u64, String)>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    let device = fixtures::find_device(id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "device not found"))?;
    fixtures::device_resource(&device, &resource)
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "unknown resource"))
}

/// Echoes the filters it received so callers can see what went over the wire.
async fn device_activities(
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    fixtures::find_device(id).ok_or_else(|| failure(StatusCode::NOT_FOUND, "device not found"))?;
    let activity_type = params.get("activityType").map_or("ACTION", String::as_str);
    let status = params.get("status").map_or("COMPLETED", String::as_str);
    Ok(Json(json!({
        "lastActivityId": 5001,
        "activities": [{
            "id": 5001,
            "deviceId": id,
            "activityType": activity_type,
            "status": status
        }],
        "filters": params
    })))
}

async fn run_script(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(run): Json<ScriptRun>,
) -> Result<StatusCode, Failure> {
    authorize(&headers)?;
    fixtures::find_device(id).ok_or_else(|| failure(StatusCode::NOT_FOUND, "device not found"))?;
    match run.run_type.as_str() {
        "ACTION" if run.uid.is_none() => {
            return Err(failure(StatusCode::BAD_REQUEST, "uid is required for ACTION"));
        }
        "SCRIPT" if !run.id.is_some_and(fixtures::script_exists) => {
            return Err(failure(StatusCode::NOT_FOUND, "script not found"));
        }
        "ACTION" | "SCRIPT" => {}
        _ => return Err(failure(StatusCode::BAD_REQUEST, "type must be ACTION or SCRIPT")),
    }
    state.runs.write().await.push(RecordedRun { device_id: id, run });
    Ok(StatusCode::NO_CONTENT)
}

async fn get_organization(headers: HeaderMap, Path(id): Path<u64>) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    if id != fixtures::ORGANIZATION_ID {
        return Err(failure(StatusCode::NOT_FOUND, "organization not found"));
    }
    Ok(Json(fixtures::organization()))
}

async fn organization_resource(
    headers: HeaderMap,
    Path((id, resource)): Path<(u64, String)>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    if id != fixtures::ORGANIZATION_ID {
        return Err(failure(StatusCode::NOT_FOUND, "organization not found"));
    }
    let value = match resource.as_str() {
        "locations" => fixtures::locations(),
        "devices" => Value::Array(
            fixtures::detailed_devices()
                .iter()
                .filter(|d| d["organizationId"].as_u64() == Some(id))
                .map(fixtures::basic_view)
                .collect(),
        ),
        "custom-fields" => json!({ "contractTier": "gold", "billingCode": "ACME-001" }),
        _ => return Err(failure(StatusCode::NOT_FOUND, "unknown resource")),
    };
    Ok(Json(value))
}

async fn location_custom_fields(
    headers: HeaderMap,
    Path((id, location)): Path<(u64, u64)>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    let known = id == fixtures::ORGANIZATION_ID
        && [fixtures::HQ_LOCATION_ID, fixtures::BRANCH_LOCATION_ID].contains(&location);
    if !known {
        return Err(failure(StatusCode::NOT_FOUND, "location not found"));
    }
    Ok(Json(json!({ "siteCode": format!("SITE-{location}") })))
}

async fn software_products(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(fixtures::software_products()))
}

async fn automation_scripts(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(fixtures::automation_scripts()))
}

async fn run_query(
    headers: HeaderMap,
    Path(kind): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    if !QUERY_KINDS.contains(&kind.as_str()) {
        return Err(failure(StatusCode::NOT_FOUND, "unknown query"));
    }
    let results: Vec<Value> = filtered_devices(&params)
        .iter()
        .map(|d| json!({ "deviceId": d["id"], "query": kind, "timestamp": 1_700_000_000.0 }))
        .collect();
    let count = results.len();
    Ok(Json(json!({
        "results": results,
        "cursor": { "name": kind, "offset": 0, "count": count }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_run_deserializes_wire_names() {
        let run: ScriptRun = serde_json::from_str(
            r#"{"type":"SCRIPT","id":12,"parameters":"-Force","runAs":"system"}"#,
        )
        .unwrap();
        assert_eq!(run.run_type, "SCRIPT");
        assert_eq!(run.id, Some(12));
        assert_eq!(run.run_as.as_deref(), Some("system"));
        assert!(run.uid.is_none());
    }

    #[test]
    fn script_run_rejects_malformed_uid() {
        let result: Result<ScriptRun, _> =
            serde_json::from_str(r#"{"type":"ACTION","uid":"not-a-uuid"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn filter_matches_device_id() {
        let device = fixtures::find_device(fixtures::WORKSTATION_ID).unwrap();
        assert!(matches_filter(&device, Some("id = 101")));
        assert!(!matches_filter(&device, Some("id = 102")));
        assert!(matches_filter(&device, Some("org = 1")));
    }

    #[test]
    fn empty_or_unknown_filter_matches_everything() {
        let device = fixtures::find_device(fixtures::SERVER_ID).unwrap();
        assert!(matches_filter(&device, None));
        assert!(matches_filter(&device, Some("")));
        assert!(matches_filter(&device, Some("class in (WINDOWS_SERVER)")));
    }

    #[test]
    fn basic_view_drops_detail_fields() {
        let device = fixtures::find_device(fixtures::WORKSTATION_ID).unwrap();
        let basic = fixtures::basic_view(&device);
        assert_eq!(basic["matchAttrValue"], fixtures::WORKSTATION_MAC);
        assert!(basic.get("system").is_none());
        assert!(basic.get("lastLoggedInUser").is_none());
    }
}
