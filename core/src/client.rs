//! Blocking client for the NinjaOne (NinjaRMM) public API.
//!
//! # Design
//! `NinjaClient` owns its configuration, the bearer token and an
//! `HttpTransport`. Request shapes come from `Endpoint` and can be inspected
//! without I/O through `build_request`; every GET goes through `fetch`,
//! which enforces the token precondition, checks the status and decodes the
//! body. Script execution is the one call that hands back the raw response.
//!
//! The token sits behind a `RwLock`. `authenticate` takes the write lock
//! only to store a freshly obtained token and no lock is held while a
//! request is in flight, so a client can be shared across threads when its
//! transport allows it.

use std::sync::{PoisonError, RwLock};

use log::{debug, info, warn};
use serde_json::Value;

use crate::auth::{build_token_request, parse_token_response};
use crate::config::ClientConfig;
use crate::endpoints::{script_run_path, Endpoint, QueryKind};
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, UreqTransport};
use crate::projection::{extract_basic_info, extract_detailed_info, search_results};
use crate::types::{
    ActivityFilter, BasicDeviceInfo, DetailedDeviceInfo, DeviceId, LocationId, OrganizationId,
    ScriptRunRequest,
};

pub struct NinjaClient<T = UreqTransport> {
    config: ClientConfig,
    token: RwLock<Option<String>>,
    transport: T,
}

impl NinjaClient<UreqTransport> {
    /// Client for the hosted API at `https://api.ninjarmm.com`.
    pub fn new(client_id: &str, secret_key: &str) -> Self {
        Self::with_config(ClientConfig::new(client_id, secret_key))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> NinjaClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            token: RwLock::new(None),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A copy of the current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Installs a token obtained elsewhere, replacing any current one.
    pub fn set_token(&self, token: &str) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    /// Builder form of `set_token`.
    pub fn with_token(self, token: &str) -> Self {
        self.set_token(token);
        self
    }

    /// Exchanges the client credentials for an access token, stores it and
    /// returns it. On failure the stored token is left untouched.
    pub fn authenticate(&self) -> Result<String> {
        let request = build_token_request(&self.config)?;
        debug!("requesting access token from {}", request.url);

        let response = self.transport.execute(&request)?;
        let token = parse_token_response(&response).inspect_err(|e| {
            warn!("authentication against {} failed: {e}", self.config.base_url());
        })?;

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        info!(
            "authenticated against {} with scope {:?}",
            self.config.base_url(),
            self.config.scope
        );
        Ok(token)
    }

    /// Full URL of a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    /// The GET request `endpoint` maps to, without the `Authorization`
    /// header (that is attached by `fetch`).
    pub fn build_request(&self, endpoint: &Endpoint<'_>) -> HttpRequest {
        let mut request = HttpRequest::get(self.url(&endpoint.path()));
        request.query = endpoint.query();
        request
    }

    fn bearer(&self) -> Result<String> {
        self.token().ok_or(ApiError::MissingToken)
    }

    /// Authenticated GET of `url` with extra query `params`, returning the
    /// decoded JSON body.
    ///
    /// `url` may already carry an inline query string; `params` are appended
    /// to it and must not repeat its keys.
    pub fn fetch(&self, url: &str, params: &[(String, String)]) -> Result<Value> {
        let mut request = HttpRequest::get(url);
        request.query = params.to_vec();
        self.send_json(request)
    }

    fn get(&self, endpoint: Endpoint<'_>) -> Result<Value> {
        self.send_json(self.build_request(&endpoint))
    }

    fn send_json(&self, mut request: HttpRequest) -> Result<Value> {
        let token = self.bearer()?;
        request
            .headers
            .push(("Authorization".to_string(), format!("Bearer {token}")));

        debug!("{} {} {:?}", request.method, request.url, request.query);
        let response = self.transport.execute(&request)?;
        decode_json(&request, response)
    }

    // -- Devices ------------------------------------------------------------

    pub fn basic_devices(&self, device_filter: Option<&str>) -> Result<Value> {
        self.get(Endpoint::Devices {
            filter: device_filter,
        })
    }

    pub fn detailed_devices(&self, device_filter: Option<&str>) -> Result<Value> {
        self.get(Endpoint::DevicesDetailed {
            filter: device_filter,
        })
    }

    pub fn device(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::Device(device_id))
    }

    /// Free-text search over device name, logged-on user, IP address and
    /// similar attributes.
    pub fn search_devices(&self, query: &str, limit: Option<u32>) -> Result<Value> {
        self.get(Endpoint::SearchDevices { query, limit })
    }

    /// Searches for `mac` and returns the identity of the device whose
    /// match attribute equals it.
    pub fn find_device_by_mac(&self, mac: &str) -> Result<BasicDeviceInfo> {
        let response = self.search_devices(mac, None)?;
        extract_basic_info(search_results(&response), mac)
    }

    pub fn resolve_device_id(&self, mac: &str) -> Result<DeviceId> {
        self.find_device_by_mac(mac).map(|info| info.id)
    }

    /// Fetches one device and projects its detailed identity.
    pub fn detailed_device_info(&self, device_id: DeviceId) -> Result<DetailedDeviceInfo> {
        extract_detailed_info(&self.device(device_id)?)
    }

    pub fn device_jobs(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceJobs(device_id))
    }

    pub fn last_logged_on_user(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::LastLoggedOnUser(device_id))
    }

    pub fn device_processors(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceProcessors(device_id))
    }

    pub fn software_inventory(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceSoftware(device_id))
    }

    pub fn device_volumes(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceVolumes(device_id))
    }

    pub fn device_dashboard_url(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceDashboardUrl(device_id))
    }

    pub fn device_disks(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceDisks(device_id))
    }

    pub fn device_network_interfaces(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceNetworkInterfaces(device_id))
    }

    pub fn device_custom_fields(&self, device_id: DeviceId) -> Result<Value> {
        self.get(Endpoint::DeviceCustomFields(device_id))
    }

    pub fn activity_log(&self, device_id: DeviceId, filter: &ActivityFilter) -> Result<Value> {
        self.get(Endpoint::DeviceActivities(device_id, filter))
    }

    // -- Organizations ------------------------------------------------------

    pub fn organization_locations(&self, organization_id: OrganizationId) -> Result<Value> {
        self.get(Endpoint::OrganizationLocations(organization_id))
    }

    pub fn location_custom_fields(
        &self,
        organization_id: OrganizationId,
        location_id: LocationId,
    ) -> Result<Value> {
        self.get(Endpoint::LocationCustomFields(organization_id, location_id))
    }

    pub fn organization_devices(&self, organization_id: OrganizationId) -> Result<Value> {
        self.get(Endpoint::OrganizationDevices(organization_id))
    }

    pub fn organization_custom_fields(&self, organization_id: OrganizationId) -> Result<Value> {
        self.get(Endpoint::OrganizationCustomFields(organization_id))
    }

    pub fn organization_details(&self, organization_id: OrganizationId) -> Result<Value> {
        self.get(Endpoint::Organization(organization_id))
    }

    // -- Catalog ------------------------------------------------------------

    pub fn software_products(&self) -> Result<Value> {
        self.get(Endpoint::SoftwareProducts)
    }

    pub fn automation_scripts(&self) -> Result<Value> {
        self.get(Endpoint::AutomationScripts)
    }

    // -- Cross-device queries -----------------------------------------------

    pub fn query(&self, kind: QueryKind, device_filter: Option<&str>) -> Result<Value> {
        self.get(Endpoint::Query(kind, device_filter))
    }

    pub fn query_network_interfaces(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::NetworkInterfaces, device_filter)
    }

    pub fn query_operating_systems(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::OperatingSystems, device_filter)
    }

    pub fn query_device_health(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::DeviceHealth, device_filter)
    }

    pub fn query_custom_fields(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::CustomFields, device_filter)
    }

    pub fn query_disks(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::Disks, device_filter)
    }

    pub fn query_volumes(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::Volumes, device_filter)
    }

    pub fn query_logged_on_users(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::LoggedOnUsers, device_filter)
    }

    pub fn query_software(&self, device_filter: Option<&str>) -> Result<Value> {
        self.query(QueryKind::Software, device_filter)
    }

    // -- Script execution ---------------------------------------------------

    /// The POST `run_script` sends, without the `Authorization` header.
    pub fn build_run_script(
        &self,
        device_id: DeviceId,
        payload: &ScriptRunRequest,
    ) -> Result<HttpRequest> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = HttpRequest::post(self.url(&script_run_path(device_id)), Some(body));
        request
            .headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        request
            .headers
            .push(("Accept".to_string(), "*/*".to_string()));
        Ok(request)
    }

    /// Runs a script or built-in action on a device.
    ///
    /// Unlike the query methods this returns the raw response: the status
    /// is not checked and the body is not decoded, since the endpoint
    /// answers with an empty body and callers act on the status code.
    pub fn run_script(
        &self,
        device_id: DeviceId,
        payload: &ScriptRunRequest,
    ) -> Result<HttpResponse> {
        let token = self.bearer()?;
        let mut request = self.build_run_script(device_id, payload)?;
        request
            .headers
            .push(("Authorization".to_string(), format!("Bearer {token}")));

        debug!("{} {}", request.method, request.url);
        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            warn!(
                "script run on device {device_id} answered HTTP {}",
                response.status
            );
        }
        Ok(response)
    }
}

fn decode_json(request: &HttpRequest, response: HttpResponse) -> Result<Value> {
    if !response.is_success() {
        warn!(
            "{} {} failed with HTTP {}",
            request.method, request.url, response.status
        );
        return Err(ApiError::HttpStatus {
            status: response.status,
            body: response.body,
        });
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&response.body)?)
}
