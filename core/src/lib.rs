//! Synchronous client for the NinjaOne (NinjaRMM) public API.
//!
//! # Overview
//! Obtains an OAuth2 client-credentials token, then issues authenticated
//! requests against the `/v2` device-management surface and returns the
//! decoded JSON bodies untouched. Two projection helpers pick a device out
//! of a search result by MAC address and reduce records to a fixed set of
//! identity fields.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`);
//!   the network round-trip goes through the `HttpTransport` trait, with a
//!   `ureq`-backed `UreqTransport` as the default.
//! - Request shapes are declared once in `Endpoint` and can be inspected
//!   without I/O via `NinjaClient::build_request`.
//! - Every failure is an `ApiError` variant; there are no sentinel returns.
//! - No retries, token refresh, paging or caching.
//!
//! ```no_run
//! use ninja_core::NinjaClient;
//!
//! let client = NinjaClient::new("client-id", "client-secret");
//! client.authenticate()?;
//! let device_id = client.resolve_device_id("aa:bb:cc:dd:ee:ff")?;
//! let disks = client.device_disks(device_id)?;
//! println!("{disks:#}");
//! # Ok::<(), ninja_core::ApiError>(())
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod projection;
pub mod types;

pub use client::NinjaClient;
pub use config::ClientConfig;
pub use endpoints::{Endpoint, QueryKind};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use projection::{extract_basic_info, extract_detailed_info};
pub use types::{
    ActivityFilter, BasicDeviceInfo, DetailedDeviceInfo, DeviceId, LocationId, OrganizationId,
    ScriptRunRequest, ScriptType,
};
