//! HTTP transport types and the blocking transport used by `NinjaClient`.
//!
//! # Design
//! Requests and responses are plain data. `NinjaClient` builds `HttpRequest`
//! values and interprets `HttpResponse` values; the round-trip itself goes
//! through the `HttpTransport` trait so the client can be driven by an
//! in-memory transport in tests or by the embedding application's own HTTP
//! stack. `UreqTransport` is the default implementation.
//!
//! Status codes are never treated as transport failures here. A 401 or 500
//! is an `HttpResponse` like any other; the client decides what it means.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{ApiError, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` carries scheme, host and path. Query parameters live in `query` and
/// are percent-encoded only when the request is rendered by `full_url`, so
/// a device filter such as `id = 1234` is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders `url` plus the encoded `query` pairs. Pairs are appended to
    /// any query string already present in `url`.
    pub fn full_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes `HttpRequest`s against the network.
///
/// Implementations return `Ok` for every response that arrived, whatever
/// its status, and `ApiError::Transport` only when no response was received.
pub trait HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Default timeout applied to a whole request (connect, send, receive).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `Duration::ZERO` means no timeout.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global((!timeout.is_zero()).then_some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.full_url()?;
        let target = format!("{} {}", request.method, url.path());

        let sent = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url.as_str()), &request.headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(url.as_str()), &request.headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = sent.map_err(|e| ApiError::transport(target.clone(), e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::transport(target, e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url_without_query_is_unchanged() {
        let req = HttpRequest::get("https://api.ninjarmm.com/v2/software-products");
        assert_eq!(
            req.full_url().unwrap().as_str(),
            "https://api.ninjarmm.com/v2/software-products"
        );
    }

    #[test]
    fn full_url_encodes_filter_expression() {
        let mut req = HttpRequest::get("https://api.ninjarmm.com/v2/devices");
        req.query.push(("df".to_string(), "id = 1234".to_string()));
        assert_eq!(
            req.full_url().unwrap().as_str(),
            "https://api.ninjarmm.com/v2/devices?df=id+%3D+1234"
        );
    }

    #[test]
    fn full_url_appends_to_inline_query() {
        let mut req = HttpRequest::get("https://api.ninjarmm.com/v2/devices/search?q=front");
        req.query.push(("limit".to_string(), "5".to_string()));
        assert_eq!(
            req.full_url().unwrap().as_str(),
            "https://api.ninjarmm.com/v2/devices/search?q=front&limit=5"
        );
    }

    #[test]
    fn full_url_rejects_relative_url() {
        let req = HttpRequest::get("/v2/devices");
        assert!(matches!(req.full_url(), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut req = HttpRequest::post("https://api.ninjarmm.com/x", None);
        req.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn success_range_is_2xx() {
        let mut resp = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.status = 302;
        assert!(!resp.is_success());
        resp.status = 199;
        assert!(!resp.is_success());
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let resp = HttpResponse {
            status: 404,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.header("location"), None);
    }

    #[test]
    fn method_display_is_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let transport = UreqTransport::new(Duration::from_millis(500));
        let req = HttpRequest::get("http://127.0.0.1:1/v2/devices");
        let err = transport.execute(&req).unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
