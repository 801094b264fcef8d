//! OAuth2 client-credentials exchange against `/ws/oauth/token`.
//!
//! Split the way the rest of the crate is: `build_token_request` produces
//! the form-encoded POST, `parse_token_response` interprets whatever came
//! back. `NinjaClient::authenticate` wires the two around the transport and
//! stores the token.

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::endpoints::TOKEN_PATH;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse};

/// Form body of the token request.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    scope: &'a str,
}

/// Token endpoint response. `access_token` is optional because an error
/// payload may still arrive with a success status.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    pub error: Option<String>,
}

pub fn build_token_request(config: &ClientConfig) -> Result<HttpRequest> {
    let form = TokenRequest {
        grant_type: "client_credentials",
        client_id: &config.client_id,
        client_secret: &config.client_secret,
        scope: &config.scope,
    };
    let body =
        serde_urlencoded::to_string(&form).map_err(|e| ApiError::Serialization(e.to_string()))?;

    let mut request = HttpRequest::post(format!("{}{TOKEN_PATH}", config.base_url()), Some(body));
    request.headers.push((
        "Content-Type".to_string(),
        "application/x-www-form-urlencoded".to_string(),
    ));
    request
        .headers
        .push(("Accept".to_string(), "application/json".to_string()));
    Ok(request)
}

/// Extracts the access token, mapping every failure shape to `ApiError::Auth`.
pub fn parse_token_response(response: &HttpResponse) -> Result<String> {
    if !response.is_success() {
        return Err(ApiError::auth(format!(
            "invalid client id or secret (HTTP {}): {}",
            response.status, response.body
        )));
    }

    let parsed: TokenResponse = serde_json::from_str(&response.body).map_err(|e| ApiError::Auth {
        message: "token endpoint returned a non-JSON body".to_string(),
        source: Some(Box::new(e)),
    })?;

    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::auth(match parsed.error {
            Some(error) => format!("invalid client id or secret: {error}"),
            None => "invalid client id or secret: no access_token in response".to_string(),
        })),
    }
}
