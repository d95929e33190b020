//! HTTP plumbing for the bunq public API
//!
//! bunq wraps every reply in `{"Response": [...]}` where each element is a
//! single-key object such as `{"Id": {"id": 1}}` or `{"Payment": {...}}`.
//! Failures come back as `{"Error": [{"error_description": "..."}]}`.

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::error::{BunqError, Result};
use crate::signing::KeyPair;

pub const HEADER_AUTHENTICATION: &str = "X-Bunq-Client-Authentication";
pub const HEADER_SIGNATURE: &str = "X-Bunq-Client-Signature";
pub const HEADER_REQUEST_ID: &str = "X-Bunq-Client-Request-Id";
pub const HEADER_RESPONSE_ID: &str = "X-Bunq-Client-Response-Id";
const HEADER_LANGUAGE: &str = "X-Bunq-Language";
const HEADER_REGION: &str = "X-Bunq-Region";
const HEADER_GEOLOCATION: &str = "X-Bunq-Geolocation";

const LANGUAGE: &str = "en_US";
const REGION: &str = "nl_NL";
const GEOLOCATION_ZERO: &str = "0 0 0 0 000";

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
struct ResponseEnvelope {
    #[serde(rename = "Response")]
    response: Vec<Value>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "Error")]
    error: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    error_description: String,
}

/// Thin reqwest wrapper bound to one bunq base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    user_agent: String,
}

impl ApiClient {
    /// Create a client for the given base URL (must end in `/`)
    pub fn new(base_url: Url) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url,
            user_agent: format!("bunq-mcp-server/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Signed POST; `auth` is the installation or session token
    pub async fn post(
        &self,
        path: &str,
        body: &Value,
        auth: Option<&str>,
        key_pair: &KeyPair,
    ) -> Result<Vec<Value>> {
        let url = self.base_url.join(path)?;
        let body_bytes = serde_json::to_vec(body)?;
        let signature = key_pair.sign(&body_bytes)?;

        let mut request = self
            .with_common_headers(self.http.post(url.clone()))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(HEADER_SIGNATURE, signature)
            .body(body_bytes);

        if let Some(token) = auth {
            request = request.header(HEADER_AUTHENTICATION, token);
        }

        debug!("POST {}", url);
        self.send(request).await
    }

    /// Authenticated GET with optional query parameters
    pub async fn get(&self, path: &str, query: &[(&str, String)], auth: &str) -> Result<Vec<Value>> {
        let url = self.base_url.join(path)?;

        let mut request = self
            .with_common_headers(self.http.get(url.clone()))
            .header(HEADER_AUTHENTICATION, auth);

        if !query.is_empty() {
            request = request.query(query);
        }

        debug!("GET {}", url);
        self.send(request).await
    }

    fn with_common_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(HEADER_REQUEST_ID, uuid::Uuid::new_v4().to_string())
            .header(HEADER_LANGUAGE, LANGUAGE)
            .header(HEADER_REGION, REGION)
            .header(HEADER_GEOLOCATION, GEOLOCATION_ZERO)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<Value>> {
        let response = request.send().await?;

        let status = response.status();
        let response_id = response
            .headers()
            .get(HEADER_RESPONSE_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;

        debug!("Response status: {} (response id {:?})", status, response_id);

        if status.is_success() {
            parse_response(&text)
        } else {
            error!("bunq request failed with status {}: {}", status, text);
            Err(parse_error(status.as_u16(), &text))
        }
    }
}

/// Parse a success envelope into its item list
pub fn parse_response(text: &str) -> Result<Vec<Value>> {
    let envelope: ResponseEnvelope = serde_json::from_str(text).map_err(|e| {
        BunqError::UnexpectedResponse(format!("Missing Response envelope: {}", e))
    })?;
    Ok(envelope.response)
}

/// Map an error body to [`BunqError::Api`]
pub fn parse_error(status: u16, text: &str) -> BunqError {
    let message = match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(envelope) if !envelope.error.is_empty() => envelope
            .error
            .into_iter()
            .map(|detail| detail.error_description)
            .collect::<Vec<_>>()
            .join("; "),
        _ if text.trim().is_empty() => "empty response body".to_string(),
        _ => text.to_string(),
    };

    BunqError::Api { status, message }
}

/// Inner object of the first item wrapped in `kind`
pub fn extract_object(items: &[Value], kind: &str) -> Result<Value> {
    items
        .iter()
        .find_map(|item| item.get(kind))
        .cloned()
        .ok_or_else(|| BunqError::UnexpectedResponse(format!("No {} object in response", kind)))
}

/// Inner objects of every item wrapped in `kind`, in response order
pub fn extract_list(items: &[Value], kind: &str) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| item.get(kind))
        .cloned()
        .collect()
}

/// The `Id.id` value returned by create calls
pub fn extract_id(items: &[Value]) -> Result<u64> {
    extract_object(items, "Id")?
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| BunqError::UnexpectedResponse("Id object without numeric id".to_string()))
}
