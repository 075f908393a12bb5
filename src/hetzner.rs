//! Hetzner DNS API client
//!
//! Uses reqwest with rustls for HTTP requests. Every call is a single round
//! trip carrying the `Auth-API-Token` header; nothing is retried.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;
use zeroize::Zeroizing;

use crate::constants::{
    HETZNAME_USER_AGENT, HETZNER_AUTH_HEADER, LIST_PAGE_SIZE, MAX_ERROR_BODY_CHARS,
    MAX_LIST_PAGES,
};
use crate::dns_provider::DnsApi;
use crate::error::TransportError;
use crate::types::{Record, RecordPayload, Zone};

//==============================================================================
// Client
//==============================================================================

pub struct HetznerClient {
    api_token: Zeroizing<String>,
    api_base: String,
    client: reqwest::Client,
}

impl fmt::Debug for HetznerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HetznerClient")
            .field("api_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HetznerClient {
    pub fn new(api_token: &str, api_base: &str, timeout: Duration) -> Result<Self, TransportError> {
        let api_base = api_base.trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(HETZNAME_USER_AGENT)
            .build()
            .map_err(|source| TransportError::Network {
                path: api_base.clone(),
                source,
            })?;

        Ok(Self {
            api_token: Zeroizing::new(api_token.to_string()),
            api_base,
            client,
        })
    }

    /// Performs one authenticated request and returns the parsed JSON body
    ///
    /// The body is read chunk by chunk and concatenated in arrival order
    /// before parsing. Non-2xx statuses become `TransportError::Http` with
    /// the provider's message when it sent one.
    pub async fn perform(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.api_base, path);
        debug!("{} {}", method, path);

        let mut request = self
            .client
            .request(method, &url)
            .header(HETZNER_AUTH_HEADER, self.api_token.as_str());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let mut resp = request
            .send()
            .await
            .map_err(|source| TransportError::Network {
                path: path.to_string(),
                source,
            })?;
        let status = resp.status();

        let mut buf = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|source| TransportError::Network {
                path: path.to_string(),
                source,
            })?
        {
            buf.extend_from_slice(&chunk);
        }
        debug!("{} -> {} ({} bytes)", path, status.as_u16(), buf.len());

        if !status.is_success() {
            return Err(TransportError::Http {
                path: path.to_string(),
                status: status.as_u16(),
                message: api_error_message(&buf),
            });
        }

        serde_json::from_slice(&buf).map_err(|e| TransportError::parse(path, e))
    }

    /// Fetches every page of a listing endpoint
    async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        filter: &[(&str, String)],
    ) -> Result<Vec<T>, TransportError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;
        loop {
            let mut query = filter.to_vec();
            query.push(("page", page.to_string()));
            query.push(("per_page", LIST_PAGE_SIZE.to_string()));

            let body = self.perform(Method::GET, path, &query, None).await?;
            let last_page = last_page(&body);
            let mut batch: Vec<T> = extract(path, body, key)?;
            items.append(&mut batch);

            if page >= last_page {
                break;
            }
            if page >= MAX_LIST_PAGES {
                warn!("{} reports {} pages, stopping after {}", path, last_page, page);
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

#[async_trait]
impl DnsApi for HetznerClient {
    async fn list_zones(&self) -> Result<Vec<Zone>, TransportError> {
        self.list_all("/zones", "zones", &[]).await
    }

    async fn get_zone(&self, zone_id: &str) -> Result<Zone, TransportError> {
        let path = format!("/zones/{}", encode(zone_id));
        let body = self.perform(Method::GET, &path, &[], None).await?;
        extract(&path, body, "zone")
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<Record>, TransportError> {
        self.list_all("/records", "records", &[("zone_id", zone_id.to_string())])
            .await
    }

    async fn get_record(&self, record_id: &str) -> Result<Record, TransportError> {
        let path = format!("/records/{}", encode(record_id));
        let body = self.perform(Method::GET, &path, &[], None).await?;
        extract(&path, body, "record")
    }

    async fn create_record(&self, payload: &RecordPayload) -> Result<Record, TransportError> {
        let path = "/records";
        let json = serde_json::to_value(payload).map_err(|e| TransportError::parse(path, e))?;
        let body = self.perform(Method::POST, path, &[], Some(&json)).await?;
        extract(path, body, "record")
    }

    async fn update_record(
        &self,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<Record, TransportError> {
        let path = format!("/records/{}", encode(record_id));
        let json = serde_json::to_value(payload).map_err(|e| TransportError::parse(&path, e))?;
        let body = self.perform(Method::PUT, &path, &[], Some(&json)).await?;
        extract(&path, body, "record")
    }
}

//==============================================================================
// Response helpers
//==============================================================================

/// Deserializes the object stored under `key` in a response envelope
fn extract<T: DeserializeOwned>(path: &str, mut body: Value, key: &str) -> Result<T, TransportError> {
    let item = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| TransportError::parse(path, format!("missing '{}' field", key)))?;
    serde_json::from_value(item).map_err(|e| TransportError::parse(path, e))
}

/// Reads `meta.pagination.last_page`; a listing without it is one page
fn last_page(body: &Value) -> u32 {
    body.pointer("/meta/pagination/last_page")
        .and_then(Value::as_u64)
        .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

/// Pulls a human-readable message out of an error response body
///
/// The API answers either `{"error": {"message": ...}}` or
/// `{"message": ...}`; anything else is quoted, truncated.
fn api_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<ErrorDetail>,
        message: Option<String>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        let message = parsed
            .error
            .and_then(|e| e.message)
            .or(parsed.message)
            .filter(|m| !m.trim().is_empty());
        if let Some(message) = message {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "empty response body".to_string()
    } else {
        text.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

//==============================================================================
// Tests
//==============================================================================
