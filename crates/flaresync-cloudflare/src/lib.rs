// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `DnsProvider`.
//
// ## Behaviour
//
// - One logical API operation per trait call; listings walk every page
// - Every request carries a bounded timeout (10 seconds)
// - HTTP status codes are mapped to specific messages (401/403, 404, 409, 429, 5xx)
// - ❌ NO retry logic (a failed call is reported; the next cycle retries)
// - ❌ NO dry-run handling (the core executor never calls `update_record`
//   in dry-run mode)
// - ❌ NO caching between calls
//
// ## Security Requirements
//
// - API token NEVER appears in logs, errors, or `Debug` output
// - Construction fails if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?page=N&per_page=50`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&page=N&per_page=50`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use flaresync_core::model::{DnsRecord, RecordPayload, Zone};
use flaresync_core::traits::DnsProvider;
use flaresync_core::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size for listing calls
const PAGE_SIZE: u32 = 50;

/// Provider name used in errors and logs
const PROVIDER: &str = "cloudflare";

/// Standard Cloudflare response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Pagination block of a listing response
#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: u32,
}

/// Cloudflare DNS provider
///
/// Stateless: holds only the token, base URL and HTTP client.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API root, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider against the public Cloudflare API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    ///
    /// # Returns
    ///
    /// - `Ok(CloudflareProvider)`
    /// - `Err(Error::Config)`: Empty token, or the HTTP client could not be built
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a provider against a custom API root (e.g. a local mock server)
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// API root this provider talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every page of a listing endpoint
    ///
    /// Pages are requested until `result_info.total_pages` is reached. A
    /// response without `result_info` is treated as the only page.
    ///
    /// # Parameters
    ///
    /// - `path`: Path below the API root, e.g. `/zones`
    /// - `filters`: Extra query parameters, e.g. `[("type", "A")]`
    /// - `action`: What is being listed (for error messages)
    async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, &str)],
        action: &str,
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_param = page.to_string();
            let per_page_param = PAGE_SIZE.to_string();
            let mut query: Vec<(&str, &str)> = filters.to_vec();
            query.push(("page", &page_param));
            query.push(("per_page", &per_page_param));

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.api_token)
                .query(&query)
                .send()
                .await
                .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

            let envelope: Envelope<Vec<T>> = parse_envelope(response, action).await?;
            let batch = envelope.result.unwrap_or_default();
            let batch_len = batch.len();
            items.extend(batch);

            let total_pages = match envelope.result_info {
                Some(info) if info.total_pages > 0 => info.total_pages,
                _ => break,
            };

            tracing::debug!("{}: page {}/{} ({} item(s))", action, page, total_pages, batch_len);

            if page >= total_pages || batch_len == 0 {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

/// Check status and envelope of a response and decode its body
async fn parse_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
    action: &str,
) -> Result<Envelope<T>> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        return Err(status_error(status, &error_text, action));
    }

    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

    if !envelope.success {
        return Err(Error::provider(
            PROVIDER,
            format!("{} failed: {}", action, describe(&envelope.errors)),
        ));
    }

    Ok(envelope)
}

/// Map a non-success status to a provider error
fn status_error(status: StatusCode, error_text: &str, action: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
            status
        ),
        404 => format!("{} failed: resource not found. Status: {}", action, status),
        409 => format!(
            "Conflict: Record is being updated by another process. Status: {}",
            status
        ),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!(
            "Cloudflare server error (transient): {} - {}",
            status, error_text
        ),
        _ => format!("{} failed: {} - {}", action, status, error_text),
    };
    Error::provider(PROVIDER, message)
}

fn describe(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "unknown error".to_string();
    }
    errors
        .iter()
        .map(|e| format!("[{}] {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// ```http
    /// GET /zones?page=1&per_page=50
    /// Authorization: Bearer <token>
    /// ```
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.list_all("/zones", &[], "Zone listing").await
    }

    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&page=1&per_page=50
    /// Authorization: Bearer <token>
    /// ```
    async fn list_a_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.list_all(
            &format!("/zones/{}/dns_records", zone_id),
            &[("type", "A")],
            "Record listing",
        )
        .await
    }

    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// { "type": "A", "name": "...", "content": "1.2.3.4", "ttl": 1, "proxied": false }
    /// ```
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<()> {
        let url = format!("{}/zones/{}/dns_records/{}", self.base_url, zone_id, record_id);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, &error_text, "Record update"));
        }

        tracing::debug!("PUT {} answered {}", payload.name, status);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
