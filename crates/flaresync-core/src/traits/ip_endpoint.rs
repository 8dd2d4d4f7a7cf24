// # IP Endpoint Trait
//
// Defines the interface for a single external "what is my IP" service.
//
// ## Implementations
//
// - HTTP: `flaresync-ip-http` crate (`HttpIpEndpoint`)
// - Tests: scripted endpoints in `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use flaresync_core::traits::IpEndpoint;
//
// let body = endpoint.fetch().await?;
// let candidate = endpoint.format().extract(&body);
// ```
//
// Endpoints only fetch. Trimming, validation, fallback to the next endpoint
// and retrying are owned by `IpResolver`.

use async_trait::async_trait;

/// How the candidate address is embedded in an endpoint's response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    /// JSON object carrying the address in a string field, e.g. `{"ip": "1.2.3.4"}`
    JsonField(String),
    /// The body is the bare address
    PlainText,
}

impl ResponseFormat {
    /// JSON object with an `ip` field
    pub fn json_ip() -> Self {
        Self::JsonField("ip".to_string())
    }

    /// Extract the trimmed candidate string from a response body
    ///
    /// # Returns
    ///
    /// - `Some(String)`: The candidate (not yet validated)
    /// - `None`: The body is not in the expected shape
    pub fn extract(&self, body: &str) -> Option<String> {
        match self {
            ResponseFormat::JsonField(field) => {
                let json: serde_json::Value = serde_json::from_str(body).ok()?;
                json.get(field)?.as_str().map(|ip| ip.trim().to_string())
            }
            ResponseFormat::PlainText => Some(body.trim().to_string()),
        }
    }
}

/// Trait for IP lookup endpoint implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Allowed Capabilities
/// - ✅ Perform one bounded-timeout request per `fetch()` call
///
/// # Forbidden Capabilities
/// - ❌ Retry or fall back to other services (owned by `IpResolver`)
/// - ❌ Cache results between calls
#[async_trait]
pub trait IpEndpoint: Send + Sync {
    /// Human-readable identifier, usually the URL (for logging)
    fn name(&self) -> &str;

    /// Shape of the response body
    fn format(&self) -> &ResponseFormat;

    /// Fetch the raw response body
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The body of a successful response
    /// - `Err(Error)`: Transport failure, timeout, or non-success status
    async fn fetch(&self) -> Result<String, crate::Error>;
}
