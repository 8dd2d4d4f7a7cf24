// # HTTP IP Endpoints
//
// This crate provides the HTTP implementation of `IpEndpoint` for flaresync.
//
// ## Purpose
//
// Each `HttpIpEndpoint` performs one GET against a public "what is my IP"
// service with a bounded timeout. Extraction, validation, fallback and
// retry are owned by `flaresync_core::IpResolver`.
//
// It also hosts the connectivity probe the daemon runs before each cycle.

use flaresync_core::traits::{IpEndpoint, ResponseFormat};
use flaresync_core::{Error, Result};

use std::time::Duration;
use tracing::debug;

/// Default per-request timeout for IP lookups
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Default URL probed to decide whether the network is up
pub const DEFAULT_CONNECTIVITY_URL: &str = "https://www.google.com/";

/// Default lookup services, in priority order
const DEFAULT_IP_SERVICES: &[(&str, Format)] = &[
    ("https://api.ipify.org?format=json", Format::JsonIp),
    ("https://ipinfo.io/json", Format::JsonIp),
    ("https://ifconfig.me/ip", Format::Text),
];

#[derive(Clone, Copy)]
enum Format {
    JsonIp,
    Text,
}

impl From<Format> for ResponseFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::JsonIp => ResponseFormat::json_ip(),
            Format::Text => ResponseFormat::PlainText,
        }
    }
}

/// A single HTTP(S) GET lookup service
pub struct HttpIpEndpoint {
    /// URL to fetch the address from
    url: String,

    /// Where the address sits in the response body
    format: ResponseFormat,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpEndpoint {
    /// Create a new HTTP endpoint
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from
    /// - `format`: Shape of the response body
    /// - `timeout`: Bound on the whole request
    pub fn new(url: impl Into<String>, format: ResponseFormat, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(url, format, client))
    }

    /// Create an endpoint sharing an existing client
    pub fn with_client(url: impl Into<String>, format: ResponseFormat, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            format,
            client,
        }
    }
}

#[async_trait::async_trait]
impl IpEndpoint for HttpIpEndpoint {
    fn name(&self) -> &str {
        &self.url
    }

    fn format(&self) -> &ResponseFormat {
        &self.format
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!("HTTP error: {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))
    }
}

/// The default endpoint list: ipify (JSON), ipinfo (JSON), ifconfig.me (text)
///
/// All endpoints share one client with the given timeout.
pub fn default_endpoints(timeout: Duration) -> Result<Vec<Box<dyn IpEndpoint>>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

    Ok(DEFAULT_IP_SERVICES
        .iter()
        .map(|(url, format)| {
            Box::new(HttpIpEndpoint::with_client(*url, (*format).into(), client.clone()))
                as Box<dyn IpEndpoint>
        })
        .collect())
}

/// Whether `url` answers at all within `timeout`
///
/// Any HTTP response counts, whatever its status. Only transport failures
/// (DNS, connect, TLS, timeout) mean the network is unavailable.
pub async fn probe_connectivity(url: &str, timeout: Duration) -> bool {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            debug!("Failed to build probe client: {}", e);
            return false;
        }
    };

    match client.get(url).send().await {
        Ok(response) => {
            debug!("Connectivity probe {} answered {}", url, response.status());
            true
        }
        Err(e) => {
            debug!("Connectivity probe {} failed: {}", url, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_are_ordered() {
        let endpoints = default_endpoints(DEFAULT_LOOKUP_TIMEOUT).unwrap();
        let names: Vec<&str> = endpoints.iter().map(|e| e.name()).collect();

        assert_eq!(
            names,
            vec![
                "https://api.ipify.org?format=json",
                "https://ipinfo.io/json",
                "https://ifconfig.me/ip",
            ]
        );
        assert_eq!(endpoints[0].format(), &ResponseFormat::json_ip());
        assert_eq!(endpoints[1].format(), &ResponseFormat::json_ip());
        assert_eq!(endpoints[2].format(), &ResponseFormat::PlainText);
    }
}
