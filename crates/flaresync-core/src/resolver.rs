//! Public IP resolution across an ordered list of lookup endpoints
//!
//! Two nested levels of fallback:
//!
//! 1. Within a pass, endpoints are tried in order and the first one that
//!    yields a validly formatted address wins. Transport failures are logged;
//!    malformed candidates are discarded silently. Either way the next
//!    endpoint is tried.
//! 2. A pass with no winner is retried under the resolver's [`RetryPolicy`]
//!    (3 passes, 1s then 2s backoff by default). When the budget is spent
//!    the resolution fails with [`Error::Resolution`].

use tracing::{debug, error, info};

use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::model::PublicIp;
use crate::retry::{RetryPolicy, retry};
use crate::traits::IpEndpoint;

/// Resolves the machine's public IPv4 address
pub struct IpResolver {
    /// Endpoints in priority order
    endpoints: Vec<Box<dyn IpEndpoint>>,

    /// Budget and backoff for whole passes
    policy: RetryPolicy,
}

impl IpResolver {
    /// Create a resolver over `endpoints`, tried in the given order
    ///
    /// Fails if `endpoints` is empty.
    pub fn new(endpoints: Vec<Box<dyn IpEndpoint>>, policy: RetryPolicy) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(Error::config("at least one IP lookup endpoint is required"));
        }
        Ok(Self { endpoints, policy })
    }

    /// Create a resolver using the retry settings from `config`
    pub fn from_config(endpoints: Vec<Box<dyn IpEndpoint>>, config: &ResolverConfig) -> Result<Self> {
        Self::new(endpoints, config.retry_policy())
    }

    /// Number of configured endpoints
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Resolve the current public IP, retrying whole passes on failure
    ///
    /// # Returns
    ///
    /// - `Ok(PublicIp)`: The first valid address, in endpoint priority order
    /// - `Err(Error::Resolution)`: No pass produced a valid address
    pub async fn resolve_public_ip(&self) -> Result<PublicIp> {
        retry(self.policy, "Public IP lookup", || self.try_endpoints_once())
            .await
            .map_err(|e| {
                error!("Failed to fetch public IP: {}", e);
                Error::Resolution {
                    attempts: self.policy.max_attempts,
                }
            })
    }

    /// Make a single pass over the endpoints
    ///
    /// # Returns
    ///
    /// - `Ok(PublicIp)`: The first endpoint that produced a valid address
    /// - `Err(Error)`: Every endpoint failed or returned garbage
    pub async fn try_endpoints_once(&self) -> Result<PublicIp> {
        for endpoint in &self.endpoints {
            let body = match endpoint.fetch().await {
                Ok(body) => body,
                Err(e) => {
                    error!("Error fetching public IP from {}: {}", endpoint.name(), e);
                    continue;
                }
            };

            let Some(candidate) = endpoint.format().extract(&body) else {
                debug!("Unexpected response shape from {}", endpoint.name());
                continue;
            };

            match PublicIp::parse(&candidate) {
                Ok(ip) => {
                    info!("Public IP {} (from {})", ip, endpoint.name());
                    return Ok(ip);
                }
                Err(e) => {
                    debug!("Discarding candidate from {}: {}", endpoint.name(), e);
                }
            }
        }

        Err(Error::http(format!(
            "none of {} endpoint(s) returned a valid address",
            self.endpoints.len()
        )))
    }
}
