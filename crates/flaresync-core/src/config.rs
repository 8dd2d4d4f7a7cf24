//! Configuration types for flaresync
//!
//! The core never reads the process environment. The driver builds these
//! values once and passes them by reference into every cycle.

use serde::Deserialize;
use std::time::Duration;

use crate::retry::{Backoff, RetryPolicy};

/// Per-cycle configuration snapshot
///
/// Immutable for the duration of a cycle. The `Debug` implementation never
/// exposes the credential.
#[derive(Clone)]
pub struct Config {
    /// Provider API token
    /// ⚠️ NEVER log this value
    credential: String,

    /// Compute and log updates without calling the provider's write API
    pub dry_run: bool,

    /// Update every matched record even if its content already matches
    pub force_update: bool,

    /// Raw comma/whitespace separated list of hostnames to reconcile
    pub requested_fqdns: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("credential", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .field("force_update", &self.force_update)
            .field("requested_fqdns", &self.requested_fqdns)
            .finish()
    }
}

impl Config {
    /// Create a configuration with both flags off and no hostnames
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            dry_run: false,
            force_update: false,
            requested_fqdns: String::new(),
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable forced updates
    pub fn with_force_update(mut self, force_update: bool) -> Self {
        self.force_update = force_update;
        self
    }

    /// Set the raw hostname list
    pub fn with_fqdns(mut self, fqdns: impl Into<String>) -> Self {
        self.requested_fqdns = fqdns.into();
        self
    }

    /// The provider credential
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.credential.trim().is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }
        Ok(())
    }
}

/// Settings for public IP resolution
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Per-endpoint request timeout (in seconds)
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of full passes over the endpoint list
    #[serde(default = "default_resolve_attempts")]
    pub max_attempts: usize,

    /// Delay before the second pass; doubles for each further pass (in milliseconds)
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl ResolverConfig {
    /// Per-endpoint request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy for whole passes over the endpoint list
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Backoff::Exponential {
                base: Duration::from_millis(self.backoff_base_ms),
            },
        )
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_lookup_timeout_secs(),
            max_attempts: default_resolve_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Settings for the driver's whole-cycle retry
#[derive(Debug, Clone)]
pub struct CycleRetryConfig {
    /// Number of attempts at a cycle that failed fatally
    pub max_attempts: usize,

    /// Fixed delay between attempts (in seconds)
    pub delay_secs: u64,
}

impl CycleRetryConfig {
    /// Retry policy for a whole cycle
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Backoff::Fixed(Duration::from_secs(self.delay_secs)),
        )
    }
}

impl Default for CycleRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 10,
        }
    }
}

fn default_lookup_timeout_secs() -> u64 {
    5
}

fn default_resolve_attempts() -> usize {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}
