//! Daemon configuration, read from environment variables
//!
//! Parsing goes through an explicit lookup function so it can be tested
//! without touching the process environment.

use anyhow::Result;
use flaresync_core::{Config, CycleRetryConfig, group_by_zone};
use flaresync_ip_http::DEFAULT_CONNECTIVITY_URL;
use std::env;
use std::str::FromStr;
use tracing::Level;

const DEFAULT_SLEEP_SECS: u64 = 60;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration
#[derive(Clone)]
pub struct DaemonConfig {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    pub api_token: String,
    pub dry_run: bool,
    pub force_update: bool,
    /// Raw comma/whitespace separated hostname list
    pub fqdns: String,
    /// Seconds between the end of one cycle and the start of the next
    pub sleep_secs: u64,
    pub log_level: String,
    /// Whole-cycle attempt budget
    pub cycle_retries: usize,
    pub cycle_retry_delay_secs: u64,
    /// URL probed before each cycle
    pub connectivity_url: String,
}

impl std::fmt::Debug for DaemonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonConfig")
            .field("api_token", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .field("force_update", &self.force_update)
            .field("fqdns", &self.fqdns)
            .field("sleep_secs", &self.sleep_secs)
            .field("log_level", &self.log_level)
            .field("cycle_retries", &self.cycle_retries)
            .field("cycle_retry_delay_secs", &self.cycle_retry_delay_secs)
            .field("connectivity_url", &self.connectivity_url)
            .finish()
    }
}

impl DaemonConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = CycleRetryConfig::default();

        let Some(api_token) = lookup("CLOUDFLARE_API_TOKEN") else {
            anyhow::bail!(
                "CLOUDFLARE_API_TOKEN is required. \
                Set it via: export CLOUDFLARE_API_TOKEN=your_token"
            );
        };

        Ok(Self {
            api_token,
            dry_run: parse_flag(lookup("DRY_RUN")),
            force_update: parse_flag(lookup("FORCE_UPDATE")),
            fqdns: lookup("CLOUDFLARE_FQDNS").unwrap_or_default(),
            sleep_secs: parse_number(&lookup, "SLEEP", DEFAULT_SLEEP_SECS)?,
            log_level: lookup("FLARESYNC_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            cycle_retries: parse_number(&lookup, "FLARESYNC_CYCLE_RETRIES", defaults.max_attempts)?,
            cycle_retry_delay_secs: parse_number(
                &lookup,
                "FLARESYNC_CYCLE_RETRY_DELAY_SECS",
                defaults.delay_secs,
            )?,
            connectivity_url: lookup("FLARESYNC_CONNECTIVITY_URL")
                .unwrap_or_else(|| DEFAULT_CONNECTIVITY_URL.to_string()),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            anyhow::bail!("CLOUDFLARE_API_TOKEN cannot be empty");
        }

        if !(1..=86_400).contains(&self.sleep_secs) {
            anyhow::bail!(
                "SLEEP must be between 1 and 86400 seconds. Got: {}",
                self.sleep_secs
            );
        }

        if !(1..=10).contains(&self.cycle_retries) {
            anyhow::bail!(
                "FLARESYNC_CYCLE_RETRIES must be between 1 and 10. Got: {}",
                self.cycle_retries
            );
        }

        if self.cycle_retry_delay_secs > 3600 {
            anyhow::bail!(
                "FLARESYNC_CYCLE_RETRY_DELAY_SECS must be at most 3600 seconds. Got: {}",
                self.cycle_retry_delay_secs
            );
        }

        if !self.connectivity_url.starts_with("https://")
            && !self.connectivity_url.starts_with("http://")
        {
            anyhow::bail!(
                "FLARESYNC_CONNECTIVITY_URL must use HTTP or HTTPS scheme. Got: {}",
                self.connectivity_url
            );
        }

        self.level()?;

        Ok(())
    }

    /// Problems with individual hostnames in `fqdns`
    ///
    /// These never fail startup. A malformed hostname is still handed to the
    /// engine, which reports it per host as zone or record not found.
    pub fn hostname_warnings(&self) -> Vec<String> {
        group_by_zone(&self.fqdns)
            .iter()
            .flat_map(|(_, hostnames)| hostnames)
            .filter_map(|hostname| validate_domain_name(hostname).err())
            .map(|e| e.to_string())
            .collect()
    }

    /// Tracing level named by `log_level`
    pub fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "FLARESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Per-cycle configuration handed to the engine
    pub fn core_config(&self) -> Config {
        Config::new(self.api_token.clone())
            .with_dry_run(self.dry_run)
            .with_force_update(self.force_update)
            .with_fqdns(self.fqdns.clone())
    }

    /// Whole-cycle retry settings
    pub fn cycle_retry(&self) -> CycleRetryConfig {
        CycleRetryConfig {
            max_attempts: self.cycle_retries,
            delay_secs: self.cycle_retry_delay_secs,
        }
    }
}

/// Only the literal `true` (any case) enables a flag
fn parse_flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn parse_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer. Got: '{}'", key, raw)),
    }
}

/// Validate that a string is a plausible hostname
///
/// Basic RFC 1035 checks, enough to catch typos in `CLOUDFLARE_FQDNS`.
/// A label made of a single `*` is accepted for wildcard records.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label == "*" {
            continue;
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}
