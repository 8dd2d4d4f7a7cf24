//! Reconciliation cycle
//!
//! The DdnsEngine runs one full pass over the requested hostnames:
//!
//! ```text
//! ┌─────────────┐   PublicIp   ┌──────────────┐
//! │ IpResolver  │─────────────▶│  DdnsEngine  │◀── Config (fqdns, flags)
//! └─────────────┘              └──────────────┘
//!                                     │
//!        ┌──────────────┬─────────────┼──────────────┬──────────────┐
//!        ▼              ▼             ▼              ▼              ▼
//!   group_by_zone  lookup_zones  RecordLocator    decide()      apply()
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Group requested hostnames by apex domain (empty → nothing to do)
//! 2. Resolve the public IP (fatal on failure)
//! 3. List zones once (fatal on failure)
//! 4. For each zone, in name order: fetch its A records once
//! 5. For each hostname in the zone, in name order: decide, then apply
//!
//! Zones and hostnames are processed one at a time. Only steps 2 and 3 can
//! fail the cycle; everything after that is recorded as a [`HostOutcome`].

use std::fmt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor;
use crate::fqdn::group_by_zone;
use crate::model::{PublicIp, UpdateOutcome};
use crate::reconcile::decide;
use crate::records::RecordLocator;
use crate::resolver::IpResolver;
use crate::traits::DnsProvider;
use crate::zones::lookup_zones;

/// Final state of one requested hostname after a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    /// The hostname's apex domain is not a zone visible to the credential
    ZoneNotFound,
    /// The zone exists but holds no A record with this exact name
    RecordNotFound,
    /// The record already pointed at the public IP
    Unchanged,
    /// The provider accepted an update
    Updated,
    /// Dry-run: an update would have been sent
    DryRun,
    /// The update call failed
    Failed(String),
}

impl From<UpdateOutcome> for HostOutcome {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Applied => HostOutcome::Updated,
            UpdateOutcome::Skipped => HostOutcome::Unchanged,
            UpdateOutcome::DryRun => HostOutcome::DryRun,
            UpdateOutcome::Failed(reason) => HostOutcome::Failed(reason),
        }
    }
}

/// Result of a completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Address every record was reconciled against; `None` when no hostnames
    /// were requested and resolution was skipped
    pub public_ip: Option<PublicIp>,

    /// One entry per requested hostname, in processing order
    pub hosts: Vec<(String, HostOutcome)>,
}

impl CycleReport {
    fn empty(public_ip: Option<PublicIp>) -> Self {
        Self {
            public_ip,
            hosts: Vec::new(),
        }
    }

    fn record(&mut self, hostname: &str, outcome: HostOutcome) {
        self.hosts.push((hostname.to_string(), outcome));
    }

    /// Outcome for a given hostname
    pub fn outcome(&self, hostname: &str) -> Option<&HostOutcome> {
        self.hosts
            .iter()
            .find(|(name, _)| name == hostname)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&HostOutcome) -> bool) -> usize {
        self.hosts.iter().filter(|(_, outcome)| pred(outcome)).count()
    }

    /// Hostnames whose record was rewritten
    pub fn updated(&self) -> usize {
        self.count(|o| *o == HostOutcome::Updated)
    }

    /// Hostnames whose record already matched
    pub fn unchanged(&self) -> usize {
        self.count(|o| *o == HostOutcome::Unchanged)
    }

    /// Hostnames that would have been rewritten in dry-run mode
    pub fn dry_run(&self) -> usize {
        self.count(|o| *o == HostOutcome::DryRun)
    }

    /// Hostnames skipped because their zone or record does not exist
    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, HostOutcome::ZoneNotFound | HostOutcome::RecordNotFound))
    }

    /// Hostnames whose update was rejected or never sent
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, HostOutcome::Failed(_)))
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} host(s): {} updated, {} unchanged, {} dry-run, {} not found, {} failed",
            self.hosts.len(),
            self.updated(),
            self.unchanged(),
            self.dry_run(),
            self.not_found(),
            self.failed()
        )
    }
}

/// Core reconciliation engine
///
/// Owns the two seams of the system: the IP resolver (backed by
/// [`crate::traits::IpEndpoint`]s) and the [`DnsProvider`]. Holds no state
/// between cycles.
pub struct DdnsEngine {
    /// Public IP lookup
    resolver: IpResolver,

    /// DNS provider for zone/record reads and record writes
    provider: Box<dyn DnsProvider>,
}

impl DdnsEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `resolver`: Public IP resolver
    /// - `provider`: DNS provider implementation
    pub fn new(resolver: IpResolver, provider: Box<dyn DnsProvider>) -> Self {
        Self { resolver, provider }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Run one reconciliation cycle
    ///
    /// # Returns
    ///
    /// - `Ok(CycleReport)`: The cycle ran to completion; per-host problems
    ///   are in the report
    /// - `Err(Error::Resolution)`: No valid public IP could be obtained
    /// - `Err(Error::ZoneList)`: The zone listing failed
    pub async fn run_cycle(&self, config: &Config) -> Result<CycleReport> {
        let group = group_by_zone(&config.requested_fqdns);
        if group.is_empty() {
            warn!("No hostnames requested, nothing to reconcile");
            return Ok(CycleReport::empty(None));
        }

        let public_ip = self.resolver.resolve_public_ip().await?;

        let zone_ids = lookup_zones(self.provider.as_ref(), &group.zone_names()).await?;

        let mut report = CycleReport::empty(Some(public_ip.clone()));

        for (zone_name, hostnames) in group.iter() {
            let Some(zone_id) = zone_ids.get(zone_name) else {
                for hostname in hostnames {
                    warn!(zone = %zone_name, record = %hostname, "Zone {} not found", zone_name);
                    report.record(hostname, HostOutcome::ZoneNotFound);
                }
                continue;
            };

            debug!(zone = %zone_name, "Processing {} hostname(s)", hostnames.len());
            let locator = RecordLocator::load(self.provider.as_ref(), zone_name, zone_id).await;

            for hostname in hostnames {
                let Some(record) = locator.find(hostname) else {
                    warn!(record = %hostname, "{}", Error::RecordNotFound(hostname.clone()));
                    report.record(hostname, HostOutcome::RecordNotFound);
                    continue;
                };

                let plan = decide(&public_ip, record, config.force_update);
                let outcome =
                    executor::apply(self.provider.as_ref(), zone_id, &plan, config.dry_run).await;
                report.record(hostname, outcome.into());
            }
        }

        info!("Cycle complete for {}: {}", public_ip, report);
        Ok(report)
    }
}
