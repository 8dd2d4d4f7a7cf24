// # flaresync-core
//
// Reconciliation core for the flaresync dynamic DNS updater.
//
// ## Architecture Overview
//
// One reconciliation cycle keeps the A records of a set of hostnames
// pointed at the machine's current public IPv4 address:
// - **IpResolver**: Ordered fallback across public-IP lookup endpoints
// - **group_by_zone**: Groups requested hostnames by apex domain
// - **lookup_zones**: Maps apex domains to provider zone ids
// - **RecordLocator**: Finds the A record for a hostname within a zone
// - **decide**: Pure "does this record need an update" rule
// - **executor::apply**: Issues (or, in dry-run, only logs) the update
// - **DdnsEngine**: Runs the whole cycle and returns a CycleReport
//
// ## Design Principles
//
// 1. **Library-First**: The daemon is a thin driver around `DdnsEngine::run_cycle`
// 2. **Explicit Config**: The core never reads process state
// 3. **Isolated Failures**: Only IP resolution and zone listing abort a cycle
// 4. **Sequential**: One zone and one hostname at a time, no spawned tasks

pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod fqdn;
pub mod model;
pub mod reconcile;
pub mod records;
pub mod resolver;
pub mod retry;
pub mod traits;
pub mod zones;

// Re-export core types for convenience
pub use config::{Config, CycleRetryConfig, ResolverConfig};
pub use engine::{CycleReport, DdnsEngine, HostOutcome};
pub use error::{Error, Result};
pub use fqdn::{FqdnGroup, apex_domain, group_by_zone};
pub use model::{
    DnsRecord, PublicIp, RecordPayload, UpdateOutcome, UpdatePlan, UpdateReason, Zone,
};
pub use reconcile::decide;
pub use records::{RecordLocator, find_record};
pub use resolver::IpResolver;
pub use retry::{Backoff, RetryPolicy, retry};
pub use traits::{DnsProvider, IpEndpoint, ResponseFormat};
pub use zones::lookup_zones;
