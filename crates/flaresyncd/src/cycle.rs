//! One scheduled tick of the daemon: probe the network, then run a
//! reconciliation cycle under the whole-cycle retry policy

use flaresync_core::{Config, CycleReport, DdnsEngine, RetryPolicy, retry};
use flaresync_ip_http::probe_connectivity;
use std::time::Duration;
use tracing::{error, info, warn};

/// Timeout for the connectivity probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run one tick
///
/// # Returns
///
/// - `Some(CycleReport)`: The cycle completed
/// - `None`: The network was down, or every attempt failed fatally. Either
///   way the next tick tries again.
pub async fn run_once(
    engine: &DdnsEngine,
    config: &Config,
    policy: RetryPolicy,
    connectivity_url: &str,
) -> Option<CycleReport> {
    if !probe_connectivity(connectivity_url, PROBE_TIMEOUT).await {
        warn!("Network not available, skipping this cycle");
        return None;
    }

    match retry(policy, "Reconciliation cycle", || engine.run_cycle(config)).await {
        Ok(report) => {
            info!(
                updated = report.updated(),
                unchanged = report.unchanged(),
                dry_run = report.dry_run(),
                not_found = report.not_found(),
                failed = report.failed(),
                "Cycle finished: {}",
                report
            );
            Some(report)
        }
        Err(e) => {
            error!("Cycle failed after {} attempt(s): {}", policy.max_attempts, e);
            None
        }
    }
}
