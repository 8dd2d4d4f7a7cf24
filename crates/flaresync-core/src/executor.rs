//! Update executor: turns an [`UpdatePlan`] into at most one provider write
//!
//! Each branch logs exactly one event. Failures are reported as
//! [`UpdateOutcome::Failed`] and never abort the remaining records.

use tracing::{error, info};

use crate::error::Error;
use crate::model::{UpdateOutcome, UpdatePlan};
use crate::traits::DnsProvider;

/// Apply a plan against the provider
///
/// - `should_apply == false` → [`UpdateOutcome::Skipped`], no call
/// - `dry_run == true` → [`UpdateOutcome::DryRun`], no call
/// - otherwise one `update_record` call: success → [`UpdateOutcome::Applied`],
///   anything else → [`UpdateOutcome::Failed`]
pub async fn apply(
    provider: &dyn DnsProvider,
    zone_id: &str,
    plan: &UpdatePlan,
    dry_run: bool,
) -> UpdateOutcome {
    let hostname = &plan.record.name;

    let payload = match &plan.payload {
        Some(payload) if plan.should_apply => payload,
        _ => {
            info!(
                record = %hostname,
                "No update needed for {} (record [{}] matches public IP [{}])",
                hostname, plan.record.content, plan.new_content
            );
            return UpdateOutcome::Skipped;
        }
    };

    if dry_run {
        info!(
            record = %hostname,
            "[dry run] would update {} to {} ({})",
            hostname, payload.content, plan.reason
        );
        return UpdateOutcome::DryRun;
    }

    match provider
        .update_record(zone_id, &plan.record.id, payload)
        .await
    {
        Ok(()) => {
            info!(record = %hostname, "Updated {} to {}", hostname, payload.content);
            UpdateOutcome::Applied
        }
        Err(e) => {
            let failure = Error::update(hostname.as_str(), e.to_string());
            error!(record = %hostname, "{}", failure);
            UpdateOutcome::Failed(e.to_string())
        }
    }
}
