//! Reconciliation decision
//!
//! The one place where "does this record need an update" is evaluated.
//! Pure: no I/O, no logging.

use crate::model::{A_RECORD_TYPE, DnsRecord, PublicIp, RecordPayload, UpdatePlan, UpdateReason};

/// Decide whether `record` must be updated to `current_ip`
///
/// An update applies when `force_update` is set or the record's content
/// differs from `current_ip`. The replacement payload keeps the record's
/// name, TTL and proxy flag, fixes the type to "A", and sets the content to
/// `current_ip`. The record snapshot itself is never modified.
pub fn decide(current_ip: &PublicIp, record: &DnsRecord, force_update: bool) -> UpdatePlan {
    let reason = if record.content != current_ip.as_str() {
        UpdateReason::ContentMismatch {
            current: record.content.clone(),
        }
    } else if force_update {
        UpdateReason::Forced
    } else {
        UpdateReason::UpToDate
    };

    let should_apply = reason != UpdateReason::UpToDate;

    let payload = should_apply.then(|| RecordPayload {
        record_type: A_RECORD_TYPE.to_string(),
        name: record.name.clone(),
        content: current_ip.to_string(),
        ttl: record.ttl,
        proxied: record.proxied,
    });

    UpdatePlan {
        record: record.clone(),
        new_content: current_ip.to_string(),
        should_apply,
        reason,
        payload,
    }
}
