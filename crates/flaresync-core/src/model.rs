//! Data model shared by every stage of a reconciliation cycle
//!
//! All of these values live for a single cycle. Nothing here is cached or
//! persisted between cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// DNS record type managed by flaresync
pub const A_RECORD_TYPE: &str = "A";

/// A validated dotted-quad public IPv4 address
///
/// The check is purely syntactic: four `.`-separated groups of one to three
/// ASCII digits. Octet ranges are not checked, so `999.1.1.1` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicIp(String);

impl PublicIp {
    /// Validate and wrap a candidate string
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn parse(candidate: &str) -> Result<Self> {
        let candidate = candidate.trim();
        if is_valid_ipv4_format(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(Error::validation(format!(
                "not a dotted-quad address: {:?}",
                candidate
            )))
        }
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `candidate` is four `.`-separated groups of 1-3 ASCII digits
pub fn is_valid_ipv4_format(candidate: &str) -> bool {
    let mut groups = 0;
    for group in candidate.split('.') {
        groups += 1;
        if groups > 4 || group.is_empty() || group.len() > 3 {
            return false;
        }
        if !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    groups == 4
}

/// A zone visible to the credential
///
/// Identity is the name; the id is resolved afresh every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone identifier
    pub id: String,
    /// Apex domain, e.g. "example.com"
    pub name: String,
}

/// Read snapshot of an A record owned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record identifier
    pub id: String,
    /// Fully-qualified hostname
    pub name: String,
    /// Current address
    pub content: String,
    /// Time-to-live (1 means automatic at Cloudflare)
    pub ttl: u32,
    /// Whether traffic is proxied by the provider
    #[serde(default)]
    pub proxied: bool,
    /// Record type
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,
}

fn default_record_type() -> String {
    A_RECORD_TYPE.to_string()
}

/// Replacement body sent to the provider's record-update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    /// Always "A"
    #[serde(rename = "type")]
    pub record_type: String,
    /// Unchanged hostname
    pub name: String,
    /// New address
    pub content: String,
    /// Preserved TTL
    pub ttl: u32,
    /// Preserved proxy flag
    pub proxied: bool,
}

/// Why a plan does or does not apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateReason {
    /// The record already points at the current address
    UpToDate,
    /// The record points somewhere else
    ContentMismatch {
        /// Address currently in the record
        current: String,
    },
    /// Content matches but the force flag is set
    Forced,
}

impl fmt::Display for UpdateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateReason::UpToDate => f.write_str("record matches public IP"),
            UpdateReason::ContentMismatch { current } => {
                write!(f, "record points at {}", current)
            }
            UpdateReason::Forced => f.write_str("forced update"),
        }
    }
}

/// Decision for a single record, produced by [`crate::reconcile::decide`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Snapshot the decision was made against
    pub record: DnsRecord,
    /// Address the record should hold
    pub new_content: String,
    /// Whether the executor should act on this plan
    pub should_apply: bool,
    /// Reason for the decision
    pub reason: UpdateReason,
    /// Body for the update call; present exactly when `should_apply` is true
    pub payload: Option<RecordPayload>,
}

/// Result of handing a plan to the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The provider accepted the update
    Applied,
    /// The plan did not require an update
    Skipped,
    /// Dry-run mode: the update was logged but not sent
    DryRun,
    /// The update was sent and failed, or never reached the provider
    Failed(String),
}
