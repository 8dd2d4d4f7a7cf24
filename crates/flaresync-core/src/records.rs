//! Record locator: per-zone snapshot of A records and hostname lookup

use tracing::{debug, error};

use crate::error::Error;
use crate::model::{A_RECORD_TYPE, DnsRecord};
use crate::traits::DnsProvider;

/// Read snapshot of one zone's A records, fetched once per zone per cycle
#[derive(Debug, Clone, Default)]
pub struct RecordLocator {
    records: Vec<DnsRecord>,
}

impl RecordLocator {
    /// Fetch the A records of a zone
    ///
    /// A failed listing is logged and yields an empty snapshot, so every
    /// hostname in the zone resolves to "not found" while other zones are
    /// processed normally.
    pub async fn load(provider: &dyn DnsProvider, zone_name: &str, zone_id: &str) -> Self {
        match provider.list_a_records(zone_id).await {
            Ok(records) => {
                debug!(zone = %zone_name, "Fetched {} A record(s)", records.len());
                Self::from_records(records)
            }
            Err(e) => {
                error!(zone = %zone_name, "{}", Error::record_list(zone_name, e.to_string()));
                Self::default()
            }
        }
    }

    /// Wrap an already fetched record list
    pub fn from_records(records: Vec<DnsRecord>) -> Self {
        Self { records }
    }

    /// Record whose name exactly equals `hostname`
    pub fn find(&self, hostname: &str) -> Option<&DnsRecord> {
        find_record(&self.records, hostname)
    }

    /// Number of records in the snapshot
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// First A record whose name is exactly `hostname`
///
/// Case-sensitive, no suffix or wildcard matching.
pub fn find_record<'a>(records: &'a [DnsRecord], hostname: &str) -> Option<&'a DnsRecord> {
    records
        .iter()
        .find(|record| record.record_type == A_RECORD_TYPE && record.name == hostname)
}
