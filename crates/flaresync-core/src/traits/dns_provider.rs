// # DNS Provider Trait
//
// Defines the interface to the authoritative name-service provider.
//
// ## Implementations
//
// - Cloudflare: `flaresync-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use flaresync_core::DnsProvider;
//
// let zones = provider.list_zones().await?;
// let records = provider.list_a_records(&zones[0].id).await?;
// provider.update_record(&zones[0].id, &records[0].id, &payload).await?;
// ```

use async_trait::async_trait;

use crate::model::{DnsRecord, RecordPayload, Zone};

/// Trait for DNS provider implementations
///
/// Each method maps to exactly one logical API operation.
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Follow pagination within a single listing call
/// - ✅ Parse provider-specific responses
///
/// # Forbidden Capabilities
/// - ❌ Retry or back off (a failed call is reported, the next cycle retries)
/// - ❌ Decide whether an update is needed (owned by `reconcile::decide`)
/// - ❌ Honour dry-run (owned by the update executor, which never calls
///   `update_record` in dry-run mode)
/// - ❌ Cache zones or records between calls
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every zone visible to the credential
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Zone>)`: All visible zones
    /// - `Err(Error)`: Transport or provider failure
    async fn list_zones(&self) -> Result<Vec<Zone>, crate::Error>;

    /// List the A records of a zone
    ///
    /// # Parameters
    ///
    /// - `zone_id`: Provider-assigned zone identifier
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: All A records in the zone
    /// - `Err(Error)`: Transport or provider failure
    async fn list_a_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Replace an existing record
    ///
    /// # Parameters
    ///
    /// - `zone_id`: Provider-assigned zone identifier
    /// - `record_id`: Provider-assigned record identifier
    /// - `payload`: Full replacement body
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider answered with a success status
    /// - `Err(Error)`: Any other status, or a transport failure
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
