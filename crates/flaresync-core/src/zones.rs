//! Zone directory: maps requested apex domains to provider zone ids

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::traits::DnsProvider;

/// Resolve requested zone names to provider zone ids
///
/// Lists every zone visible to the credential in one call and keeps only
/// the names present in `requested`. Requested names that are not visible
/// are simply absent from the result; the engine reports them as
/// "zone not found" later.
///
/// # Returns
///
/// - `Ok(BTreeMap)`: zone name -> zone id, for `requested` ∩ visible
/// - `Err(Error::ZoneList)`: The listing failed; fatal for the cycle
pub async fn lookup_zones(
    provider: &dyn DnsProvider,
    requested: &BTreeSet<String>,
) -> Result<BTreeMap<String, String>> {
    let visible = provider.list_zones().await.map_err(|e| {
        error!("Failed to fetch zones: {}", e);
        Error::zone_list(e.to_string())
    })?;

    debug!("{} zone(s) visible to the credential", visible.len());

    Ok(visible
        .into_iter()
        .filter(|zone| requested.contains(&zone.name))
        .map(|zone| (zone.name, zone.id))
        .collect())
}
