//! Grouping of requested hostnames by apex domain
//!
//! The apex is taken naively as the last two labels of the hostname, so
//! hostnames under multi-label public suffixes are mis-grouped:
//! `home.example.co.uk` lands in zone `co.uk`, which will then be reported
//! as "zone not found". A public-suffix-aware split would change which zones
//! are looked up, so it is a behaviour change and must be flagged as one.

use std::collections::{BTreeMap, BTreeSet};

/// Requested hostnames grouped by apex domain, duplicates removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FqdnGroup {
    zones: BTreeMap<String, BTreeSet<String>>,
}

impl FqdnGroup {
    /// Apex domains with at least one requested hostname
    pub fn zone_names(&self) -> BTreeSet<String> {
        self.zones.keys().cloned().collect()
    }

    /// Hostnames requested under `zone`
    pub fn hostnames(&self, zone: &str) -> Option<&BTreeSet<String>> {
        self.zones.get(zone)
    }

    /// Iterate `(zone, hostnames)` pairs in zone-name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.zones.iter()
    }

    /// Number of distinct zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// True when no hostname was requested
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Total number of distinct hostnames across all zones
    pub fn host_count(&self) -> usize {
        self.zones.values().map(BTreeSet::len).sum()
    }

    fn insert(&mut self, hostname: &str) {
        self.zones
            .entry(apex_domain(hostname).to_string())
            .or_default()
            .insert(hostname.to_string());
    }
}

/// Parse a raw hostname list into hostnames grouped by apex domain
///
/// Tokens are separated by commas and/or whitespace; empty tokens are
/// dropped. Pure function, no I/O.
pub fn group_by_zone(raw: &str) -> FqdnGroup {
    let mut group = FqdnGroup::default();
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .for_each(|hostname| group.insert(hostname));
    group
}

/// Last two dot-separated labels of `hostname`
///
/// A hostname with fewer than two labels is its own apex.
pub fn apex_domain(hostname: &str) -> &str {
    match hostname.rmatch_indices('.').nth(1) {
        Some((idx, _)) => &hostname[idx + 1..],
        None => hostname,
    }
}
