//! Test doubles and common utilities for contract tests
//!
//! Minimal in-memory implementations of the two seams, with call counters
//! so tests can assert on exactly which provider calls a cycle made.

#![allow(dead_code)]

use flaresync_core::error::{Error, Result};
use flaresync_core::model::{DnsRecord, RecordPayload, Zone};
use flaresync_core::traits::{DnsProvider, IpEndpoint, ResponseFormat};
use flaresync_core::{Config, DdnsEngine, IpResolver, ResolverConfig, RetryPolicy};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpEndpoint that returns a fixed body, optionally after failing a
/// number of times
pub struct ScriptedIpEndpoint {
    name: String,
    format: ResponseFormat,
    /// Body to return once the failures are used up; `None` fails forever
    body: Option<String>,
    /// Number of leading calls that fail with a transport error
    failures_before_success: usize,
    /// Call counter for fetch()
    fetch_count: Arc<AtomicUsize>,
}

impl ScriptedIpEndpoint {
    /// Endpoint that always answers with `body`
    pub fn answering(name: &str, format: ResponseFormat, body: &str) -> Self {
        Self {
            name: name.to_string(),
            format,
            body: Some(body.to_string()),
            failures_before_success: 0,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Endpoint whose every call fails with a transport error
    pub fn unreachable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            format: ResponseFormat::PlainText,
            body: None,
            failures_before_success: 0,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail the first `n` calls, then answer normally
    pub fn failing_first(mut self, n: usize) -> Self {
        self.failures_before_success = n;
        self
    }

    /// Get the number of times fetch() was called
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Create a new ScriptedIpEndpoint that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            name: other.name.clone(),
            format: other.format.clone(),
            body: other.body.clone(),
            failures_before_success: other.failures_before_success,
            fetch_count: Arc::clone(&other.fetch_count),
        }
    }
}

#[async_trait::async_trait]
impl IpEndpoint for ScriptedIpEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> &ResponseFormat {
        &self.format
    }

    async fn fetch(&self) -> Result<String> {
        let call = self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            return Err(Error::http(format!("{}: connection reset", self.name)));
        }
        self.body
            .clone()
            .ok_or_else(|| Error::http(format!("{}: connection refused", self.name)))
    }
}

/// A mock DnsProvider backed by in-memory zones and records
#[derive(Default)]
pub struct MockDnsProvider {
    zones: Vec<Zone>,
    records: HashMap<String, Vec<DnsRecord>>,
    fail_zone_listing: bool,
    failing_record_zones: HashSet<String>,
    failing_updates: HashSet<String>,

    /// Call counter for list_zones()
    list_zones_count: Arc<AtomicUsize>,
    /// Call counter for list_a_records()
    list_records_count: Arc<AtomicUsize>,
    /// Call counter for update_record()
    update_call_count: Arc<AtomicUsize>,
    /// Recorded (zone id, record id, payload) from update calls
    updates: Arc<Mutex<Vec<(String, String, RecordPayload)>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visible zone
    pub fn with_zone(mut self, id: &str, name: &str) -> Self {
        self.zones.push(Zone {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Add a record to a zone
    pub fn with_record(mut self, zone_id: &str, record: DnsRecord) -> Self {
        self.records
            .entry(zone_id.to_string())
            .or_default()
            .push(record);
        self
    }

    /// Make list_zones() fail
    pub fn failing_zone_listing(mut self) -> Self {
        self.fail_zone_listing = true;
        self
    }

    /// Make list_a_records() fail for one zone
    pub fn failing_records_for(mut self, zone_id: &str) -> Self {
        self.failing_record_zones.insert(zone_id.to_string());
        self
    }

    /// Make update_record() fail for one record
    pub fn failing_update_for(mut self, record_id: &str) -> Self {
        self.failing_updates.insert(record_id.to_string());
        self
    }

    /// Get the number of times list_zones() was called
    pub fn list_zones_count(&self) -> usize {
        self.list_zones_count.load(Ordering::SeqCst)
    }

    /// Get the number of times list_a_records() was called
    pub fn list_records_count(&self) -> usize {
        self.list_records_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Get every update call made so far
    pub fn updates(&self) -> Vec<(String, String, RecordPayload)> {
        self.updates.lock().unwrap().clone()
    }

    /// Record ids passed to update_record(), in call order
    pub fn updated_record_ids(&self) -> Vec<String> {
        self.updates()
            .into_iter()
            .map(|(_, record_id, _)| record_id)
            .collect()
    }

    /// Create a new MockDnsProvider with the same data that shares counters
    /// with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zones: other.zones.clone(),
            records: other.records.clone(),
            fail_zone_listing: other.fail_zone_listing,
            failing_record_zones: other.failing_record_zones.clone(),
            failing_updates: other.failing_updates.clone(),
            list_zones_count: Arc::clone(&other.list_zones_count),
            list_records_count: Arc::clone(&other.list_records_count),
            update_call_count: Arc::clone(&other.update_call_count),
            updates: Arc::clone(&other.updates),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.list_zones_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_zone_listing {
            return Err(Error::provider("mock", "HTTP 503 Service Unavailable"));
        }
        Ok(self.zones.clone())
    }

    async fn list_a_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.list_records_count.fetch_add(1, Ordering::SeqCst);
        if self.failing_record_zones.contains(zone_id) {
            return Err(Error::provider("mock", "HTTP 500 Internal Server Error"));
        }
        Ok(self.records.get(zone_id).cloned().unwrap_or_default())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.updates.lock().unwrap().push((
            zone_id.to_string(),
            record_id.to_string(),
            payload.clone(),
        ));
        if self.failing_updates.contains(record_id) {
            return Err(Error::provider("mock", "HTTP 400 Bad Request"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to build an A record snapshot
pub fn a_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        content: content.to_string(),
        ttl: 300,
        proxied: false,
        record_type: "A".to_string(),
    }
}

/// Endpoint that always reports `ip` as plain text
pub fn fixed_ip(ip: &str) -> ScriptedIpEndpoint {
    ScriptedIpEndpoint::answering("fixed", ResponseFormat::PlainText, ip)
}

/// Resolver with a single pass and no backoff
pub fn single_pass_resolver(endpoints: Vec<Box<dyn IpEndpoint>>) -> IpResolver {
    IpResolver::new(endpoints, RetryPolicy::once()).unwrap()
}

/// Resolver with the default budget (3 passes, 1s/2s backoff)
pub fn default_resolver(endpoints: Vec<Box<dyn IpEndpoint>>) -> IpResolver {
    IpResolver::from_config(endpoints, &ResolverConfig::default()).unwrap()
}

/// Engine reporting `ip` and sharing counters with `provider`
pub fn engine_with(ip: &str, provider: &MockDnsProvider) -> DdnsEngine {
    DdnsEngine::new(
        single_pass_resolver(vec![Box::new(fixed_ip(ip))]),
        Box::new(MockDnsProvider::sharing_counters_with(provider)),
    )
}

/// Helper to create a minimal Config for testing
pub fn config_for(fqdns: &str) -> Config {
    Config::new("test-token").with_fqdns(fqdns)
}
