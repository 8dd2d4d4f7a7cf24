//! Contract Test: Missing Zones and Records
//!
//! Constraints verified:
//! - A hostname whose apex is not a visible zone is reported, never written
//! - A hostname with no matching record is reported without affecting its
//!   siblings in the same zone
//! - A record listing failure only affects the hostnames of that zone
//! - None of these fail the cycle

mod common;

use common::*;
use flaresync_core::HostOutcome;

#[tokio::test]
async fn unknown_zone_is_skipped() {
    let provider = MockDnsProvider::new()
        .with_zone("z1", "example.com")
        .with_record("z1", a_record("r1", "home.example.com", "9.9.9.9"));
    let engine = engine_with("1.1.1.1", &provider);

    let report = engine
        .run_cycle(&config_for("home.example.com,www.unknown.net"))
        .await
        .unwrap();

    assert_eq!(report.outcome("www.unknown.net"), Some(&HostOutcome::ZoneNotFound));
    assert_eq!(report.outcome("home.example.com"), Some(&HostOutcome::Updated));
    // Records are only listed for the zone that exists
    assert_eq!(provider.list_records_count(), 1);
    assert_eq!(provider.updated_record_ids(), vec!["r1".to_string()]);
}

#[tokio::test]
async fn missing_record_does_not_affect_siblings() {
    let provider = MockDnsProvider::new()
        .with_zone("z1", "example.com")
        .with_record("z1", a_record("r1", "a.example.com", "9.9.9.9"))
        .with_record("z1", a_record("r3", "c.example.com", "9.9.9.9"));
    let engine = engine_with("1.1.1.1", &provider);

    let report = engine
        .run_cycle(&config_for("a.example.com b.example.com c.example.com"))
        .await
        .unwrap();

    assert_eq!(report.outcome("a.example.com"), Some(&HostOutcome::Updated));
    assert_eq!(report.outcome("b.example.com"), Some(&HostOutcome::RecordNotFound));
    assert_eq!(report.outcome("c.example.com"), Some(&HostOutcome::Updated));
    assert_eq!(report.not_found(), 1);
    assert_eq!(provider.update_call_count(), 2);
}

#[tokio::test]
async fn record_listing_failure_is_isolated_to_its_zone() {
    let provider = MockDnsProvider::new()
        .with_zone("z1", "example.com")
        .with_zone("z2", "other.org")
        .with_record("z1", a_record("r1", "home.example.com", "9.9.9.9"))
        .with_record("z2", a_record("r2", "home.other.org", "9.9.9.9"))
        .failing_records_for("z1");
    let engine = engine_with("1.1.1.1", &provider);

    let report = engine
        .run_cycle(&config_for("home.example.com,home.other.org"))
        .await
        .unwrap();

    assert_eq!(report.outcome("home.example.com"), Some(&HostOutcome::RecordNotFound));
    assert_eq!(report.outcome("home.other.org"), Some(&HostOutcome::Updated));
    assert_eq!(provider.updated_record_ids(), vec!["r2".to_string()]);
}

#[tokio::test]
async fn multi_label_suffix_is_grouped_naively() {
    // "home.example.co.uk" groups under "co.uk", which is not a zone
    let provider = MockDnsProvider::new()
        .with_zone("z1", "example.co.uk")
        .with_record("z1", a_record("r1", "home.example.co.uk", "9.9.9.9"));
    let engine = engine_with("1.1.1.1", &provider);

    let report = engine.run_cycle(&config_for("home.example.co.uk")).await.unwrap();

    assert_eq!(report.outcome("home.example.co.uk"), Some(&HostOutcome::ZoneNotFound));
    assert_eq!(provider.update_call_count(), 0);
}

#[tokio::test]
async fn record_names_match_exactly() {
    let provider = MockDnsProvider::new()
        .with_zone("z1", "example.com")
        .with_record("z1", a_record("r1", "Home.example.com", "9.9.9.9"));
    let engine = engine_with("1.1.1.1", &provider);

    let report = engine.run_cycle(&config_for("home.example.com")).await.unwrap();

    assert_eq!(report.outcome("home.example.com"), Some(&HostOutcome::RecordNotFound));
    assert_eq!(provider.update_call_count(), 0);
}
