use chrono::Duration;
use delirium_domain::{EvictionPolicy, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;

mod helpers;
use helpers::{fixed_now, RecordBuilder};

#[test]
fn test_record_is_due_at_expiry_boundary() {
    let now = fixed_now();
    let record = RecordBuilder::new().expires_at(now).build();

    assert!(record.is_due(now));
    assert!(record.is_due(now + Duration::seconds(1)));
    assert!(!record.is_due(now - Duration::seconds(1)));
}

#[test]
fn test_remaining_ttl() {
    let now = fixed_now();
    let record = RecordBuilder::new()
        .expires_at(now + Duration::seconds(300))
        .build();

    assert_eq!(record.remaining_ttl(now), 300);
    assert_eq!(record.remaining_ttl(now + Duration::seconds(100)), 200);
    assert_eq!(record.remaining_ttl(now + Duration::seconds(300)), 0);
    assert_eq!(record.remaining_ttl(now + Duration::seconds(500)), 0);
}

#[test]
fn test_new_record_is_active() {
    let record = RecordBuilder::new().build();
    assert!(record.is_active());

    let marked = RecordBuilder::new().expired(true).build();
    assert!(!marked.is_active());
}

#[test]
fn test_record_serializes_for_audit() {
    let record = RecordBuilder::new().name("audit.test").build();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["name"], "audit.test");
    assert_eq!(json["address"], "10.0.0.1");
    assert_eq!(json["expired"], false);
    assert!(json["expires_at"].as_str().unwrap().starts_with("2024-01-01T12:15:00"));
}

#[test]
fn test_record_type_from_str() {
    assert_eq!(RecordType::from_str("a").unwrap(), RecordType::A);
    assert_eq!(RecordType::from_str("PTR").unwrap(), RecordType::PTR);
    assert_eq!(RecordType::from_str("TYPE65").unwrap(), RecordType::Other(65));
    assert!(RecordType::from_str("BOGUS").is_err());
}

#[test]
fn test_record_type_display() {
    assert_eq!(RecordType::AAAA.to_string(), "AAAA");
    assert_eq!(RecordType::Other(65).to_string(), "TYPE65");
}

#[test]
fn test_eviction_policy_parsing() {
    assert_eq!(EvictionPolicy::from_str("mark").unwrap(), EvictionPolicy::Mark);
    assert_eq!(EvictionPolicy::from_str("DELETE").unwrap(), EvictionPolicy::Delete);
    assert!(EvictionPolicy::from_str("purge").is_err());
    assert_eq!(EvictionPolicy::default(), EvictionPolicy::Mark);
}
