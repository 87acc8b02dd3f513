//! Address Filter Tests

use std::net::{IpAddr, Ipv4Addr};

use smdr_collector::network::AddressFilter;

fn filter_for(ip: [u8; 4]) -> AddressFilter {
    AddressFilter::new(Some(IpAddr::V4(Ipv4Addr::from(ip))))
}

#[test]
fn test_unconfigured_admits_everything() {
    let filter = AddressFilter::allow_all();

    assert!(!filter.is_restricted());
    assert!(filter.admits("10.0.0.5:51324"));
    assert!(filter.admits("192.168.1.1:1"));
    assert!(filter.admits("unknown"));
}

#[test]
fn test_none_is_unrestricted() {
    assert!(AddressFilter::new(None).admits("10.0.0.6:9999"));
}

#[test]
fn test_configured_admits_matching_source() {
    let filter = filter_for([10, 0, 0, 5]);

    assert!(filter.is_restricted());
    assert!(filter.admits("10.0.0.5:51324"));
}

#[test]
fn test_configured_rejects_other_source() {
    let filter = filter_for([10, 0, 0, 5]);

    assert!(!filter.admits("10.0.0.6:9999"));
    assert!(!filter.admits("127.0.0.1:514"));
}

#[test]
fn test_match_is_substring_containment() {
    // Loose on purpose: 10.0.0.50 contains 10.0.0.5
    let filter = filter_for([10, 0, 0, 5]);

    assert!(filter.admits("10.0.0.50:1234"));
}
