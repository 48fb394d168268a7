//! Contract Test: Record Listing
//!
//! Verifies how backend text entries become endpoints:
//! - Host entries sharing a domain and family aggregate in encounter order
//! - Alias TTLs are kept when numeric and left unset otherwise
//! - Malformed entries are skipped without failing the listing
//! - Unsupported kinds fail before any request

mod common;

use common::*;
use holesync_core::{DomainFilter, Endpoint, Error, RecordProvider, RecordType};

const HOSTS: &[&str] = &[
    "192.168.178.33 service1.example.com",
    "192.168.178.34 service2.example.com",
    "192.168.178.34 service3.example.com",
    "192.168.178.35 service8.example.com",
    "192.168.178.36 service8.example.com",
    "fc00::1:192:168:1:1 service4.example.com",
    "fc00::1:192:168:1:2 service5.example.com",
    "fc00::1:192:168:1:3 service6.example.com",
    "::ffff:192.168.20.3 service7.example.com",
    "fc00::1:192:168:1:4 service9.example.com",
    "fc00::1:192:168:1:5 service9.example.com",
    "192.168.20.3 service7.example.com",
];

fn targets_of<'a>(records: &'a [Endpoint], name: &str) -> &'a [String] {
    &records
        .iter()
        .find(|r| r.dns_name == name)
        .unwrap_or_else(|| panic!("missing record {}", name))
        .targets
}

#[tokio::test]
async fn address_records_aggregate_per_domain() {
    let server = wiremock::MockServer::start().await;
    mount_listing(&server, "hosts", hosts_body(HOSTS)).await;
    let provider = provider(&server);

    let records = provider.list_records(&ctx(), &RecordType::A).await.unwrap();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.record_type == RecordType::A));
    assert_eq!(targets_of(&records, "service1.example.com"), ["192.168.178.33"]);
    assert_eq!(targets_of(&records, "service3.example.com"), ["192.168.178.34"]);
    assert_eq!(targets_of(&records, "service7.example.com"), ["192.168.20.3"]);
    assert_eq!(
        targets_of(&records, "service8.example.com"),
        ["192.168.178.35", "192.168.178.36"]
    );

    let records = provider.list_records(&ctx(), &RecordType::Aaaa).await.unwrap();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.record_type == RecordType::Aaaa));
    assert_eq!(targets_of(&records, "service7.example.com"), ["::ffff:192.168.20.3"]);
    assert_eq!(
        targets_of(&records, "service9.example.com"),
        ["fc00::1:192:168:1:4", "fc00::1:192:168:1:5"]
    );
}

#[tokio::test]
async fn alias_records_keep_optional_ttl() {
    let server = wiremock::MockServer::start().await;
    mount_listing(
        &server,
        "cnameRecords",
        cname_body(&[
            "source1.example.com,target1.domain.com,1000",
            "source2.example.com,target2.domain.com,50",
            "source3.example.com,target3.domain.com",
        ]),
    )
    .await;
    let provider = provider(&server);

    let records = provider.list_records(&ctx(), &RecordType::Cname).await.unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].dns_name, "source1.example.com");
    assert_eq!(records[0].targets, ["target1.domain.com"]);
    assert_eq!(records[0].record_ttl, Some(1000));
    assert_eq!(records[1].record_ttl, Some(50));
    assert_eq!(records[2].dns_name, "source3.example.com");
    assert_eq!(records[2].record_ttl, None);
}

#[tokio::test]
async fn malformed_entries_are_skipped() {
    let server = wiremock::MockServer::start().await;
    mount_listing(&server, "hosts", hosts_body(&["192.168.178.33"])).await;
    mount_listing(
        &server,
        "cnameRecords",
        cname_body(&[
            "source1.example.com,target1.domain.com,100",
            "source2.example.com,target2.domain.com,not_an_integer",
        ]),
    )
    .await;
    let provider = provider(&server);

    let records = provider.list_records(&ctx(), &RecordType::A).await.unwrap();
    assert!(records.is_empty());

    let records = provider.list_records(&ctx(), &RecordType::Cname).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].record_ttl, Some(100));
    assert_eq!(records[1].dns_name, "source2.example.com");
    assert_eq!(records[1].targets, ["target2.domain.com"]);
    assert_eq!(records[1].record_ttl, None);
}

#[tokio::test]
async fn unsupported_kind_fails_without_request() {
    let server = wiremock::MockServer::start().await;
    expect_no_requests(&server).await;
    let provider = provider(&server);

    let err = provider
        .list_records(&ctx(), &RecordType::Other("NAPTR".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "unsupported record type: NAPTR");
}

#[tokio::test]
async fn non_json_listing_is_an_unmarshal_error() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::any())
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("I am not JSON"))
        .mount(&server)
        .await;
    let provider = provider(&server);

    let err = provider.list_records(&ctx(), &RecordType::A).await.unwrap_err();
    assert!(
        err.to_string().starts_with("failed to unmarshal error response:"),
        "got: {}",
        err
    );
}

#[tokio::test]
async fn invalid_server_address_fails_listing() {
    let provider = holesync_provider_pihole::PiholeProvider::new(holesync_core::PiholeConfig::new("not an url")).unwrap();

    let err = provider.list_records(&ctx(), &RecordType::Cname).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got: {}", err);
}

#[tokio::test]
async fn cancelled_context_fails_listing() {
    let server = wiremock::MockServer::start().await;
    expect_no_requests(&server).await;
    let provider = provider(&server);

    let ctx = ctx();
    ctx.cancel();
    let err = provider.list_records(&ctx, &RecordType::A).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn listing_honours_domain_filter() {
    let server = wiremock::MockServer::start().await;
    mount_listing(
        &server,
        "hosts",
        hosts_body(&["192.168.1.1 nas.home.example.com", "192.168.1.2 printer.office.example.org"]),
    )
    .await;
    let provider = provider_with(&server, |c| c.with_domain_filter(DomainFilter::new(["example.com"])));

    let records = provider.list_records(&ctx(), &RecordType::A).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].dns_name, "nas.home.example.com");
}
