// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::TestPortal;
use tender_dates::domain::models::NoticeLink;
use tender_dates::domain::services::pipeline::{ExtractionPolicy, PipelineOptions};
use tender_dates::engines::traits::TransportError;
use tender_dates::utils::errors::PipelineError;
use wiremock::ResponseTemplate;

fn keys(mapping: &tender_dates::domain::models::ResultMapping) -> Vec<String> {
    mapping.links().map(|l| l.to_string()).collect()
}

#[tokio::test]
async fn test_single_page_two_notices() {
    let portal = TestPortal::start().await;
    portal.mount_search_page(1, &["AAA", "BBB"]).await;
    portal
        .mount_notice_date("AAA", Some("2024-01-01T00:00:00"))
        .await;
    portal.mount_notice_date("BBB", None).await;

    let mapping = portal
        .orchestrator(PipelineOptions::default())
        .run(1)
        .await
        .unwrap();

    assert_eq!(mapping.len(), 2);
    assert_eq!(
        keys(&mapping),
        vec![portal.document_link("AAA"), portal.document_link("BBB")]
    );

    let json = serde_json::to_value(&mapping).unwrap();
    assert_eq!(json[portal.document_link("AAA")], "2024-01-01T00:00:00");
    assert!(json[portal.document_link("BBB")].is_null());
}

#[tokio::test]
async fn test_links_carry_exactly_one_reg_number() {
    let portal = TestPortal::start().await;
    portal
        .mount_search_page(1, &["0373200001224000123", "32413590874"])
        .await;

    let links = portal
        .orchestrator(PipelineOptions::default())
        .discover_all(1)
        .await
        .unwrap();

    let reg_numbers: Vec<Option<String>> = links.iter().map(NoticeLink::reg_number).collect();
    assert_eq!(
        reg_numbers,
        vec![
            Some("0373200001224000123".to_string()),
            Some("32413590874".to_string())
        ]
    );
    for link in &links {
        assert_eq!(link.as_str().matches("regNumber").count(), 1);
    }
}

#[tokio::test]
async fn test_multiple_pages_are_concatenated() {
    let portal = TestPortal::start().await;
    portal.mount_search_page(1, &["P1A", "P1B"]).await;
    portal.mount_search_page(2, &[]).await;
    portal.mount_search_page(3, &["P3A"]).await;
    for reg in ["P1A", "P1B", "P3A"] {
        portal.mount_notice_date(reg, Some(reg)).await;
    }

    let mapping = portal
        .orchestrator(PipelineOptions::default())
        .run(3)
        .await
        .unwrap();

    assert_eq!(
        keys(&mapping),
        vec![
            portal.document_link("P1A"),
            portal.document_link("P1B"),
            portal.document_link("P3A"),
        ]
    );
    assert_eq!(mapping.dated_count(), 3);
}

#[tokio::test]
async fn test_found_status_and_malformed_document_are_absent() {
    let portal = TestPortal::start().await;
    portal.mount_search_page(1, &["MOVED", "BROKEN", "OK"]).await;
    portal
        .mount_notice(
            "MOVED",
            ResponseTemplate::new(302).insert_header("location", "/epz/main/public/error.html"),
        )
        .await;
    portal
        .mount_notice(
            "BROKEN",
            ResponseTemplate::new(200).set_body_string("<html><body>Service unavailable"),
        )
        .await;
    portal.mount_notice_date("OK", Some("2024-05-20T09:00:00")).await;

    let mapping = portal
        .orchestrator(PipelineOptions::default())
        .run(1)
        .await
        .unwrap();

    let json = serde_json::to_value(&mapping).unwrap();
    assert!(json[portal.document_link("MOVED")].is_null());
    assert!(json[portal.document_link("BROKEN")].is_null());
    assert_eq!(json[portal.document_link("OK")], "2024-05-20T09:00:00");
}

#[tokio::test]
async fn test_permanent_redirect_is_followed_to_the_document() {
    let portal = TestPortal::start().await;
    portal.mount_search_page(1, &["OLD"]).await;
    portal
        .mount_notice(
            "OLD",
            ResponseTemplate::new(301).insert_header("location", portal.document_link("NEW").as_str()),
        )
        .await;
    portal.mount_notice_date("NEW", Some("2024-03-03T03:03:03")).await;

    let mapping = portal
        .orchestrator(PipelineOptions::default())
        .run(1)
        .await
        .unwrap();

    assert_eq!(keys(&mapping), vec![portal.document_link("OLD")]);
    let json = serde_json::to_value(&mapping).unwrap();
    assert_eq!(json[portal.document_link("OLD")], "2024-03-03T03:03:03");
}

#[tokio::test]
async fn test_search_failure_aborts_run() {
    let portal = TestPortal::start().await;
    portal.mount_search_page(1, &["AAA"]).await;
    portal.mount_search_status(2, 500).await;
    portal.mount_notice_date("AAA", Some("d")).await;

    let result = portal
        .orchestrator(PipelineOptions::default())
        .run(2)
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::Transport(TransportError::UnexpectedStatus { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_notice_error_status_fail_fast_vs_isolated() {
    let portal = TestPortal::start().await;
    portal.mount_search_page(1, &["GOOD", "DOWN"]).await;
    portal.mount_notice_date("GOOD", Some("2024-02-02T02:02:02")).await;
    portal
        .mount_notice("DOWN", ResponseTemplate::new(503))
        .await;

    let fail_fast = portal
        .orchestrator(PipelineOptions::default())
        .run(1)
        .await;
    assert!(matches!(fail_fast, Err(PipelineError::Transport(_))));

    let isolated = portal
        .orchestrator(PipelineOptions {
            extraction: ExtractionPolicy::Isolated,
            ..PipelineOptions::default()
        })
        .run_with_report(1)
        .await
        .unwrap();

    assert_eq!(isolated.mapping.len(), 2);
    assert_eq!(isolated.mapping.dated_count(), 1);
    assert_eq!(isolated.failures.len(), 1);
    assert_eq!(isolated.failures[0].0.to_string(), portal.document_link("DOWN"));
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let portal = TestPortal::start().await;
    portal.mount_search_page(1, &["AAA", "BBB", "CCC"]).await;
    portal.mount_notice_date("AAA", Some("a")).await;
    portal.mount_notice_date("BBB", None).await;
    portal.mount_notice_date("CCC", Some("c")).await;

    let pipeline = portal.orchestrator(PipelineOptions::default());
    let first = pipeline.run(1).await.unwrap();
    let second = pipeline.run(1).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_settings_drive_pipeline_options() {
    let portal = TestPortal::start().await;
    let settings = portal.settings(&[
        ("PAGE_NUMBER", "4"),
        ("TENDERS__PIPELINE__EXTRACTION_POLICY", "isolated"),
        ("TENDERS__PIPELINE__MAX_IN_FLIGHT", "4"),
    ]);

    assert_eq!(settings.source.page_count, 4);
    let options = settings.pipeline_options().unwrap();
    assert_eq!(options.extraction, ExtractionPolicy::Isolated);
    assert_eq!(options.max_in_flight.map(|n| n.get()), Some(4));

    let profile = settings.source_profile().unwrap();
    assert_eq!(profile.headers["User-Agent"], "tender-dates-tests");
}
