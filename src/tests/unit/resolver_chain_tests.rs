//! Meaning resolution over a mocked remote API.
//!
//! Every stage talks to the same mock server, so fallback order, URL
//! escaping and call counts are all observable.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::corpus::resolver::{AttemptKind, MeaningResolution, ResolverConfig};
use crate::core::corpus::service::PrevNet;
use crate::core::corpus::source::RemoteApiSource;
use crate::core::corpus::types::{Language, MeaningId, OccurrenceRecord};
use crate::tests::common::{api_base, dataset_body, fast_fetcher, mount_dataset};

fn prevnet(server: &MockServer, page_size: usize) -> PrevNet {
    let source = RemoteApiSource::new(&api_base(server), fast_fetcher())
        .unwrap()
        .with_page_size(page_size);
    PrevNet::new(Arc::new(source), &ResolverConfig::default())
}

fn kinds(resolution: &MeaningResolution) -> Vec<AttemptKind> {
    resolution.attempts().iter().map(|a| a.kind).collect()
}

#[tokio::test]
async fn test_falls_through_to_preverb_scan() {
    let server = MockServer::start().await;
    mount_dataset(&server, &[], 1).await;

    Mock::given(method("GET"))
        .and(path("/api/meanings/v%2301410345"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/preverbs/ex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verbal_bases": {"curro": 3},
            "meanings": {"run or move very quickly or hastily": 3},
            "total_occurrences": 3,
            "examples": [{
                "count": 3, "lemma": "Curro",
                "verb_semantics": "run or move very quickly or hastily",
                "meaning_id": "v#01410345"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = prevnet(&server, 500)
        .resolve_meaning(Language::Latin, &MeaningId::new("v#01410345"))
        .await
        .unwrap();

    assert_eq!(
        kinds(&resolution),
        vec![AttemptKind::Unavailable, AttemptKind::Empty, AttemptKind::Found]
    );
    match resolution {
        MeaningResolution::Found { detail, stage, .. } => {
            assert_eq!(stage, "preverb_scan");
            assert_eq!(detail.verb_semantics, "run or move very quickly or hastily");
            assert_eq!(detail.occurrences.len(), 1);
            assert_eq!(detail.occurrences[0].sentence, "exCurro");
            assert_eq!(detail.occurrences[0].verb_token, "excurro");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_direct_lookup_wins_over_scans() {
    let server = MockServer::start().await;
    mount_dataset(&server, &[], 0).await;

    Mock::given(method("GET"))
        .and(path("/api/meanings/v%2301360914"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verb_semantics": "['v#01360914 move ahead; travel onward']",
            "occurrences": [{
                "preverb": "pro", "lemma": "cedo", "sentence": "legio processit",
                "token": "processit", "location_url": null, "author": "Caesar",
                "title": "BG", "century": 1
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/preverbs/.*$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resolution = prevnet(&server, 500)
        .resolve_meaning(Language::Latin, &MeaningId::new("v#01360914"))
        .await
        .unwrap();

    match resolution {
        MeaningResolution::Found { detail, stage, .. } => {
            assert_eq!(stage, "direct_lookup");
            assert_eq!(detail.verb_semantics, "['v#01360914 move ahead; travel onward']");
            assert_eq!(detail.occurrences[0].verb_token, "processit");
            assert_eq!(detail.occurrences[0].century.as_deref(), Some("1"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_direct_lookup_preferred_over_dataset_records() {
    let server = MockServer::start().await;
    let records = vec![OccurrenceRecord::new("ex", "curro")
        .with_verb_semantics("['v#01410345 run']")
        .with_meaning_id("v#01410345")];
    mount_dataset(&server, &records, 0).await;

    Mock::given(method("GET"))
        .and(path("/api/meanings/v%2301410345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verb_semantics": "['v#01410345 run or move very quickly or hastily']",
            "occurrences": [{
                "preverb": "ex", "lemma": "curro", "sentence": "excurrit miles",
                "token": "excurrit"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = prevnet(&server, 500)
        .resolve_meaning(Language::Latin, &MeaningId::new("v#01410345"))
        .await
        .unwrap();

    match resolution {
        MeaningResolution::Found { detail, stage, attempts } => {
            assert_eq!(stage, "direct_lookup");
            assert_eq!(attempts.len(), 1);
            assert_eq!(detail.verb_semantics, "['v#01410345 run or move very quickly or hastily']");
            assert_eq!(detail.occurrences[0].sentence, "excurrit miles");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_scan_filters_dataset() {
    let server = MockServer::start().await;

    // Full record-store load: small pages; never reached once the scan matches.
    Mock::given(method("GET"))
        .and(path("/api/dataset"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset_body(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let records = vec![
        OccurrenceRecord::new("ab", "Abeo")
            .with_verb_semantics("['v#7 go away']")
            .with_meaning_id("v#7"),
        OccurrenceRecord::new("ad", "adeo").with_meaning_id("v#8"),
    ];
    Mock::given(method("GET"))
        .and(path("/api/dataset"))
        .and(query_param("per_page", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset_body(&records)))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = prevnet(&server, 2)
        .resolve_meaning(Language::Latin, &MeaningId::new("v#7"))
        .await
        .unwrap();

    match resolution {
        MeaningResolution::Found { detail, stage, .. } => {
            assert_eq!(stage, "bulk_scan");
            assert_eq!(detail.verb_semantics, "['v#7 go away']");
            assert_eq!(detail.occurrences.len(), 1);
            assert_eq!(detail.occurrences[0].verb_token, "ababeo");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_known_sense_id_unmatched_anywhere_is_not_found() {
    let server = MockServer::start().await;
    mount_dataset(&server, &[], 2).await;

    let resolution = prevnet(&server, 500)
        .resolve_meaning(Language::Latin, &MeaningId::new("v#01420490"))
        .await
        .unwrap();

    assert!(matches!(resolution, MeaningResolution::NotFound { .. }));
    assert!(resolution.verb_semantics().is_none());
}

#[tokio::test]
async fn test_matched_example_without_text_takes_known_gloss() {
    let server = MockServer::start().await;
    mount_dataset(&server, &[], 2).await;
    Mock::given(method("GET"))
        .and(path("/api/preverbs/ex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "examples": [{"count": 1, "lemma": "", "verb_semantics": "", "meaning_id": "v#00235191"}]
        })))
        .mount(&server)
        .await;

    let resolution = prevnet(&server, 500)
        .resolve_meaning(Language::Latin, &MeaningId::new("v#00235191"))
        .await
        .unwrap();

    match resolution {
        MeaningResolution::SemanticsOnly { verb_semantics, stage, .. } => {
            assert_eq!(stage, "preverb_scan");
            assert_eq!(verb_semantics, "come to pass; occur");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_after_every_stage() {
    let server = MockServer::start().await;
    mount_dataset(&server, &[], 2).await;

    let resolution = prevnet(&server, 500)
        .resolve_meaning(Language::Greek, &MeaningId::new("v#99999999"))
        .await
        .unwrap();

    assert!(matches!(resolution, MeaningResolution::NotFound { .. }));
    assert_eq!(resolution.attempts().len(), 4);
    assert_eq!(resolution.attempts()[3].stage, "record_store");
    assert_eq!(resolution.attempts()[3].kind, AttemptKind::Empty);
    assert!(resolution.source_unavailable());
}

#[tokio::test]
async fn test_unreachable_source_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resolution = prevnet(&server, 500)
        .resolve_meaning(Language::Latin, &MeaningId::new("v#42"))
        .await
        .unwrap();

    assert!(resolution.source_unavailable());
    assert_eq!(
        kinds(&resolution),
        vec![
            AttemptKind::Unavailable,
            AttemptKind::Unavailable,
            AttemptKind::Unavailable,
            AttemptKind::Unavailable,
        ]
    );
}
