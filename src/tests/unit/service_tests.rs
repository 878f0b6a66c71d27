//! Facade tests over a scripted `DataSource`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::corpus::error::CorpusError;
use crate::core::corpus::resolver::{MeaningResolution, ResolverConfig};
use crate::core::corpus::service::PrevNet;
use crate::core::corpus::source::SourceKind;
use crate::core::corpus::types::{Language, MeaningDetail, MeaningId, OccurrenceRecord};
use crate::tests::common::{ab_records, latin_sample};
use crate::tests::mocks::{source_of_kind, without_remote_capabilities};

fn prevnet(source: crate::tests::mocks::MockSource) -> PrevNet {
    PrevNet::new(Arc::new(source), &ResolverConfig::default())
}

#[tokio::test]
async fn test_empty_collection_lists_no_preverbs() {
    let mut source = source_of_kind(SourceKind::LocalStatic);
    source.expect_load_records().times(1).returning(|_| Ok(Vec::new()));
    let prevnet = prevnet(source);

    assert!(prevnet.list_preverbs(Language::Latin).await.unwrap().is_empty());
    assert!(prevnet.list_preverbs(Language::Latin).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_preverbs_in_display_order() {
    let mut source = source_of_kind(SourceKind::LocalStatic);
    source.expect_load_records().times(1).returning(|_| Ok(latin_sample()));
    let prevnet = prevnet(source);

    assert_eq!(prevnet.list_preverbs(Language::Latin).await.unwrap(), vec!["ab", "ad", "in"]);
}

#[tokio::test]
async fn test_failed_load_surfaces_then_recovers() {
    let calls = AtomicUsize::new(0);
    let mut source = source_of_kind(SourceKind::RemoteCsv);
    source.expect_load_records().times(2).returning(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(CorpusError::SourceUnavailable {
                url: "mock://preverbs.csv".into(),
                attempts: 3,
                reason: "HTTP 503".into(),
            })
        } else {
            Ok(ab_records())
        }
    });
    let prevnet = prevnet(source);

    let err = prevnet.get_aggregate(Language::Latin, "ab").await.unwrap_err();
    assert!(err.is_source_unavailable());

    let view = prevnet.get_aggregate(Language::Latin, "ab").await.unwrap();
    assert_eq!(view.total_occurrences, 3);
}

#[tokio::test]
async fn test_aggregate_reference_scenario() {
    let mut source = source_of_kind(SourceKind::LocalStatic);
    source.expect_load_records().times(1).returning(|_| Ok(latin_sample()));
    let prevnet = prevnet(source);

    let view = prevnet.get_aggregate(Language::Latin, "AB").await.unwrap();
    assert_eq!(view.total_occurrences, 3);
    assert_eq!(view.verbal_bases.get("abeo"), Some(&2));
    assert_eq!(view.verbal_bases.get("aufero"), Some(&1));
    assert_eq!(view.meanings.get("go away"), Some(&2));
    assert_eq!(view.meanings.get("take away"), Some(&1));
    assert_eq!(view.preverb_meanings.get("away"), Some(&2));
    assert_eq!(view.preverb_meanings.get("from"), Some(&1));
    assert_eq!(view.literal_meanings.literal, 3);

    let empty = prevnet.get_aggregate(Language::Latin, "trans").await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_synthesized_id_round_trip() {
    let mut source = source_of_kind(SourceKind::LocalStatic);
    source.expect_load_records().times(1).returning(|_| Ok(ab_records()));
    without_remote_capabilities(&mut source);
    let prevnet = prevnet(source);

    let view = prevnet.get_aggregate(Language::Latin, "ab").await.unwrap();
    for example in &view.examples {
        let id = MeaningId::new(example.meaning_id.clone());
        let resolution = prevnet.resolve_meaning(Language::Latin, &id).await.unwrap();
        let detail = resolution.detail().expect("example must resolve");
        assert!(detail.occurrences.iter().any(|r| r.lemma == example.lemma));
        assert_eq!(detail.verb_semantics, example.verb_semantics);
    }
}

#[tokio::test]
async fn test_malformed_id_never_touches_source() {
    let mut source = source_of_kind(SourceKind::LocalStatic);
    source.expect_load_records().never();
    let prevnet = prevnet(source);

    let err = prevnet
        .resolve_meaning(Language::Latin, &MeaningId::new("v#01410345"))
        .await
        .unwrap_err();
    assert!(matches!(err, CorpusError::MalformedMeaningId { .. }));
}

#[tokio::test]
async fn test_direct_lookup_runs_before_record_store() {
    let mut source = source_of_kind(SourceKind::RemoteApi);
    source.expect_load_records().never();
    source
        .expect_meaning_detail()
        .withf(|id| id.as_str() == "v#01420490")
        .times(1)
        .returning(|_| {
            Ok(MeaningDetail {
                verb_semantics: "['v#01420490 to run away']".into(),
                occurrences: vec![OccurrenceRecord::new("ex", "fugio")],
            })
        });
    source.expect_dataset_page().never();
    source.expect_preverb_summary().never();
    let prevnet = prevnet(source);

    let resolution = prevnet
        .resolve_meaning(Language::Latin, &MeaningId::new("v#01420490"))
        .await
        .unwrap();
    match resolution {
        MeaningResolution::Found { detail, stage, .. } => {
            assert_eq!(stage, "direct_lookup");
            assert_eq!(detail.verb_semantics, "['v#01420490 to run away']");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_highlight_through_facade() {
    let prevnet = prevnet(source_of_kind(SourceKind::LocalStatic));
    let result = prevnet.highlight(Language::Latin, "milites in agros invenerunt", "invenio");
    assert_eq!(result.highlighted_spans(), vec!["invenerunt"]);
    assert_eq!(result.to_markup("<b>", "</b>"), "milites in agros <b>invenerunt</b>");
}
