//! Mock implementations for testing
//!
//! A `mockall` double for [`DataSource`], so facade and resolver tests can
//! script each capability and assert how often it is called.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;

use crate::core::corpus::error::{CorpusError, Result};
use crate::core::corpus::source::{DataSource, SourceKind};
use crate::core::corpus::types::{DatasetPage, Language, MeaningDetail, MeaningId, OccurrenceRecord, PreverbAggregate};

mock! {
    pub Source {}

    #[async_trait]
    impl DataSource for Source {
        fn kind(&self) -> SourceKind;
        async fn load_records(&self, language: Language) -> Result<Vec<OccurrenceRecord>>;
        async fn meaning_detail(&self, id: &MeaningId) -> Result<MeaningDetail>;
        async fn dataset_page(&self, page: usize, per_page: usize) -> Result<DatasetPage>;
        async fn preverb_summary(&self, preverb: &str) -> Result<PreverbAggregate>;
    }
}

/// A mock of `kind` whose other capabilities must be scripted per test.
pub fn source_of_kind(kind: SourceKind) -> MockSource {
    let mut source = MockSource::new();
    source.expect_kind().return_const(kind);
    source
}

/// Script every network-only capability as unsupported, the way local
/// sources answer them.
pub fn without_remote_capabilities(source: &mut MockSource) {
    fn unsupported(operation: &'static str) -> CorpusError {
        CorpusError::Unsupported {
            source_kind: "mock",
            operation,
        }
    }
    source
        .expect_meaning_detail()
        .returning(|_| Err(unsupported("meaning_detail")));
    source
        .expect_dataset_page()
        .returning(|_, _| Err(unsupported("dataset_page")));
    source
        .expect_preverb_summary()
        .returning(|_| Err(unsupported("preverb_summary")));
}
