//! Record fixtures and mock-server helpers.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::corpus::fetch::{Fetcher, RetryPolicy};
use crate::core::corpus::types::OccurrenceRecord;

/// The three-record "ab" scenario: abeo twice, aufero once.
pub fn ab_records() -> Vec<OccurrenceRecord> {
    vec![
        OccurrenceRecord::new("ab", "abeo")
            .with_verb_semantics("['v#01 go away']")
            .with_preverb_semantics("away")
            .with_sentence("miles abiit", "abiit"),
        OccurrenceRecord::new("ab", "abeo")
            .with_verb_semantics("['v#01 go away']")
            .with_preverb_semantics("away, from")
            .with_sentence("abeunt omnes", "abeunt"),
        OccurrenceRecord::new("ab", "aufero")
            .with_verb_semantics("['v#02 take away']")
            .with_preverb_semantics("completive")
            .with_literal(true)
            .with_sentence("praedam abstulit", "abstulit"),
    ]
}

/// A small Latin collection spanning several preverbs.
pub fn latin_sample() -> Vec<OccurrenceRecord> {
    let mut records = ab_records();
    records.push(
        OccurrenceRecord::new("in", "invenio")
            .with_verb_semantics("come upon")
            .with_sentence("milites in agros invenerunt", "invenerunt")
            .with_language("Latin"),
    );
    records.push(OccurrenceRecord::new("ad", "adeo").with_verb_semantics("go to"));
    records
}

/// No retries and a short timeout, so failure paths stay fast.
pub fn fast_fetcher() -> Fetcher {
    Fetcher::new(RetryPolicy::none().timeout_ms(2_000))
}

/// `dataset` response body holding `records` as a single page.
pub fn dataset_body(records: &[OccurrenceRecord]) -> Value {
    json!({
        "data": records,
        "total": records.len(),
        "page": 1,
        "per_page": 500,
    })
}

/// Serve `records` from `/api/dataset`, expecting `calls` requests.
pub async fn mount_dataset(server: &MockServer, records: &[OccurrenceRecord], calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/dataset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset_body(records)))
        .expect(calls)
        .mount(server)
        .await;
}

pub fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}
