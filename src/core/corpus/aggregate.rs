//! Aggregator: frequency distributions for one preverb.
//!
//! Pure functions over a record slice. Records without a preverb or lemma
//! are dropped silently; an empty selection yields a zeroed view.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::preverbs;
use super::semantics::{classify_literal, normalize_verb_semantics, split_preverb_senses, Literalness};
use super::types::{Distribution, ExampleRow, Language, LiteralSplit, MeaningId, OccurrenceRecord, PreverbAggregate};

pub const DEFAULT_EXAMPLES_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregator {
    /// Maximum number of example rows.
    pub examples_limit: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            examples_limit: DEFAULT_EXAMPLES_LIMIT,
        }
    }
}

impl Aggregator {
    pub fn new(examples_limit: usize) -> Self {
        Self { examples_limit }
    }

    /// Aggregated view of `records` for `preverb` (case-insensitive).
    pub fn aggregate(&self, records: &[OccurrenceRecord], preverb: &str, language: Language) -> PreverbAggregate {
        let selected: Vec<&OccurrenceRecord> = records
            .iter()
            .filter(|r| r.is_usable() && r.preverb_eq(preverb))
            .collect();

        if selected.is_empty() {
            return PreverbAggregate::empty(preverb);
        }

        let mut verbal_bases = Distribution::new();
        let mut meanings = Distribution::new();
        let mut preverb_meanings = Distribution::new();
        let mut literal_meanings = LiteralSplit::default();

        for record in &selected {
            *verbal_bases.entry(record.lemma.clone()).or_default() += 1;
            *meanings.entry(normalize_verb_semantics(&record.verb_semantics)).or_default() += 1;

            for sense in split_preverb_senses(&record.preverb_semantics) {
                *preverb_meanings.entry(sense.to_string()).or_default() += 1;
            }

            match classify_literal(record) {
                Literalness::Literal => literal_meanings.literal += 1,
                Literalness::NonLiteral => literal_meanings.non_literal += 1,
                Literalness::Unclassified => {}
            }
        }

        PreverbAggregate {
            preverb: preverb.to_string(),
            verbal_bases: by_count(verbal_bases),
            meanings: by_count(meanings),
            preverb_meanings: by_count(preverb_meanings),
            literal_meanings,
            total_occurrences: selected.len(),
            examples: self.examples(&selected, preverb, language),
        }
    }

    /// One row per lemma: its first record's meaning, its record count, and
    /// the record's meaning ID or a synthesized one.
    fn examples(&self, selected: &[&OccurrenceRecord], preverb: &str, language: Language) -> Vec<ExampleRow> {
        let mut by_lemma: IndexMap<&str, ExampleRow> = IndexMap::new();

        for record in selected {
            by_lemma
                .entry(record.lemma.as_str())
                .and_modify(|row| row.count += 1)
                .or_insert_with(|| ExampleRow {
                    lemma: record.lemma.clone(),
                    verb_semantics: normalize_verb_semantics(&record.verb_semantics),
                    meaning_id: record
                        .meaning_id
                        .clone()
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| MeaningId::synthesize(preverb, &record.lemma, language).to_string()),
                    count: 1,
                });
        }

        let mut rows: Vec<ExampleRow> = by_lemma.into_values().collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(self.examples_limit);
        rows
    }
}

/// Distinct preverbs in `records`, in display order for `language`.
pub fn list_preverbs(records: &[OccurrenceRecord], language: Language) -> Vec<String> {
    let mut seen: IndexMap<String, ()> = IndexMap::new();
    for record in records {
        let preverb = record.preverb.trim();
        if !preverb.is_empty() {
            seen.entry(preverb.to_string()).or_default();
        }
    }

    let mut list: Vec<String> = seen.into_keys().collect();
    preverbs::sort_for_display(language, &mut list);
    list
}

fn by_count(mut distribution: Distribution) -> Distribution {
    distribution.sort_by(|_, a, _, b| b.cmp(a));
    distribution
}
