//! Core data models for the corpus layer.
//!
//! The flat [`OccurrenceRecord`] is the unit every source variant decodes
//! into. [`PreverbAggregate`] and [`MeaningDetail`] are derived views,
//! recomputed per request and never cached.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::CorpusError;

// ============================================================================
// Language
// ============================================================================

/// Source language of a record collection. Also the Record Store cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Latin,
    Greek,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Latin, Language::Greek];

    /// Lowercase identifier, used in file names and synthesized meaning IDs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Latin => "latin",
            Language::Greek => "greek",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Latin => "Latin",
            Language::Greek => "Ancient Greek",
        }
    }

    /// Whether a free-form `language` column value names this language.
    ///
    /// Source files spell languages inconsistently ("Latin", "latin",
    /// "Ancient Greek", "grc"), so this is a loose match.
    pub fn matches_label(&self, value: &str) -> bool {
        let value = value.trim().to_lowercase();
        match self {
            Language::Latin => value == "la" || value == "lat" || value.contains("latin"),
            Language::Greek => value == "grc" || value == "gr" || value.contains("greek"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latin" | "la" | "lat" => Ok(Language::Latin),
            "greek" | "grc" | "ancient greek" => Ok(Language::Greek),
            other => Err(CorpusError::UnknownLanguage(other.to_string())),
        }
    }
}

// ============================================================================
// OccurrenceRecord
// ============================================================================

/// One attested preverb+verb usage in a text.
///
/// Field names follow the dataset columns; the aliases cover the
/// meaning-detail endpoint (`token`, `location_url`) and the plain CSV
/// layout (`lang`, `lang_period`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    #[serde(default, deserialize_with = "de_string")]
    pub preverb: String,
    #[serde(default, deserialize_with = "de_string")]
    pub lemma: String,
    #[serde(default, alias = "token", deserialize_with = "de_string")]
    pub verb_token: String,
    #[serde(default, deserialize_with = "de_string")]
    pub sentence: String,
    #[serde(default, deserialize_with = "de_string")]
    pub preverb_semantics: String,
    #[serde(default, deserialize_with = "de_string")]
    pub verb_semantics: String,
    /// Explicit literalness annotation. `None` means the heuristic applies.
    #[serde(default, deserialize_with = "de_opt_bool")]
    pub literal_meaning: Option<bool>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub century: Option<String>,
    #[serde(default, alias = "lang", deserialize_with = "de_opt_string")]
    pub language: Option<String>,
    #[serde(default, alias = "lang_period", deserialize_with = "de_opt_string")]
    pub language_period: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub longitude: Option<String>,
    #[serde(default, alias = "whg_url", deserialize_with = "de_opt_string")]
    pub location_url: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub meaning_id: Option<String>,
}

impl OccurrenceRecord {
    /// Minimal record; mostly for tests and reconstructed occurrences.
    pub fn new(preverb: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            preverb: preverb.into(),
            lemma: lemma.into(),
            ..Default::default()
        }
    }

    pub fn with_verb_semantics(mut self, semantics: impl Into<String>) -> Self {
        self.verb_semantics = semantics.into();
        self
    }

    pub fn with_preverb_semantics(mut self, semantics: impl Into<String>) -> Self {
        self.preverb_semantics = semantics.into();
        self
    }

    pub fn with_literal(mut self, literal: bool) -> Self {
        self.literal_meaning = Some(literal);
        self
    }

    pub fn with_sentence(mut self, sentence: impl Into<String>, token: impl Into<String>) -> Self {
        self.sentence = sentence.into();
        self.verb_token = token.into();
        self
    }

    pub fn with_meaning_id(mut self, id: impl Into<String>) -> Self {
        self.meaning_id = Some(id.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Records without a preverb or lemma cannot be aggregated.
    pub fn is_usable(&self) -> bool {
        !self.preverb.trim().is_empty() && !self.lemma.trim().is_empty()
    }

    /// Whether the record belongs to `language`.
    ///
    /// Records that carry no language column are kept: their file was
    /// already selected for the language.
    pub fn is_language(&self, language: Language) -> bool {
        match self.language.as_deref() {
            Some(value) => language.matches_label(value),
            None => true,
        }
    }

    pub fn preverb_eq(&self, preverb: &str) -> bool {
        self.preverb.trim().to_lowercase() == preverb.trim().to_lowercase()
    }
}

// ============================================================================
// Lenient field decoding
// ============================================================================

/// Render a scalar JSON value as text. Empty strings and `null` become `None`.
fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

pub(crate) fn parse_bool_text(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn de_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        Value::String(s) => parse_bool_text(&s),
        _ => None,
    })
}

// ============================================================================
// MeaningId
// ============================================================================

/// Identifier grouping occurrences that share one verb sense.
///
/// Either opaque (issued by the remote API, e.g. `v#01410345`) or
/// synthesized locally as `{preverb}_{lemma}_{language}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeaningId(String);

/// The parts of a synthesized meaning ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedMeaningId {
    pub preverb: String,
    pub lemma: String,
    pub language: Language,
}

impl MeaningId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Stable ID for a (preverb, lemma, language) triple.
    pub fn synthesize(preverb: &str, lemma: &str, language: Language) -> Self {
        Self(format!("{}_{}_{}", preverb, lemma, language.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Split a synthesized ID back into its parts.
    ///
    /// The lemma is everything between the first and the last part, so
    /// lemmas containing underscores survive. When the last part is not a
    /// language name, the whole remainder is the lemma and
    /// `default_language` applies.
    pub fn parse_synthesized(&self, default_language: Language) -> Option<SynthesizedMeaningId> {
        let parts: Vec<&str> = self.0.split('_').collect();
        if parts.len() < 2 {
            return None;
        }

        let preverb = parts[0].trim();
        let last = parts[parts.len() - 1];
        let suffix_language = match last.to_lowercase().as_str() {
            "latin" => Some(Language::Latin),
            "greek" => Some(Language::Greek),
            _ => None,
        };

        let (lemma, language) = match suffix_language {
            Some(language) if parts.len() >= 3 => (parts[1..parts.len() - 1].join("_"), language),
            _ => (parts[1..].join("_"), default_language),
        };

        if preverb.is_empty() || lemma.trim().is_empty() {
            return None;
        }

        Some(SynthesizedMeaningId {
            preverb: preverb.to_string(),
            lemma,
            language,
        })
    }
}

impl fmt::Display for MeaningId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MeaningId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MeaningId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Derived Views
// ============================================================================

/// Label → count, ordered by descending count (ties keep first appearance).
pub type Distribution = IndexMap<String, usize>;

/// Literal / non-literal tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralSplit {
    #[serde(rename = "LITERAL")]
    pub literal: usize,
    #[serde(rename = "NON-LITERAL")]
    pub non_literal: usize,
}

impl LiteralSplit {
    pub fn total(&self) -> usize {
        self.literal + self.non_literal
    }
}

/// One row of the examples table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleRow {
    #[serde(default, deserialize_with = "de_string")]
    pub lemma: String,
    #[serde(default, deserialize_with = "de_string")]
    pub verb_semantics: String,
    #[serde(default, deserialize_with = "de_string")]
    pub meaning_id: String,
    #[serde(default)]
    pub count: usize,
}

/// Aggregated Preverb View.
///
/// Also the wire shape of the remote API's per-preverb resource, which
/// omits the sense and literalness distributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreverbAggregate {
    #[serde(default)]
    pub preverb: String,
    #[serde(default)]
    pub verbal_bases: Distribution,
    #[serde(default)]
    pub meanings: Distribution,
    #[serde(default)]
    pub preverb_meanings: Distribution,
    #[serde(default)]
    pub literal_meanings: LiteralSplit,
    #[serde(default)]
    pub total_occurrences: usize,
    #[serde(default)]
    pub examples: Vec<ExampleRow>,
}

impl PreverbAggregate {
    /// Zeroed view for a preverb with no matching records.
    pub fn empty(preverb: impl Into<String>) -> Self {
        Self {
            preverb: preverb.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_occurrences == 0
    }
}

/// Meaning Detail View: canonical meaning text plus its occurrences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeaningDetail {
    #[serde(default, deserialize_with = "de_string")]
    pub verb_semantics: String,
    #[serde(default)]
    pub occurrences: Vec<OccurrenceRecord>,
}

/// One page of the remote bulk-dataset resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetPage {
    #[serde(default)]
    pub data: Vec<OccurrenceRecord>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub per_page: usize,
}
