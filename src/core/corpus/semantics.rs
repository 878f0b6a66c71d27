//! Text normalisation and classification over annotation columns.
//!
//! The literal/non-literal heuristic is a keyword approximation kept
//! exactly as published. It is not a linguistic classifier: plain substring
//! tests mean "to" also fires inside "into" or "towards".

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::OccurrenceRecord;

/// Leading `[` / trailing `]` of a list-encoded semantics string.
static LIST_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[|\]\s*$").expect("Invalid list bracket regex"));

/// Embedded sense codes such as `'v#01410345 `.
static SENSE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]?v#\d+\s*"#).expect("Invalid sense code regex"));

static QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]"#).expect("Invalid quote regex"));

static SENSE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*").expect("Invalid sense separator regex"));

/// Spatial/directional keywords that mark a preverb sense as literal.
pub const LITERAL_KEYWORDS: [&str; 21] = [
    "away", "from", "towards", "to", "into", "out", "through", "across", "up", "down", "on",
    "off", "over", "under", "in front", "behind", "before", "after", "around", "together",
    "apart",
];

/// Strip list/ID-tag decoration from a `verb_semantics` value.
///
/// `"['v#0141 run fast']"` and `"v#0141 run fast"` both become `"run fast"`.
pub fn normalize_verb_semantics(raw: &str) -> String {
    let text = LIST_BRACKETS.replace_all(raw, "");
    let text = SENSE_CODE.replace_all(&text, "");
    let text = QUOTES.replace_all(&text, "");
    text.trim().to_string()
}

/// Individual senses of a comma-separated `preverb_semantics` value.
pub fn split_preverb_senses(raw: &str) -> Vec<&str> {
    SENSE_SEPARATOR
        .split(raw)
        .map(str::trim)
        .filter(|sense| !sense.is_empty())
        .collect()
}

/// Outcome of literalness classification for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literalness {
    Literal,
    NonLiteral,
    /// No explicit flag and no preverb semantics to inspect; not counted.
    Unclassified,
}

/// Keyword test over lowercased preverb semantics.
pub fn has_literal_keyword(preverb_semantics: &str) -> bool {
    let lowered = preverb_semantics.to_lowercase();
    LITERAL_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Classify a record. The explicit `literal_meaning` flag always wins.
pub fn classify_literal(record: &OccurrenceRecord) -> Literalness {
    match record.literal_meaning {
        Some(true) => Literalness::Literal,
        Some(false) => Literalness::NonLiteral,
        None if record.preverb_semantics.is_empty() => Literalness::Unclassified,
        None if has_literal_keyword(&record.preverb_semantics) => Literalness::Literal,
        None => Literalness::NonLiteral,
    }
}
