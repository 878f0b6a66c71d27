//! Property-based tests for the semantics helpers
//!
//! Tests invariants:
//! - `['v#NNN gloss']` and friends normalise to `gloss`
//! - Normalising twice changes nothing
//! - Splitting joined senses gives the senses back
//! - The explicit literal flag always wins

use proptest::prelude::*;

use crate::core::corpus::semantics::{
    classify_literal, normalize_verb_semantics, split_preverb_senses, Literalness,
};
use crate::core::corpus::types::OccurrenceRecord;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// A plain gloss: lowercase words separated by single spaces.
fn arb_gloss() -> impl Strategy<Value = String> {
    "[a-z]{1,10}( [a-z]{1,10}){0,3}"
}

/// A gloss wrapped the ways the data sources wrap it.
fn arb_decorated() -> impl Strategy<Value = (String, String)> {
    (arb_gloss(), "[0-9]{2,8}", 0usize..4).prop_map(|(gloss, code, style)| {
        let raw = match style {
            0 => format!("['v#{code} {gloss}']"),
            1 => format!("[\"v#{code} {gloss}\"]"),
            2 => format!("v#{code} {gloss}"),
            _ => format!("  {gloss} "),
        };
        (raw, gloss)
    })
}

fn arb_senses() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}( [a-z]{1,8})?", 1..6)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_decorated_semantics_normalise_to_gloss((raw, gloss) in arb_decorated()) {
        prop_assert_eq!(normalize_verb_semantics(&raw), gloss);
    }

    #[test]
    fn prop_normalisation_is_idempotent((raw, _gloss) in arb_decorated()) {
        let once = normalize_verb_semantics(&raw);
        prop_assert_eq!(normalize_verb_semantics(&once), once.clone());
        prop_assert!(!once.contains("v#"));
    }

    #[test]
    fn prop_joined_senses_split_back(senses in arb_senses()) {
        let joined = senses.join(", ");
        let split: Vec<String> = split_preverb_senses(&joined).into_iter().map(String::from).collect();
        prop_assert_eq!(split, senses);
    }

    #[test]
    fn prop_senses_are_trimmed_and_comma_free(raw in "[a-z ,]{0,40}") {
        for sense in split_preverb_senses(&raw) {
            prop_assert!(!sense.is_empty());
            prop_assert_eq!(sense, sense.trim());
            prop_assert!(!sense.contains(','));
        }
    }

    #[test]
    fn prop_explicit_flag_overrides_keywords(semantics in "[a-z ,]{0,30}", flag in any::<bool>()) {
        let record = OccurrenceRecord::new("ab", "abeo")
            .with_preverb_semantics(semantics)
            .with_literal(flag);
        let expected = if flag { Literalness::Literal } else { Literalness::NonLiteral };
        prop_assert_eq!(classify_literal(&record), expected);
    }
}
