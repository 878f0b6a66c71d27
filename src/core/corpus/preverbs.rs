//! Canonical preverb inventories.
//!
//! One list per language, shared by the resolver's per-preverb scan and
//! the highlighter's prefix detection.

use std::cmp::Ordering;

use super::types::Language;

/// Latin preverbs, alphabetical.
pub const LATIN_PREVERBS: &[&str] = &[
    "ab", "ad", "ante", "circum", "com", "contra", "de", "dis", "e", "ex", "extra", "in", "inter",
    "intro", "ob", "per", "post", "prae", "praeter", "pro", "re", "retro", "se", "sub", "super",
    "trans",
];

/// Greek preverbs in display order.
pub const GREEK_PREVERBS: &[&str] = &[
    "ἀνά", "ἀντί", "ἀπό", "διά", "εἰς", "ἐκ", "ἐν", "ἐπί", "κατά", "μετά", "παρά", "περί", "πρό",
    "πρός", "σύν", "ὑπό",
];

/// The canonical preverb list for `language`.
pub fn canonical(language: Language) -> &'static [&'static str] {
    match language {
        Language::Latin => LATIN_PREVERBS,
        Language::Greek => GREEK_PREVERBS,
    }
}

/// Display ordering for a preverb list.
///
/// Latin sorts alphabetically. Greek follows the canonical order, with
/// preverbs outside it placed after, alphabetically.
pub fn sort_for_display(language: Language, preverbs: &mut [String]) {
    match language {
        Language::Latin => preverbs.sort(),
        Language::Greek => preverbs.sort_by(|a, b| compare_greek(a, b)),
    }
}

fn compare_greek(a: &str, b: &str) -> Ordering {
    let rank = |p: &str| GREEK_PREVERBS.iter().position(|known| *known == p);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Split a token into `(preverb, remainder)` if it starts with a known preverb.
///
/// Longest preverb wins so `praeter-` is not read as `prae-`. The remainder
/// must keep at least `min_remainder` characters; short preverbs like `e`
/// would otherwise strip almost anything.
pub fn split_prefix(language: Language, token: &str, min_remainder: usize) -> Option<(&'static str, String)> {
    let lowered = token.to_lowercase();
    let mut candidates: Vec<&'static str> = canonical(language).to_vec();
    candidates.sort_by_key(|p| std::cmp::Reverse(p.chars().count()));

    candidates.into_iter().find_map(|preverb| {
        let remainder = lowered.strip_prefix(preverb)?;
        (remainder.chars().count() >= min_remainder).then(|| (preverb, remainder.to_string()))
    })
}
