//! Sentence Token Highlighter.
//!
//! Best-effort text matching, not morphological analysis. Attempts, in
//! order, stopping at the first that matches:
//!
//! 1. the whole token, case-insensitive, every match
//! 2. the token minus a known preverb prefix, every match
//! 3. a word starting with the token's first 4 characters (3 for short
//!    tokens), first match only
//! 4. nothing: the sentence comes back as one plain segment

use regex::Regex;
use serde::Serialize;

use super::preverbs;
use super::types::Language;

/// Minimum base-verb length left after stripping a preverb.
const MIN_BASE_LEN: usize = 3;
/// Shortest token the word-prefix fallback will try.
const MIN_PREFIX_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    BaseVerb,
    Prefix,
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlighted {
    pub segments: Vec<Segment>,
    pub strategy: MatchStrategy,
}

impl Highlighted {
    fn plain(sentence: &str) -> Self {
        let segments = if sentence.is_empty() {
            Vec::new()
        } else {
            vec![Segment {
                text: sentence.to_string(),
                highlighted: false,
            }]
        };
        Self {
            segments,
            strategy: MatchStrategy::Unmatched,
        }
    }

    fn from_spans(sentence: &str, spans: &[(usize, usize)], strategy: MatchStrategy) -> Self {
        let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;

        for &(start, end) in spans {
            if start > cursor {
                segments.push(Segment {
                    text: sentence[cursor..start].to_string(),
                    highlighted: false,
                });
            }
            segments.push(Segment {
                text: sentence[start..end].to_string(),
                highlighted: true,
            });
            cursor = end;
        }
        if cursor < sentence.len() {
            segments.push(Segment {
                text: sentence[cursor..].to_string(),
                highlighted: false,
            });
        }

        Self { segments, strategy }
    }

    pub fn is_highlighted(&self) -> bool {
        self.strategy != MatchStrategy::Unmatched
    }

    pub fn highlighted_spans(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Render with `open`/`close` around each highlighted span.
    pub fn to_markup(&self, open: &str, close: &str) -> String {
        self.segments.iter().fold(String::new(), |mut out, segment| {
            if segment.highlighted {
                out.push_str(open);
                out.push_str(&segment.text);
                out.push_str(close);
            } else {
                out.push_str(&segment.text);
            }
            out
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Highlighter {
    language: Language,
}

impl Highlighter {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn highlight(&self, sentence: &str, token: &str) -> Highlighted {
        let token = token.trim();
        if sentence.is_empty() || token.is_empty() {
            return Highlighted::plain(sentence);
        }

        let exact = spans(sentence, &format!("(?i){}", regex::escape(token)), true);
        if !exact.is_empty() {
            return Highlighted::from_spans(sentence, &exact, MatchStrategy::Exact);
        }

        if let Some((_, base)) = preverbs::split_prefix(self.language, token, MIN_BASE_LEN) {
            let base_spans = spans(sentence, &format!("(?i){}", regex::escape(&base)), true);
            if !base_spans.is_empty() {
                return Highlighted::from_spans(sentence, &base_spans, MatchStrategy::BaseVerb);
            }
        }

        let token_len = token.chars().count();
        if token_len >= MIN_PREFIX_LEN {
            let width = if token_len >= 4 { 4 } else { MIN_PREFIX_LEN };
            let prefix: String = token.chars().take(width).collect();
            let prefix_spans = spans(sentence, &format!(r"(?i)\b{}\w*", regex::escape(&prefix)), false);
            if !prefix_spans.is_empty() {
                return Highlighted::from_spans(sentence, &prefix_spans, MatchStrategy::Prefix);
            }
        }

        Highlighted::plain(sentence)
    }
}

/// Byte spans of non-empty matches of `pattern` in `sentence`.
fn spans(sentence: &str, pattern: &str, all: bool) -> Vec<(usize, usize)> {
    let Ok(re) = Regex::new(pattern) else {
        return Vec::new();
    };
    let found = re.find_iter(sentence).filter(|m| !m.as_str().is_empty()).map(|m| (m.start(), m.end()));
    if all {
        found.collect()
    } else {
        found.take(1).collect()
    }
}
