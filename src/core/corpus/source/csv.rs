//! Remote CSV source.
//!
//! Two column layouts are in circulation:
//!
//! - `lg_preverbs`: full provenance and a native `meaning_id` column.
//! - `preverbs`: no provenance and no meaning ID; an ID is synthesized
//!   from the row's preverb, lemma and index.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use super::{DataSource, SourceKind};
use crate::core::corpus::error::Result;
use crate::core::corpus::fetch::Fetcher;
use crate::core::corpus::types::{parse_bool_text, Language, OccurrenceRecord};

const GITHUB_RAW_BASE_URL: &str = "https://raw.githubusercontent.com/sp12102001/prevnet-data/main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvLayout {
    LgPreverbs,
    Preverbs,
}

/// One CSV file and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvFile {
    pub url: String,
    pub layout: CsvLayout,
    /// Language assumed for rows whose language cell is empty.
    #[serde(default)]
    pub language: Option<Language>,
}

pub(super) fn default_files() -> Vec<CsvFile> {
    vec![
        CsvFile {
            url: format!("{GITHUB_RAW_BASE_URL}/data/LG_preverbs.csv"),
            layout: CsvLayout::LgPreverbs,
            language: None,
        },
        CsvFile {
            url: format!("{GITHUB_RAW_BASE_URL}/data/preverbs.csv"),
            layout: CsvLayout::Preverbs,
            language: None,
        },
    ]
}

pub struct RemoteCsvSource {
    files: Vec<CsvFile>,
    fetcher: Fetcher,
}

impl RemoteCsvSource {
    pub fn new(files: Vec<CsvFile>, fetcher: Fetcher) -> Self {
        Self { files, fetcher }
    }

    async fn fetch_file(&self, file: &CsvFile) -> Result<Vec<OccurrenceRecord>> {
        let url = Url::parse(&file.url)?;
        let text = self.fetcher.get_text(&url).await?;
        let rows = parse_csv(&text);
        Ok(rows
            .iter()
            .enumerate()
            .map(|(index, row)| map_row(row, file.layout, index, file.language))
            .collect())
    }
}

#[async_trait]
impl DataSource for RemoteCsvSource {
    fn kind(&self) -> SourceKind {
        SourceKind::RemoteCsv
    }

    /// Reads every configured file. A file that fails is skipped as long as
    /// another one loaded; only when all fail is the last error returned.
    async fn load_records(&self, language: Language) -> Result<Vec<OccurrenceRecord>> {
        let results = join_all(self.files.iter().map(|file| self.fetch_file(file))).await;

        let mut records = Vec::new();
        let mut last_error = None;
        let mut loaded_any = false;

        for (file, result) in self.files.iter().zip(results) {
            match result {
                Ok(rows) => {
                    loaded_any = true;
                    records.extend(rows);
                }
                Err(err) => {
                    warn!(url = %file.url, error = %err, "CSV file unavailable, continuing with the rest");
                    last_error = Some(err);
                }
            }
        }

        match (loaded_any, last_error) {
            (false, Some(err)) => Err(err),
            _ => {
                info!(language = %language, records = records.len(), "loaded records from CSV");
                Ok(records)
            }
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse CSV text into header-keyed rows.
///
/// Handles quoted fields with embedded commas, newlines and doubled quotes.
/// Short rows are padded with empty cells; blank lines are skipped.
pub fn parse_csv(text: &str) -> Vec<HashMap<String, String>> {
    let mut table = split_records(text).into_iter();
    let headers: Vec<String> = match table.next() {
        Some(header) => header.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    table
        .filter(|cells| !(cells.len() == 1 && cells[0].trim().is_empty()))
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = cells.get(i).map(|v| v.trim().to_string()).unwrap_or_default();
                    (header.clone(), value)
                })
                .collect()
        })
        .collect()
}

fn split_records(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => record.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            (c, _) => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

fn cell(row: &HashMap<String, String>, column: &str) -> Option<String> {
    row.get(column).filter(|v| !v.is_empty()).cloned()
}

fn text(row: &HashMap<String, String>, column: &str) -> String {
    cell(row, column).unwrap_or_default()
}

/// Map a CSV row onto the canonical record shape.
pub fn map_row(
    row: &HashMap<String, String>,
    layout: CsvLayout,
    index: usize,
    default_language: Option<Language>,
) -> OccurrenceRecord {
    let fallback_language = || default_language.map(|l| l.label().to_string());

    let mut record = OccurrenceRecord {
        preverb: text(row, "preverb"),
        lemma: text(row, "lemma"),
        verb_token: text(row, "verb_token"),
        sentence: text(row, "sentence"),
        preverb_semantics: text(row, "preverb_semantics"),
        verb_semantics: text(row, "verb_semantics"),
        literal_meaning: cell(row, "literal_meaning").and_then(|v| parse_bool_text(&v)),
        genre: cell(row, "genre"),
        ..Default::default()
    };

    match layout {
        CsvLayout::LgPreverbs => {
            record.author = cell(row, "author");
            record.title = cell(row, "title");
            record.century = cell(row, "century");
            record.language = cell(row, "language").or_else(fallback_language);
            record.language_period = cell(row, "language_period");
            record.place = cell(row, "place");
            record.latitude = cell(row, "latitude");
            record.longitude = cell(row, "longitude");
            record.location_url = cell(row, "whg_url");
            record.meaning_id = cell(row, "meaning_id");
        }
        CsvLayout::Preverbs => {
            record.language = cell(row, "lang").or_else(fallback_language);
            record.language_period = cell(row, "lang_period");
            record.meaning_id = Some(synthesize_row_id(&record.preverb, &record.lemma, index));
        }
    }

    record
}

/// `p_{preverb}_{lemma}_{index}` with whitespace runs replaced by `_`.
fn synthesize_row_id(preverb: &str, lemma: &str, index: usize) -> String {
    let raw = format!("p_{preverb}_{lemma}_{index}");
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}
