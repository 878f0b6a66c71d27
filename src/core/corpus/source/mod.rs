//! Data source capability and its variants.
//!
//! Every variant can produce the flat per-language record collection. The
//! remote API additionally exposes per-meaning detail, a paginated bulk
//! dataset and per-preverb summaries; the other variants answer those with
//! [`CorpusError::Unsupported`], which resolver stages treat as "skipped".
//!
//! | Variant | Records from | Issues meaning IDs |
//! |---------|--------------|--------------------|
//! | [`RemoteApiSource`] | paginated `dataset` resource | yes |
//! | [`RemoteCsvSource`] | CSV files (two layouts) | yes (synthesized for the plain layout) |
//! | [`StaticJsonSource`] | `{location}/{language}.json` | no |

pub mod api;
pub mod csv;
pub mod static_json;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::{CorpusError, Result};
use super::fetch::Fetcher;
use super::types::{DatasetPage, Language, MeaningDetail, MeaningId, OccurrenceRecord, PreverbAggregate};

pub use api::RemoteApiSource;
pub use csv::{CsvFile, CsvLayout, RemoteCsvSource};
pub use static_json::{StaticJsonSource, StaticLocation};

pub const DEFAULT_API_BASE_URL: &str = "https://prevnet.sites.er.kcl.ac.uk/api";
pub const DEFAULT_DATASET_PAGE_SIZE: usize = 500;

// ============================================================================
// SourceKind
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    RemoteApi,
    RemoteCsv,
    LocalStatic,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::RemoteApi => "remote_api",
            SourceKind::RemoteCsv => "remote_csv",
            SourceKind::LocalStatic => "local_static",
        }
    }

    /// Whether records carry their own meaning IDs.
    ///
    /// When they do not, every meaning ID the UI can hold was synthesized by
    /// the aggregator and must parse as `{preverb}_{lemma}_{language}`.
    pub fn issues_meaning_ids(&self) -> bool {
        !matches!(self, SourceKind::LocalStatic)
    }
}

// ============================================================================
// DataSource
// ============================================================================

/// A backing store of occurrence records.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// All records for `language`. Filtering by the record's own language
    /// column is left to the Record Store.
    async fn load_records(&self, language: Language) -> Result<Vec<OccurrenceRecord>>;

    /// Meaning detail by ID.
    async fn meaning_detail(&self, _id: &MeaningId) -> Result<MeaningDetail> {
        Err(self.unsupported("meaning_detail"))
    }

    /// One page of the bulk dataset (1-based `page`).
    async fn dataset_page(&self, _page: usize, _per_page: usize) -> Result<DatasetPage> {
        Err(self.unsupported("dataset_page"))
    }

    /// Source-side aggregate for one preverb.
    async fn preverb_summary(&self, _preverb: &str) -> Result<PreverbAggregate> {
        Err(self.unsupported("preverb_summary"))
    }

    fn unsupported(&self, operation: &'static str) -> CorpusError {
        CorpusError::Unsupported {
            source_kind: self.kind().as_str(),
            operation,
        }
    }
}

// ============================================================================
// SourceConfig
// ============================================================================

/// Which backing source to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    RemoteApi {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_page_size")]
        dataset_page_size: usize,
    },
    RemoteCsv {
        #[serde(default = "csv::default_files")]
        files: Vec<CsvFile>,
    },
    LocalStatic {
        location: String,
    },
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_DATASET_PAGE_SIZE
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::RemoteApi {
            base_url: default_base_url(),
            dataset_page_size: default_page_size(),
        }
    }
}

impl SourceConfig {
    /// Build the configured source around a shared fetcher.
    pub fn build(&self, fetcher: Fetcher) -> Result<Arc<dyn DataSource>> {
        Ok(match self {
            SourceConfig::RemoteApi {
                base_url,
                dataset_page_size,
            } => Arc::new(RemoteApiSource::new(base_url, fetcher)?.with_page_size(*dataset_page_size)),
            SourceConfig::RemoteCsv { files } => Arc::new(RemoteCsvSource::new(files.clone(), fetcher)),
            SourceConfig::LocalStatic { location } => {
                Arc::new(StaticJsonSource::new(StaticLocation::parse(location)?, fetcher))
            }
        })
    }
}
