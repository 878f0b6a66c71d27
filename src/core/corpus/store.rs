//! Record Store: per-language record collections, loaded once.
//!
//! Each language gets a write-once cell. Concurrent first loads of the same
//! language wait on the one in-flight fetch instead of issuing their own.
//! A failed load leaves the cell empty so the next caller can try again;
//! nothing is ever invalidated once filled.
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = RecordStore::new(source);
//! let latin = store.load(Language::Latin).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use super::error::{CorpusError, Result};
use super::source::DataSource;
use super::types::{Language, OccurrenceRecord};

/// Shared, immutable record collection.
pub type Records = Arc<Vec<OccurrenceRecord>>;

pub struct RecordStore {
    source: Arc<dyn DataSource>,
    cells: Mutex<HashMap<Language, Arc<OnceCell<Records>>>>,
}

impl RecordStore {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// Records for `language`, fetched on first access.
    ///
    /// Only records whose language column matches (or is absent) are kept.
    /// On failure the error is returned and nothing is cached.
    pub async fn load(&self, language: Language) -> Result<Records> {
        let cell = self.cell(language).await;

        if let Some(records) = cell.get() {
            debug!(language = %language, "record cache hit");
            return Ok(records.clone());
        }

        let records = cell
            .get_or_try_init(|| async {
                let fetched = self.source.load_records(language).await?;
                let fetched_count = fetched.len();
                let records: Vec<OccurrenceRecord> =
                    fetched.into_iter().filter(|r| r.is_language(language)).collect();

                info!(
                    language = %language,
                    source = self.source.kind().as_str(),
                    fetched = fetched_count,
                    kept = records.len(),
                    "record store filled"
                );
                Ok::<_, CorpusError>(Arc::new(records))
            })
            .await?;

        Ok(records.clone())
    }

    /// Records if already loaded; never triggers a fetch.
    pub async fn cached(&self, language: Language) -> Option<Records> {
        self.cells
            .lock()
            .await
            .get(&language)
            .and_then(|cell| cell.get().cloned())
    }

    pub async fn is_loaded(&self, language: Language) -> bool {
        self.cached(language).await.is_some()
    }

    async fn cell(&self, language: Language) -> Arc<OnceCell<Records>> {
        self.cells
            .lock()
            .await
            .entry(language)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}
