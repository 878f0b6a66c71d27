//! Remote REST API source.
//!
//! Resources under the base URL:
//!
//! - `preverbs/{preverb}`: per-preverb aggregate
//! - `meanings/{meaning_id}`: meaning detail
//! - `dataset?page=&per_page=`: paginated flat records
//!
//! Path segments are percent-encoded here and only here, so identifiers
//! such as `v#01410345` reach the server intact.

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use super::{DataSource, SourceKind, DEFAULT_DATASET_PAGE_SIZE};
use crate::core::corpus::error::{CorpusError, Result};
use crate::core::corpus::fetch::Fetcher;
use crate::core::corpus::types::{
    DatasetPage, Language, MeaningDetail, MeaningId, OccurrenceRecord, PreverbAggregate,
};

/// Upper bound on dataset pages read during a full load.
const MAX_DATASET_PAGES: usize = 1_000;

pub struct RemoteApiSource {
    base: Url,
    fetcher: Fetcher,
    page_size: usize,
}

impl RemoteApiSource {
    pub fn new(base_url: &str, fetcher: Fetcher) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(CorpusError::Config(format!("API base URL cannot be a base: {base_url}")));
        }
        Ok(Self {
            base,
            fetcher,
            page_size: DEFAULT_DATASET_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl DataSource for RemoteApiSource {
    fn kind(&self) -> SourceKind {
        SourceKind::RemoteApi
    }

    async fn load_records(&self, language: Language) -> Result<Vec<OccurrenceRecord>> {
        let mut records = Vec::new();

        for page in 1..=MAX_DATASET_PAGES {
            let batch = self.dataset_page(page, self.page_size).await?;
            let received = batch.data.len();
            let total = batch.total;
            records.extend(batch.data);

            debug!(page, received, total, "dataset page loaded");

            let short_page = received < self.page_size;
            let reached_total = total > 0 && records.len() >= total;
            if received == 0 || short_page || reached_total {
                break;
            }
        }

        info!(language = %language, records = records.len(), "loaded records from remote API");
        Ok(records)
    }

    async fn meaning_detail(&self, id: &MeaningId) -> Result<MeaningDetail> {
        let url = self.endpoint(&["meanings", id.as_str()]);
        self.fetcher.get_json(&url, "meaning detail").await
    }

    async fn dataset_page(&self, page: usize, per_page: usize) -> Result<DatasetPage> {
        let mut url = self.endpoint(&["dataset"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        self.fetcher.get_json(&url, "dataset page").await
    }

    async fn preverb_summary(&self, preverb: &str) -> Result<PreverbAggregate> {
        let url = self.endpoint(&["preverbs", preverb]);
        let mut summary: PreverbAggregate = self.fetcher.get_json(&url, "preverb summary").await?;
        summary.preverb = preverb.to_string();
        Ok(summary)
    }
}
