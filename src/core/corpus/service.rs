//! UI-facing facade over the corpus layer.
//!
//! One [`PrevNet`] is built at startup and shared; it owns the Record
//! Store, so each instance has its own cache.

use std::sync::Arc;

use tracing::debug;

use super::aggregate::{self, Aggregator};
use super::error::Result;
use super::fetch::Fetcher;
use super::highlight::{Highlighted, Highlighter};
use super::resolver::{MeaningResolution, MeaningResolver, ResolverConfig};
use super::source::DataSource;
use super::store::RecordStore;
use super::types::{Language, MeaningId, PreverbAggregate};
use crate::config::AppConfig;

pub struct PrevNet {
    store: Arc<RecordStore>,
    aggregator: Aggregator,
    resolver: MeaningResolver,
}

impl PrevNet {
    pub fn new(source: Arc<dyn DataSource>, config: &ResolverConfig) -> Self {
        let store = Arc::new(RecordStore::new(source));
        Self {
            resolver: MeaningResolver::standard(store.clone(), config),
            aggregator: Aggregator::new(config.examples_limit),
            store,
        }
    }

    /// Build the configured source with the configured retry policy.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = Fetcher::new(config.fetch.clone());
        let source = config.source.build(fetcher)?;
        Ok(Self::new(source, &config.resolver))
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn resolver(&self) -> &MeaningResolver {
        &self.resolver
    }

    /// Distinct preverbs for `language`, in display order.
    ///
    /// An empty collection gives an empty list; only a failed load is an error.
    pub async fn list_preverbs(&self, language: Language) -> Result<Vec<String>> {
        let records = self.store.load(language).await?;
        Ok(aggregate::list_preverbs(&records, language))
    }

    pub async fn get_aggregate(&self, language: Language, preverb: &str) -> Result<PreverbAggregate> {
        let records = self.store.load(language).await?;
        let view = self.aggregator.aggregate(&records, preverb.trim(), language);
        debug!(
            language = %language,
            preverb,
            total = view.total_occurrences,
            "aggregate computed"
        );
        Ok(view)
    }

    pub async fn resolve_meaning(&self, language: Language, id: &MeaningId) -> Result<MeaningResolution> {
        self.resolver.resolve(language, id).await
    }

    pub fn highlight(&self, language: Language, sentence: &str, token: &str) -> Highlighted {
        Highlighter::new(language).highlight(sentence, token)
    }
}
