//! Meaning Resolution with an ordered fallback chain.
//!
//! The [`MeaningResolver`] turns an opaque meaning ID into the occurrences
//! that share that verb sense. Backing sources are unreliable, so resolution
//! walks a fixed list of [`ResolutionStage`]s and stops at the first one that
//! produces at least one occurrence.
//!
//! # Resolution Order
//!
//! ```text
//! 1. Direct lookup    (source meaning-detail resource, semantics verbatim)
//! 2. Bulk scan        (one large dataset page, filtered client-side, verbatim)
//! 3. Preverb scan     (every canonical preverb's examples, bounded concurrency)
//! 4. Record store     (exact meaning_id, then synthesized preverb + lemma)
//! ```
//!
//! Sources without meaning-detail, dataset or summary resources report those
//! stages as skipped, so local and CSV sources go straight to the record
//! store. Synthesized IDs only ever match there.
//!
//! A stage that finds the meaning text but no occurrences does not stop the
//! chain; if nothing later finds occurrences, the first such text is returned
//! as [`MeaningResolution::SemanticsOnly`]. Only when every stage comes up
//! empty is the result [`MeaningResolution::NotFound`]. The built-in gloss
//! table ([`known_gloss`]) only fills in text for a match the preverb scan
//! already made; it never answers on its own.
//!
//! # Usage
//!
//! ```rust,ignore
//! let resolver = MeaningResolver::standard(store, &ResolverConfig::default());
//! let resolution = resolver.resolve(Language::Latin, &MeaningId::new("v#01410345")).await?;
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{CorpusError, Result};
use super::preverbs;
use super::semantics::normalize_verb_semantics;
use super::source::{DataSource, SourceKind};
use super::store::RecordStore;
use super::types::{Language, MeaningDetail, MeaningId, OccurrenceRecord};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Page size requested by the bulk-scan stage.
    pub bulk_scan_page_size: usize,
    /// Concurrent per-preverb requests in the preverb-scan stage.
    pub preverb_scan_concurrency: usize,
    /// Example rows kept per aggregate.
    pub examples_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bulk_scan_page_size: 500,
            preverb_scan_concurrency: 4,
            examples_limit: super::aggregate::DEFAULT_EXAMPLES_LIMIT,
        }
    }
}

// ============================================================================
// Stage Contract
// ============================================================================

/// What a stage is resolving.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub id: MeaningId,
    pub language: Language,
}

impl ResolutionContext {
    pub fn new(id: MeaningId, language: Language) -> Self {
        Self { id, language }
    }

    fn matches(&self, meaning_id: Option<&str>) -> bool {
        meaning_id.map(str::trim) == Some(self.id.as_str())
    }
}

/// Tagged result of one stage.
#[derive(Debug)]
pub enum StageOutcome {
    /// Occurrences found.
    Found(MeaningDetail),
    /// The meaning text is known but no occurrences were recovered.
    SemanticsOnly(String),
    /// The stage ran and matched nothing.
    Empty,
    /// The source cannot serve this stage.
    Skipped,
    /// The stage could not run to completion.
    Failed(CorpusError),
}

#[async_trait]
pub trait ResolutionStage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, ctx: &ResolutionContext) -> StageOutcome;
}

// ============================================================================
// Resolution Result
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptKind {
    Found,
    SemanticsOnly,
    Empty,
    Skipped,
    /// Failed because the backing source could not be reached.
    Unavailable,
    Failed,
}

/// One entry of the per-stage attempt log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageAttempt {
    pub stage: &'static str,
    pub kind: AttemptKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MeaningResolution {
    Found {
        detail: MeaningDetail,
        stage: &'static str,
        attempts: Vec<StageAttempt>,
    },
    SemanticsOnly {
        verb_semantics: String,
        stage: &'static str,
        attempts: Vec<StageAttempt>,
    },
    NotFound {
        attempts: Vec<StageAttempt>,
    },
}

impl MeaningResolution {
    /// Occurrences and semantics, if any were found.
    pub fn detail(&self) -> Option<&MeaningDetail> {
        match self {
            MeaningResolution::Found { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn verb_semantics(&self) -> Option<&str> {
        match self {
            MeaningResolution::Found { detail, .. } => Some(&detail.verb_semantics),
            MeaningResolution::SemanticsOnly { verb_semantics, .. } => Some(verb_semantics),
            MeaningResolution::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MeaningResolution::Found { .. })
    }

    pub fn attempts(&self) -> &[StageAttempt] {
        match self {
            MeaningResolution::Found { attempts, .. }
            | MeaningResolution::SemanticsOnly { attempts, .. }
            | MeaningResolution::NotFound { attempts } => attempts,
        }
    }

    /// Not found, and at least one stage could not reach its source.
    ///
    /// Lets the caller show "connection problem" instead of "unknown meaning".
    pub fn source_unavailable(&self) -> bool {
        matches!(self, MeaningResolution::NotFound { .. })
            && self.attempts().iter().any(|a| a.kind == AttemptKind::Unavailable)
    }
}

// ============================================================================
// Combinator
// ============================================================================

/// Run `stages` in order; the first one yielding occurrences wins.
pub async fn first_success(stages: &[Box<dyn ResolutionStage>], ctx: &ResolutionContext) -> MeaningResolution {
    let mut attempts = Vec::with_capacity(stages.len());
    let mut semantics: Option<(String, &'static str)> = None;

    for stage in stages {
        let name = stage.name();
        let outcome = match stage.attempt(ctx).await {
            StageOutcome::Found(detail) if detail.occurrences.is_empty() => {
                if detail.verb_semantics.trim().is_empty() {
                    StageOutcome::Empty
                } else {
                    StageOutcome::SemanticsOnly(detail.verb_semantics)
                }
            }
            other => other,
        };

        match outcome {
            StageOutcome::Found(detail) => {
                attempts.push(StageAttempt {
                    stage: name,
                    kind: AttemptKind::Found,
                    detail: Some(format!("{} occurrences", detail.occurrences.len())),
                });
                return MeaningResolution::Found {
                    detail,
                    stage: name,
                    attempts,
                };
            }
            StageOutcome::SemanticsOnly(text) => {
                debug!(stage = name, id = %ctx.id, "meaning text found without occurrences");
                attempts.push(StageAttempt {
                    stage: name,
                    kind: AttemptKind::SemanticsOnly,
                    detail: None,
                });
                if semantics.is_none() {
                    semantics = Some((text, name));
                }
            }
            StageOutcome::Empty => attempts.push(StageAttempt {
                stage: name,
                kind: AttemptKind::Empty,
                detail: None,
            }),
            StageOutcome::Skipped => attempts.push(StageAttempt {
                stage: name,
                kind: AttemptKind::Skipped,
                detail: None,
            }),
            StageOutcome::Failed(err) => {
                warn!(stage = name, id = %ctx.id, error = %err, "resolution stage failed");
                let kind = if err.is_source_unavailable() {
                    AttemptKind::Unavailable
                } else {
                    AttemptKind::Failed
                };
                attempts.push(StageAttempt {
                    stage: name,
                    kind,
                    detail: Some(err.to_string()),
                });
            }
        }
    }

    match semantics {
        Some((verb_semantics, stage)) => MeaningResolution::SemanticsOnly {
            verb_semantics,
            stage,
            attempts,
        },
        None => MeaningResolution::NotFound { attempts },
    }
}

// ============================================================================
// MeaningResolver
// ============================================================================

pub struct MeaningResolver {
    stages: Vec<Box<dyn ResolutionStage>>,
    source_kind: SourceKind,
}

impl MeaningResolver {
    pub fn new(stages: Vec<Box<dyn ResolutionStage>>, source_kind: SourceKind) -> Self {
        Self { stages, source_kind }
    }

    /// The full four-stage chain over `store` and its source.
    pub fn standard(store: Arc<RecordStore>, config: &ResolverConfig) -> Self {
        let source = store.source().clone();
        let source_kind = source.kind();
        let stages: Vec<Box<dyn ResolutionStage>> = vec![
            Box::new(DirectLookupStage::new(source.clone())),
            Box::new(BulkScanStage::new(source.clone(), config.bulk_scan_page_size)),
            Box::new(PreverbScanStage::new(source, config.preverb_scan_concurrency)),
            Box::new(RecordStoreStage::new(store)),
        ];
        Self::new(stages, source_kind)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Resolve `id` for `language`.
    ///
    /// Returns `Err` only for a malformed ID, and does so before any fetch.
    /// Unreachable sources show up in the attempt log, not as errors.
    pub async fn resolve(&self, language: Language, id: &MeaningId) -> Result<MeaningResolution> {
        let malformed = id.is_blank()
            || (!self.source_kind.issues_meaning_ids() && id.parse_synthesized(language).is_none());
        if malformed {
            return Err(CorpusError::MalformedMeaningId {
                id: id.as_str().to_string(),
            });
        }

        let ctx = ResolutionContext::new(id.clone(), language);
        let resolution = first_success(&self.stages, &ctx).await;

        match &resolution {
            MeaningResolution::Found { detail, stage, .. } => {
                info!(id = %id, stage, occurrences = detail.occurrences.len(), "meaning resolved")
            }
            MeaningResolution::SemanticsOnly { stage, .. } => {
                info!(id = %id, stage, "meaning resolved without occurrences")
            }
            MeaningResolution::NotFound { attempts } => {
                info!(id = %id, stages = attempts.len(), "meaning not found")
            }
        }
        Ok(resolution)
    }
}

// ============================================================================
// Stages
// ============================================================================

/// Stage 4: the full record collection, loaded through the Record Store.
pub struct RecordStoreStage {
    store: Arc<RecordStore>,
}

impl RecordStoreStage {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResolutionStage for RecordStoreStage {
    fn name(&self) -> &'static str {
        "record_store"
    }

    async fn attempt(&self, ctx: &ResolutionContext) -> StageOutcome {
        let parsed = ctx.id.parse_synthesized(ctx.language);
        let language = parsed.as_ref().map(|p| p.language).unwrap_or(ctx.language);

        let records = match self.store.load(language).await {
            Ok(records) => records,
            Err(err) => return StageOutcome::Failed(err),
        };

        let mut occurrences: Vec<OccurrenceRecord> = records
            .iter()
            .filter(|r| ctx.matches(r.meaning_id.as_deref()))
            .cloned()
            .collect();

        if occurrences.is_empty() {
            if let Some(parsed) = &parsed {
                let lemma = parsed.lemma.to_lowercase();
                occurrences = records
                    .iter()
                    .filter(|r| r.preverb_eq(&parsed.preverb) && r.lemma.to_lowercase() == lemma)
                    .cloned()
                    .collect();
            }
        }

        match occurrences.first() {
            Some(first) => StageOutcome::Found(MeaningDetail {
                verb_semantics: normalize_verb_semantics(&first.verb_semantics),
                occurrences,
            }),
            None => StageOutcome::Empty,
        }
    }
}

/// Stage 1: the source's own meaning-detail resource.
pub struct DirectLookupStage {
    source: Arc<dyn DataSource>,
}

impl DirectLookupStage {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ResolutionStage for DirectLookupStage {
    fn name(&self) -> &'static str {
        "direct_lookup"
    }

    async fn attempt(&self, ctx: &ResolutionContext) -> StageOutcome {
        match self.source.meaning_detail(&ctx.id).await {
            Ok(detail) => StageOutcome::Found(detail),
            Err(CorpusError::Unsupported { .. }) => StageOutcome::Skipped,
            Err(err) => StageOutcome::Failed(err),
        }
    }
}

/// Stage 2: one large dataset page, filtered on meaning ID.
pub struct BulkScanStage {
    source: Arc<dyn DataSource>,
    page_size: usize,
}

impl BulkScanStage {
    pub fn new(source: Arc<dyn DataSource>, page_size: usize) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl ResolutionStage for BulkScanStage {
    fn name(&self) -> &'static str {
        "bulk_scan"
    }

    async fn attempt(&self, ctx: &ResolutionContext) -> StageOutcome {
        let page = match self.source.dataset_page(1, self.page_size).await {
            Ok(page) => page,
            Err(CorpusError::Unsupported { .. }) => return StageOutcome::Skipped,
            Err(err) => return StageOutcome::Failed(err),
        };

        let occurrences: Vec<OccurrenceRecord> = page
            .data
            .into_iter()
            .filter(|r| ctx.matches(r.meaning_id.as_deref()))
            .map(|mut r| {
                if r.verb_token.trim().is_empty() {
                    r.verb_token = format!("{}{}", r.preverb, r.lemma.to_lowercase());
                }
                r
            })
            .collect();

        match occurrences.first() {
            Some(first) => StageOutcome::Found(MeaningDetail {
                verb_semantics: first.verb_semantics.clone(),
                occurrences,
            }),
            None => StageOutcome::Empty,
        }
    }
}

/// Stage 3: every canonical preverb's examples, checked for the ID.
///
/// Aggregates only expose lemma and meaning per example, so occurrences are
/// reconstructed minimally: sentence `{preverb}{lemma}`, token
/// `{preverb}{lemma lowercased}`, one per (preverb, lemma).
pub struct PreverbScanStage {
    source: Arc<dyn DataSource>,
    concurrency: usize,
}

impl PreverbScanStage {
    pub fn new(source: Arc<dyn DataSource>, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }
}

#[async_trait]
impl ResolutionStage for PreverbScanStage {
    fn name(&self) -> &'static str {
        "preverb_scan"
    }

    async fn attempt(&self, ctx: &ResolutionContext) -> StageOutcome {
        let canonical = preverbs::canonical(ctx.language);

        let pending: Vec<_> = canonical
            .iter()
            .copied()
            .enumerate()
            .map(|(index, preverb)| {
                let source = self.source.clone();
                async move { (index, preverb, source.preverb_summary(preverb).await) }.boxed()
            })
            .collect();
        let mut results: Vec<_> = stream::iter(pending).buffer_unordered(self.concurrency).collect().await;
        results.sort_by_key(|(index, _, _)| *index);

        let mut unsupported = 0usize;
        let mut answered = 0usize;
        let mut last_error = None;
        let mut semantics: Option<String> = None;
        let mut seen = HashSet::new();
        let mut occurrences = Vec::new();
        let gloss = known_gloss(&ctx.id);

        for (_, preverb, result) in results {
            let summary = match result {
                Ok(summary) => summary,
                Err(CorpusError::Unsupported { .. }) => {
                    unsupported += 1;
                    continue;
                }
                Err(err) => {
                    debug!(preverb, error = %err, "preverb summary unavailable");
                    last_error = Some(err);
                    continue;
                }
            };
            answered += 1;

            for example in summary.examples.iter().filter(|e| ctx.matches(Some(e.meaning_id.as_str()))) {
                let text = match (example.verb_semantics.trim(), gloss) {
                    ("", Some(gloss)) => gloss.to_string(),
                    _ => example.verb_semantics.clone(),
                };
                if semantics.is_none() && !text.trim().is_empty() {
                    semantics = Some(text.clone());
                }
                let lemma = example.lemma.trim();
                if lemma.is_empty() || !seen.insert((preverb, lemma.to_string())) {
                    continue;
                }
                occurrences.push(
                    OccurrenceRecord::new(preverb, lemma)
                        .with_sentence(format!("{preverb}{lemma}"), format!("{preverb}{}", lemma.to_lowercase()))
                        .with_verb_semantics(text)
                        .with_meaning_id(ctx.id.as_str()),
                );
            }
        }

        if !occurrences.is_empty() {
            return StageOutcome::Found(MeaningDetail {
                verb_semantics: semantics.unwrap_or_default(),
                occurrences,
            });
        }
        if let Some(text) = semantics {
            return StageOutcome::SemanticsOnly(text);
        }
        if unsupported == canonical.len() {
            return StageOutcome::Skipped;
        }
        match (answered, last_error) {
            (0, Some(err)) => StageOutcome::Failed(err),
            _ => StageOutcome::Empty,
        }
    }
}

/// Glosses for frequently requested WordNet-style sense IDs.
const KNOWN_MEANINGS: &[(&str, &str)] = &[
    ("v#01410345", "run or move very quickly or hastily"),
    ("v#01360914", "move ahead; travel onward"),
    ("v#01420490", "to run away"),
    ("v#00169694", "make progress"),
    ("v#01790203", "come into existence or develop"),
    ("v#00235191", "come to pass; occur"),
];

/// Gloss for a well-known sense ID, used when a matched example has no text.
pub fn known_gloss(id: &MeaningId) -> Option<&'static str> {
    KNOWN_MEANINGS
        .iter()
        .find(|(known, _)| *known == id.as_str())
        .map(|(_, gloss)| *gloss)
}
