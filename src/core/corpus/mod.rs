//! Preverb/verb annotation corpus.
//!
//! Loads flat occurrence records from a configurable backing source, caches
//! them per language, and derives the views the UI shows: the preverb list,
//! per-preverb frequency distributions, meaning drill-downs and sentence
//! highlighting.
//!
//! # Architecture
//!
//! ```text
//!                    +-------------------+
//!                    |      PrevNet      |
//!                    |     (service)     |
//!                    +-------------------+
//!                      |       |       |
//!           +----------+       |       +-----------+
//!           v                  v                   v
//!   +--------------+   +---------------+   +---------------+
//!   |  Aggregator  |   |MeaningResolver|   |  Highlighter  |
//!   +--------------+   +---------------+   +---------------+
//!           |                  |
//!           v                  v
//!   +-----------------------------------+
//!   |            RecordStore            |
//!   |   (one write-once cell per lang)  |
//!   +-----------------------------------+
//!                     |
//!                     v
//!   +-----------------------------------+
//!   | DataSource: remote api | remote   |
//!   | csv | local static, via Fetcher   |
//!   +-----------------------------------+
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use prevnet::core::corpus::prelude::*;
//!
//! let prevnet = PrevNet::from_config(&AppConfig::load())?;
//! let preverbs = prevnet.list_preverbs(Language::Latin).await?;
//! let view = prevnet.get_aggregate(Language::Latin, "ab").await?;
//! let meaning = prevnet
//!     .resolve_meaning(Language::Latin, &MeaningId::new(&view.examples[0].meaning_id))
//!     .await?;
//! ```

pub mod aggregate;
pub mod error;
pub mod fetch;
pub mod highlight;
pub mod preverbs;
pub mod resolver;
pub mod semantics;
pub mod service;
pub mod source;
pub mod store;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use aggregate::{list_preverbs, Aggregator};
pub use error::{CorpusError, Result};
pub use fetch::{Backoff, Fetcher, RetryPolicy};
pub use highlight::{Highlighted, Highlighter, MatchStrategy, Segment};
pub use resolver::{
    AttemptKind, MeaningResolution, MeaningResolver, ResolutionContext, ResolutionStage, ResolverConfig,
    StageAttempt, StageOutcome,
};
pub use service::PrevNet;
pub use source::{DataSource, SourceConfig, SourceKind};
pub use store::{RecordStore, Records};
pub use types::{
    DatasetPage, Distribution, ExampleRow, Language, LiteralSplit, MeaningDetail, MeaningId, OccurrenceRecord,
    PreverbAggregate,
};

/// Convenient imports for common corpus operations.
pub mod prelude {
    pub use super::{
        Language, MeaningDetail, MeaningId, MeaningResolution, OccurrenceRecord, PrevNet, PreverbAggregate,
    };
    pub use crate::config::AppConfig;
}
