//! Property-based tests for PrevNet
//!
//! ## Test Modules
//!
//! - `semantics_props`: normalisation and classification of annotation text
//!   - Decorated verb semantics normalise to the bare gloss
//!   - Normalisation is idempotent on decorated input
//!   - Every comma-separated sense is its own bucket
//!   - The explicit literal flag overrides the keyword heuristic
//!
//! - `meaning_id_props`: synthesized meaning identifiers
//!   - `{preverb}_{lemma}_{language}` parses back into its parts
//!   - Lemmas containing underscores survive the round trip
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```

mod semantics_props;
