//! PrevNet - preverb/verb annotation corpus
//!
//! Data layer for exploring Latin and Ancient Greek preverb usage: record
//! loading from configurable sources, per-preverb aggregation, meaning
//! resolution and sentence highlighting.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
