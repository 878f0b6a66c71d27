//! prevnet - preverb/verb corpus explorer
//!
//! Command-line front end over the corpus facade: list preverbs, show a
//! preverb's distributions, drill into a meaning, highlight a token.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use prevnet::config::AppConfig;
use prevnet::core::corpus::{Distribution, Language, MeaningId, MeaningResolution, PrevNet, PreverbAggregate};
use prevnet::core::logging;

/// prevnet - preverb/verb corpus explorer
#[derive(Parser, Debug)]
#[command(name = "prevnet")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (default: ~/.config/prevnet/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the preverbs attested for a language
    Preverbs {
        /// latin | greek
        language: Language,
    },

    /// Frequency distributions for one preverb
    Aggregate {
        /// latin | greek
        language: Language,
        /// Preverb (case-insensitive)
        preverb: String,
    },

    /// All occurrences sharing one verb sense
    Meaning {
        /// latin | greek
        language: Language,
        /// Meaning ID (e.g. v#01410345 or ab_abeo_latin)
        id: String,
    },

    /// Mark a token inside a sentence
    Highlight {
        /// latin | greek
        language: Language,
        sentence: String,
        token: String,

        /// Opening marker
        #[arg(long, default_value = "<b>")]
        open: String,

        /// Closing marker
        #[arg(long, default_value = "</b>")]
        close: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            AppConfig::load_from(path).with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => AppConfig::load(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    let _log_guard = logging::init(&config.logging);
    debug!(version = prevnet::VERSION, source = ?config.source, "prevnet starting");

    let prevnet = PrevNet::from_config(&config).context("failed to set up data source")?;

    match cli.command {
        Commands::Preverbs { language } => {
            let preverbs = prevnet
                .list_preverbs(language)
                .await
                .with_context(|| format!("failed to load {} records", language.label()))?;
            if cli.json {
                print_json(&preverbs)?;
            } else if preverbs.is_empty() {
                println!("No preverbs found for {}", language.label());
            } else {
                for preverb in preverbs {
                    println!("{preverb}");
                }
            }
        }

        Commands::Aggregate { language, preverb } => {
            let view = prevnet
                .get_aggregate(language, &preverb)
                .await
                .with_context(|| format!("failed to load {} records", language.label()))?;
            if cli.json {
                print_json(&view)?;
            } else {
                print_aggregate(&view);
            }
        }

        Commands::Meaning { language, id } => {
            let resolution = prevnet.resolve_meaning(language, &MeaningId::new(id)).await?;
            if cli.json {
                print_json(&resolution)?;
            } else {
                print_resolution(&resolution);
            }
        }

        Commands::Highlight {
            language,
            sentence,
            token,
            open,
            close,
        } => {
            let highlighted = prevnet.highlight(language, &sentence, &token);
            if cli.json {
                print_json(&highlighted)?;
            } else {
                println!("{}", highlighted.to_markup(&open, &close));
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_distribution(title: &str, distribution: &Distribution) {
    println!("{title}:");
    for (label, count) in distribution {
        println!("  {count:>5}  {label}");
    }
}

fn print_aggregate(view: &PreverbAggregate) {
    if view.is_empty() {
        println!("No occurrences of '{}'", view.preverb);
        return;
    }

    println!("Preverb '{}': {} occurrences", view.preverb, view.total_occurrences);
    print_distribution("Verbal bases", &view.verbal_bases);
    print_distribution("Meanings", &view.meanings);
    print_distribution("Preverb senses", &view.preverb_meanings);
    println!(
        "Literal: {}  Non-literal: {}",
        view.literal_meanings.literal, view.literal_meanings.non_literal
    );
    println!("Examples:");
    for example in &view.examples {
        println!(
            "  {:>5}  {}  {}  [{}]",
            example.count, example.lemma, example.verb_semantics, example.meaning_id
        );
    }
}

fn print_resolution(resolution: &MeaningResolution) {
    match resolution {
        MeaningResolution::Found { detail, stage, .. } => {
            println!("{} ({} occurrences, via {stage})", detail.verb_semantics, detail.occurrences.len());
            for record in &detail.occurrences {
                let source = [record.author.as_deref(), record.title.as_deref(), record.century.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {} {}  {}  {}", record.preverb, record.lemma, record.sentence, source);
            }
        }
        MeaningResolution::SemanticsOnly { verb_semantics, stage, .. } => {
            println!("{verb_semantics} (no occurrences available, via {stage})");
        }
        MeaningResolution::NotFound { .. } if resolution.source_unavailable() => {
            println!("Meaning not found; the data source could not be reached");
        }
        MeaningResolution::NotFound { .. } => println!("Meaning not found"),
    }
}
