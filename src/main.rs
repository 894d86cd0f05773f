//! SpaceML command line.
//!
//! # Usage
//! ```sh
//! CANDIDATE_CLASS=0 cargo run -- predict --input observation.json
//! CANDIDATE_CLASS=0 cargo run -- predict --field period=9.49 --field time0bk=170.5 ...
//! cargo run -- history --limit 5
//! cargo run -- clear
//! ```
//!
//! Logs go to stderr; results are printed to stdout as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use spaceml::application::bootstrap;
use spaceml::config::{Config, HistoryEnvConfig};
use spaceml::domain::features::{RawFields, RawValue};
use spaceml::domain::planet::{CategoryScheme, DisplayCategory, EARTH_RADIUS_KM};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Exoplanet candidate classification and sizing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify an observation, size it if it is a candidate, and record the result
    Predict {
        /// JSON object of field name -> value
        #[arg(long)]
        input: Option<PathBuf>,

        /// Field value as name=value; overrides --input. Repeatable.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Show the most recent predictions, newest first
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Delete all recorded predictions
    Clear,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}

fn collect_fields(input: Option<PathBuf>, overrides: Vec<(String, String)>) -> Result<RawFields> {
    let mut fields = match input {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open observation file {:?}", path))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse observation file {:?}", path))?
        }
        None => RawFields::new(),
    };
    for (name, value) in overrides {
        fields.insert(name, RawValue::Text(value));
    }
    Ok(fields)
}

/// History commands need no model artifacts or label convention.
fn history_config() -> Result<HistoryEnvConfig> {
    HistoryEnvConfig::from_vars(|key| std::env::var(key).ok())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Predict { input, fields } => {
            let config = Config::from_env()?;
            let fields = collect_fields(input, fields)?;
            let service = bootstrap::build_service(&config).await?;

            let record = service.classify_and_size(&fields).await?;
            let summary = json!({
                "id": record.id(),
                "label": record.label(),
                "confidence": record.confidence(),
                "positive_probability": record.positive_probability(),
                "radius": record.radius(),
                "radius_km": record.radius().map(|r| r * EARTH_RADIUS_KM),
                "planet_type": record.planet_type(),
                "description": record
                    .radius()
                    .filter(|_| record.category_scheme() == Some(CategoryScheme::Display))
                    .map(|r| DisplayCategory::from_radius(r).description()),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::History { limit } => {
            let history = bootstrap::build_history(&history_config()?).await?;
            let records = history.list(limit).await?;
            info!("{} record(s) in history", records.len());
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Clear => {
            let history = bootstrap::build_history(&history_config()?).await?;
            history.clear().await?;
            println!("History cleared.");
        }
    }

    Ok(())
}
