//! Command-line front end: clean the raw export, train, and answer price queries.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use homeprice::config::Settings;
use homeprice::dataset::{read_raw_records, write_design_matrix};
use homeprice::preprocessing::{CleaningOutput, CleaningPipeline};
use homeprice::serving::{read_columns_json, write_columns_json, ModelArtifacts, PriceQuery};
use homeprice::telemetry::init_tracing;

#[derive(Parser)]
#[command(name = "homeprice")]
#[command(about = "Clean Bengaluru listing data, train a price model and query it", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./homeprice.toml when present)
    #[arg(short, long, global = true, env = "HOMEPRICE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw CSV and write the encoded design matrix
    Clean {
        /// Raw listing CSV
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cleaned CSV destination
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clean, split, fit and save the model artifacts
    Train {
        /// Raw listing CSV
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Model artifacts destination
        #[arg(short, long)]
        artifacts: Option<PathBuf>,

        /// Also write the cleaned design matrix
        #[arg(long)]
        write_cleaned: bool,
    },

    /// Estimate a price from flags or a JSON request body
    Predict {
        /// Model artifacts to load
        #[arg(short, long)]
        artifacts: Option<PathBuf>,

        /// Request body, e.g. '{"location":"Hebbal","sqft":1200,"bath":2,"bhk":2}'
        #[arg(long, conflicts_with_all = ["location", "sqft", "bath", "bhk"])]
        json: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        sqft: Option<f64>,

        #[arg(long)]
        bath: Option<u32>,

        #[arg(long)]
        bhk: Option<u32>,
    },

    /// List locations that have their own model column
    Locations {
        /// Model artifacts to load
        #[arg(short, long)]
        artifacts: Option<PathBuf>,

        /// Read the columns.json sidecar instead of the model artifacts
        #[arg(long, conflicts_with = "artifacts")]
        columns: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_tracing(&settings.log_filter);

    match cli.command {
        Commands::Clean { input, output } => {
            let input = input.unwrap_or_else(|| settings.data.raw_csv.clone());
            let output = output.unwrap_or_else(|| settings.data.cleaned_csv.clone());
            let cleaned = clean(&input)?;
            write_cleaned(&output, &cleaned)?;
            println!("{}", serde_json::to_string_pretty(&cleaned.report)?);
        }
        Commands::Train {
            input,
            artifacts,
            write_cleaned: also_write,
        } => {
            let input = input.unwrap_or_else(|| settings.data.raw_csv.clone());
            let artifacts = artifacts.unwrap_or_else(|| settings.data.artifacts.clone());
            train(&settings, &input, &artifacts, also_write)?;
        }
        Commands::Predict {
            artifacts,
            json: body,
            location,
            sqft,
            bath,
            bhk,
        } => {
            let artifacts = artifacts.unwrap_or_else(|| settings.data.artifacts.clone());
            let predictor = load_artifacts(&artifacts)?.into_predictor()?;

            let query = match body {
                Some(body) => PriceQuery::from_json_str(&body),
                None => PriceQuery::from_json(&json!({
                    "location": location,
                    "sqft": sqft,
                    "bath": bath,
                    "bhk": bhk,
                })),
            };
            match query {
                Ok(query) => println!("{}", serde_json::to_string(&predictor.estimate(&query))?),
                Err(err) => {
                    println!("{}", json!({ "error": err.to_string() }));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Locations { artifacts, columns } => {
            let locations = match columns {
                Some(columns) => read_columns_json(&columns)
                    .with_context(|| format!("Failed to read {}", columns.display()))?
                    .location_columns()
                    .to_vec(),
                None => {
                    let artifacts = artifacts.unwrap_or_else(|| settings.data.artifacts.clone());
                    let predictor = load_artifacts(&artifacts)?.into_predictor()?;
                    predictor.list_known_locations().to_vec()
                }
            };
            println!("{}", json!({ "locations": locations }));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn clean(input: &Path) -> Result<CleaningOutput> {
    let raw = read_raw_records(input)
        .with_context(|| format!("Failed to read listings from {}", input.display()))?;
    CleaningPipeline::new()
        .run(&raw)
        .context("Cleaning left no usable listings")
}

fn write_cleaned(output: &Path, cleaned: &CleaningOutput) -> Result<()> {
    create_parent(output)?;
    write_design_matrix(output, &cleaned.matrix)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), rows = cleaned.matrix.n_rows(), "wrote cleaned listings");
    Ok(())
}

fn train(settings: &Settings, input: &Path, artifacts_path: &Path, also_write: bool) -> Result<()> {
    let cleaned = clean(input)?;
    if also_write {
        write_cleaned(&settings.data.cleaned_csv, &cleaned)?;
    }

    let outcome = settings
        .trainer()
        .fit(&cleaned.matrix)
        .context("Training failed")?;

    let artifacts = ModelArtifacts::from_outcome(&outcome);
    create_parent(artifacts_path)?;
    artifacts
        .save_to_file(artifacts_path)
        .with_context(|| format!("Failed to save {}", artifacts_path.display()))?;

    let columns = &settings.data.columns_json;
    create_parent(columns)?;
    write_columns_json(columns, &outcome.schema)
        .with_context(|| format!("Failed to write {}", columns.display()))?;

    let summary = json!({
        "cleaning": cleaned.report,
        "features": outcome.schema.len(),
        "train": outcome.train,
        "test": outcome.test,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_artifacts(path: &Path) -> Result<ModelArtifacts> {
    ModelArtifacts::load_from_file(path)
        .with_context(|| format!("Failed to load model artifacts from {}", path.display()))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
