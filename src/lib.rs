//! # homeprice
//!
//! Turns a noisy residential listing export (Bengaluru, prices in lakhs) into a
//! clean one-hot design matrix, fits a linear price model on it, and serves point
//! estimates against the exact feature layout the model was trained on.
//!
//! ## Core Design Principles
//!
//! - **Frozen schema**: the location vocabulary and column order are an explicit
//!   value ([`preprocessing::FeatureSchema`]), persisted next to the model and read
//!   by both training and serving.
//! - **Stateful Type Safety**: transformers and models carry their fitted state in
//!   the type system (`Unfitted` vs `Fitted`).
//! - **Drops are data, not errors**: unparseable rows and outliers are removed and
//!   counted in a [`preprocessing::CleaningReport`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use homeprice::dataset::read_raw_records;
//! use homeprice::preprocessing::CleaningPipeline;
//! use homeprice::serving::ModelArtifacts;
//! use homeprice::trainer::Trainer;
//!
//! # fn main() -> anyhow::Result<()> {
//! let raw = read_raw_records("bengaluru_house_prices.csv")?;
//! let cleaned = CleaningPipeline::new().run(&raw)?;
//! let outcome = Trainer::builder().build().fit(&cleaned.matrix)?;
//!
//! let predictor = ModelArtifacts::from_outcome(&outcome).into_predictor()?;
//! let lakhs = predictor.predict("1st Phase JP Nagar", 1000.0, 2, 2);
//! println!("estimated price: {lakhs:.2} lakh");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: raw and clean listing records, CSV I/O, the design matrix
//! - `preprocessing`: field parsing, location collapsing, outlier filters, encoding
//! - `model`: linear regression with `Unfitted`/`Fitted` states
//! - `trainer`: seeded train/test split, fit and evaluation
//! - `metrics`: R², MAE, RMSE
//! - `serving`: persisted artifacts, query validation, price prediction
//! - `serialization`: bincode persistence of plain parameter structs
//! - `config`: layered settings (defaults, TOML file, environment)
//! - `telemetry`: `tracing` subscriber setup for binaries

pub mod config;
pub mod dataset;
pub mod metrics;
pub mod model;
pub mod preprocessing;
pub mod serialization;
pub mod serving;
pub mod telemetry;
pub mod trainer;

pub use dataset::{CleanRecord, DesignMatrix, RawRecord};
pub use model::{Fitted, LinearModel, LinearRegression, RegressionModel, Unfitted};
pub use preprocessing::{CleaningPipeline, CleaningReport, FeatureSchema};
pub use serving::{ModelArtifacts, PriceEstimate, PricePredictor, PriceQuery};
pub use trainer::Trainer;
