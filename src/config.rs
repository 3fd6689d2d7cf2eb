//! Layered runtime settings.
//!
//! Sources, later ones winning:
//! 1. [`Settings::default`]
//! 2. `homeprice.toml` (or the file passed with `--config`)
//! 3. `HOMEPRICE_*` environment variables, nested keys split on `__`
//!    (`HOMEPRICE_TRAINING__SEED=42`)

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trainer::{Trainer, DEFAULT_SEED, DEFAULT_TEST_FRACTION};

pub const CONFIG_FILE: &str = "homeprice.toml";
pub const ENV_PREFIX: &str = "HOMEPRICE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub training: TrainingSettings,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub raw_csv: PathBuf,
    pub cleaned_csv: PathBuf,
    pub artifacts: PathBuf,
    pub columns_json: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub test_fraction: f64,
    pub seed: u64,
    pub ridge: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: DataSettings::default(),
            training: TrainingSettings::default(),
            log_filter: "homeprice=info".to_string(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            raw_csv: PathBuf::from("data/bengaluru_house_prices.csv"),
            cleaned_csv: PathBuf::from("data/bengaluru_cleaned.csv"),
            artifacts: PathBuf::from("artifacts/model.bin"),
            columns_json: PathBuf::from("artifacts/columns.json"),
        }
    }
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            ridge: crate::model::linear::DEFAULT_RIDGE,
        }
    }
}

impl Settings {
    /// The merged provider stack, without extraction.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.training.test_fraction;
        if !(0.0..1.0).contains(&fraction) {
            return Err(ConfigError::Invalid {
                key: "training.test_fraction",
                reason: format!("must be in [0, 1), got {fraction}"),
            });
        }
        let ridge = self.training.ridge;
        if !ridge.is_finite() || ridge < 0.0 {
            return Err(ConfigError::Invalid {
                key: "training.ridge",
                reason: format!("must be a non-negative number, got {ridge}"),
            });
        }
        Ok(())
    }

    pub fn trainer(&self) -> Trainer {
        Trainer::builder()
            .test_fraction(self.training.test_fraction)
            .seed(self.training.seed)
            .ridge(self.training.ridge)
            .build()
    }
}
