//! Split, fit and evaluate in one step.
//!
//! ```ignore
//! let trainer = Trainer::builder().test_fraction(0.2).seed(10).build();
//! let outcome = trainer.fit(&cleaned.matrix)?;
//! println!("held-out R² = {:.3}", outcome.test.map_or(f64::NAN, |r| r.r_squared));
//! ```

use ndarray::Array1;
use thiserror::Error;
use tracing::info;

use crate::dataset::DesignMatrix;
use crate::metrics::RegressionReport;
use crate::model::linear::DEFAULT_RIDGE;
use crate::model::{Fitted, LinearModel, LinearRegression, ModelError, RegressionModel};
use crate::preprocessing::{FeatureSchema, PreprocessingError};

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 10;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Split(#[from] PreprocessingError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A fitted model, the schema it was fitted on, and its scores.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: LinearModel<Fitted>,
    pub schema: FeatureSchema,
    pub train: RegressionReport,
    /// `None` when the test fraction is zero.
    pub test: Option<RegressionReport>,
}

/// Training configuration. Immutable after [`TrainerBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct Trainer {
    pub(crate) test_fraction: f64,
    pub(crate) seed: u64,
    pub(crate) ridge: f64,
}

#[derive(Debug, Clone)]
pub struct TrainerBuilder {
    test_fraction: f64,
    seed: u64,
    ridge: f64,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            ridge: DEFAULT_RIDGE,
        }
    }
}

impl TrainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn ridge(mut self, ridge: f64) -> Self {
        self.ridge = ridge;
        self
    }

    pub fn build(self) -> Trainer {
        Trainer {
            test_fraction: self.test_fraction,
            seed: self.seed,
            ridge: self.ridge,
        }
    }
}

impl Trainer {
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    /// Split `data`, fit on the train part and score both parts.
    pub fn fit(&self, data: &DesignMatrix) -> Result<TrainingOutcome, TrainingError> {
        let (train, test) = data.train_test_split(self.test_fraction, self.seed)?;

        let model = LinearRegression::new()
            .with_ridge(self.ridge)
            .fit(train.features(), train.target())?;

        let train_report = evaluate(&model, &train);
        let test_report = (!test.is_empty()).then(|| evaluate(&model, &test));

        info!(
            train_rows = train.n_rows(),
            test_rows = test.n_rows(),
            train_r2 = train_report.r_squared,
            test_r2 = test_report.map(|r| r.r_squared),
            "trained price model"
        );

        Ok(TrainingOutcome {
            model,
            schema: data.schema().clone(),
            train: train_report,
            test: test_report,
        })
    }
}

fn evaluate<M: RegressionModel>(model: &M, data: &DesignMatrix) -> RegressionReport {
    let predictions: Array1<f64> = model.predict_batch(data.features());
    let truth = data.target().to_vec();
    RegressionReport::evaluate(&truth, &predictions.to_vec())
}
