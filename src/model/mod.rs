//! Regression models with compile-time training state.
//!
//! Models carry their state in the type (`LinearModel<Unfitted>` vs
//! `LinearModel<Fitted>`), so an unfitted model cannot be asked for a prediction.
//! Serving code is generic over [`RegressionModel`].

pub mod error;
pub mod linear;
pub mod state;

use ndarray::{Array1, ArrayView1, ArrayView2};

pub use error::ModelError;
pub use linear::{LinearModel, LinearParams, LinearRegression};
pub use state::{Fitted, Unfitted};

/// A fitted model that maps a feature row to a scalar.
///
/// Implementors are immutable after fitting, so `&self` prediction is safe to
/// share across threads.
pub trait RegressionModel: Send + Sync {
    /// Serializable inference parameters.
    type Params;

    /// Number of features the model expects per row.
    fn n_features(&self) -> usize;

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64;

    fn predict_batch(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        rows.outer_iter().map(|row| self.predict_row(row)).collect()
    }

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self, ModelError>
    where
        Self: Sized;
}
