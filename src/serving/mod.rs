//! Inference against persisted training artifacts.
//!
//! [`ModelArtifacts`] pairs the frozen [`FeatureSchema`](crate::preprocessing::FeatureSchema)
//! with the fitted parameters; [`PricePredictor`] turns a [`PriceQuery`] into a
//! [`PriceEstimate`] using exactly that schema.

pub mod artifacts;
pub mod error;
pub mod predictor;
pub mod query;

pub use artifacts::{read_columns_json, write_columns_json, DataColumns, ModelArtifacts};
pub use error::{QueryError, ServingError};
pub use predictor::PricePredictor;
pub use query::{PriceEstimate, PriceQuery};
