use ndarray::Array1;

use crate::model::RegressionModel;
use crate::preprocessing::encoding::{BATH_COLUMN, BHK_COLUMN, SQFT_COLUMN};
use crate::preprocessing::FeatureSchema;
use crate::serving::artifacts::check_schema;
use crate::serving::error::ServingError;
use crate::serving::query::{PriceEstimate, PriceQuery};

/// Answers price queries against a frozen schema and a fitted model.
///
/// Immutable after construction; share it behind an `Arc` across request
/// handlers without locking.
#[derive(Debug, Clone)]
pub struct PricePredictor<M> {
    schema: FeatureSchema,
    model: M,
}

impl<M: RegressionModel> PricePredictor<M> {
    /// # Errors
    /// [`ServingError::SchemaMismatch`] if the schema is malformed or the model
    /// was fitted on a different number of features.
    pub fn new(schema: FeatureSchema, model: M) -> Result<Self, ServingError> {
        check_schema(&schema, model.n_features())?;
        Ok(Self { schema, model })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Feature vector for one query, laid out by the schema.
    ///
    /// An unknown location, including "other", leaves the location block at zero.
    /// Lookup is exact and case-sensitive.
    pub fn feature_vector(&self, location: &str, sqft: f64, bath: u32, bhk: u32) -> Array1<f64> {
        let mut x = Array1::zeros(self.schema.len());
        x[SQFT_COLUMN] = sqft;
        x[BATH_COLUMN] = f64::from(bath);
        x[BHK_COLUMN] = f64::from(bhk);
        if let Some(pos) = self.schema.location_position(location) {
            x[pos] = 1.0;
        }
        x
    }

    /// Point estimate in lakhs. Not clamped: extreme inputs can go negative.
    pub fn predict(&self, location: &str, sqft: f64, bath: u32, bhk: u32) -> f64 {
        let x = self.feature_vector(location, sqft, bath, bhk);
        self.model.predict_row(x.view())
    }

    pub fn estimate(&self, query: &PriceQuery) -> PriceEstimate {
        PriceEstimate {
            estimated_price: self.predict(&query.location, query.sqft, query.bath, query.bhk),
        }
    }

    /// Locations with their own column, in schema order.
    pub fn list_known_locations(&self) -> &[String] {
        self.schema.location_columns()
    }
}
