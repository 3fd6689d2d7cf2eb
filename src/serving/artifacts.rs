//! Persisted training output: the schema and the model parameters, saved together.
//!
//! The schema is never rebuilt at serving time. Whatever was frozen at training
//! is what the predictor encodes against, and a load that finds the two halves
//! disagreeing fails before any request is served.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{Fitted, LinearModel, LinearParams, RegressionModel};
use crate::preprocessing::{FeatureSchema, LocationVocabulary, NUMERIC_COLUMNS};
use crate::serialization::SerializableParams;
use crate::serving::error::ServingError;
use crate::serving::predictor::PricePredictor;
use crate::trainer::TrainingOutcome;

/// Schema plus fitted linear parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub schema: FeatureSchema,
    pub params: LinearParams,
}

impl ModelArtifacts {
    pub fn new(schema: FeatureSchema, params: LinearParams) -> Self {
        Self { schema, params }
    }

    pub fn from_outcome(outcome: &TrainingOutcome) -> Self {
        Self::new(outcome.schema.clone(), outcome.model.extract_params())
    }

    /// Check that the schema is well formed and matches the model width.
    pub fn validate(&self) -> Result<(), ServingError> {
        check_schema(&self.schema, self.params.weights.len())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ServingError> {
        self.validate()?;
        self.write_to(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            features = self.schema.len(),
            "saved model artifacts"
        );
        Ok(())
    }

    /// Load and validate artifacts.
    ///
    /// # Errors
    /// [`ServingError::SchemaMismatch`] if the schema is malformed or its length
    /// differs from the model's feature count.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServingError> {
        let bytes = std::fs::read(path.as_ref())?;
        let artifacts = Self::from_bytes(&bytes)?;
        artifacts.validate()?;
        Ok(artifacts)
    }

    pub fn into_predictor(self) -> Result<PricePredictor<LinearModel<Fitted>>, ServingError> {
        let model = LinearModel::<Fitted>::from_params(self.params)
            .map_err(|err| ServingError::SchemaMismatch(err.to_string()))?;
        PricePredictor::new(self.schema, model)
    }
}

pub(crate) fn check_schema(schema: &FeatureSchema, n_features: usize) -> Result<(), ServingError> {
    if !schema.is_well_formed() {
        return Err(ServingError::SchemaMismatch(
            "location columns are not sorted, unique and free of the catch-all label".to_string(),
        ));
    }
    if schema.len() != n_features {
        return Err(ServingError::SchemaMismatch(format!(
            "model expects {} features but the schema has {} columns",
            n_features,
            schema.len()
        )));
    }
    Ok(())
}

/// The `columns.json` sidecar: every schema column, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumns {
    pub data_columns: Vec<String>,
}

impl DataColumns {
    pub fn from_schema(schema: &FeatureSchema) -> Self {
        Self {
            data_columns: schema.columns(),
        }
    }

    /// Rebuild the schema, rejecting a file whose leading columns or location
    /// block do not match the layout.
    pub fn into_schema(self) -> Result<FeatureSchema, ServingError> {
        let n_numeric = NUMERIC_COLUMNS.len();
        if self.data_columns.len() < n_numeric
            || self.data_columns[..n_numeric] != NUMERIC_COLUMNS
        {
            return Err(ServingError::SchemaMismatch(format!(
                "columns must start with {:?}",
                NUMERIC_COLUMNS
            )));
        }
        let locations = &self.data_columns[n_numeric..];
        let vocabulary = LocationVocabulary::from_locations(locations);
        if vocabulary.as_slice() != locations {
            return Err(ServingError::SchemaMismatch(
                "location columns are not sorted, unique and free of the catch-all label"
                    .to_string(),
            ));
        }
        Ok(FeatureSchema::new(vocabulary))
    }
}

pub fn write_columns_json<P: AsRef<Path>>(
    path: P,
    schema: &FeatureSchema,
) -> Result<(), ServingError> {
    let body = serde_json::to_string(&DataColumns::from_schema(schema))?;
    std::fs::write(path, body)?;
    Ok(())
}

pub fn read_columns_json<P: AsRef<Path>>(path: P) -> Result<FeatureSchema, ServingError> {
    let body = std::fs::read_to_string(path)?;
    let columns: DataColumns = serde_json::from_str(&body)?;
    columns.into_schema()
}
