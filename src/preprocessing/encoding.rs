//! One-hot encoding of cleaned listings into the model's feature layout.
//!
//! [`FeatureSchema`] is the single source of truth for column order. Both the
//! training path ([`FittedFeatureEncoder::transform`]) and the serving path
//! (`serving::PricePredictor`) read positions from it; neither builds its own.
//!
//! ```text
//! [ total_sqft | bath | bhk | loc_0 | loc_1 | ... | loc_{k-1} ]
//! ```
//!
//! There is no column for the catch-all location: "other" and any location never
//! seen in training leave the whole location block at zero.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::dataset::{CleanRecord, DesignMatrix};
use crate::preprocessing::collapse::LocationVocabulary;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Leading numeric columns, in order.
pub const NUMERIC_COLUMNS: [&str; 3] = ["total_sqft", "bath", "bhk"];

pub const SQFT_COLUMN: usize = 0;
pub const BATH_COLUMN: usize = 1;
pub const BHK_COLUMN: usize = 2;

/// Ordered feature columns: the numeric block followed by one column per
/// vocabulary location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    vocabulary: LocationVocabulary,
}

impl FeatureSchema {
    pub fn new(vocabulary: LocationVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Total number of columns, `3 + |vocabulary|`.
    pub fn len(&self) -> usize {
        NUMERIC_COLUMNS.len() + self.vocabulary.len()
    }

    /// Always false: the numeric block is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn vocabulary(&self) -> &LocationVocabulary {
        &self.vocabulary
    }

    /// Location column names in schema order.
    pub fn location_columns(&self) -> &[String] {
        self.vocabulary.as_slice()
    }

    /// Every column name in schema order.
    pub fn columns(&self) -> Vec<String> {
        NUMERIC_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.vocabulary.iter().map(str::to_string))
            .collect()
    }

    /// Absolute column index of `location`, if it has one.
    pub fn location_position(&self, location: &str) -> Option<usize> {
        self.vocabulary
            .position(location)
            .map(|idx| NUMERIC_COLUMNS.len() + idx)
    }

    pub fn is_well_formed(&self) -> bool {
        self.vocabulary.is_well_formed()
    }
}

/// Learns the schema from cleaned records: one column per non-"other" location.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Skip fitting and encode against an already frozen vocabulary.
    pub fn with_vocabulary(vocabulary: LocationVocabulary) -> FittedFeatureEncoder {
        FittedFeatureEncoder {
            schema: FeatureSchema::new(vocabulary),
        }
    }
}

/// Encoder bound to a frozen [`FeatureSchema`].
#[derive(Debug, Clone)]
pub struct FittedFeatureEncoder {
    schema: FeatureSchema,
}

impl FittedFeatureEncoder {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Encode one record as a vector of schema length.
    pub fn encode(&self, record: &CleanRecord) -> Array1<f64> {
        let mut row = Array1::zeros(self.schema.len());
        row[SQFT_COLUMN] = record.total_sqft;
        row[BATH_COLUMN] = f64::from(record.bath);
        row[BHK_COLUMN] = f64::from(record.bhk);
        if let Some(pos) = self.schema.location_position(&record.location) {
            row[pos] = 1.0;
        }
        row
    }
}

impl Transformer for FeatureEncoder {
    type Input = [CleanRecord];
    type Output = DesignMatrix;
    type Fitted = FittedFeatureEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit FeatureEncoder on empty data".to_string(),
            ));
        }
        let vocabulary = LocationVocabulary::from_locations(data.iter().map(|r| &r.location));
        Ok(Self::with_vocabulary(vocabulary))
    }
}

impl FittedTransformer for FittedFeatureEncoder {
    type Input = [CleanRecord];
    type Output = DesignMatrix;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let mut features = Array2::zeros((data.len(), self.schema.len()));
        for (mut out, record) in features.rows_mut().into_iter().zip(data) {
            out.assign(&self.encode(record));
        }
        let target = data.iter().map(|r| r.price).collect::<Array1<f64>>();
        DesignMatrix::new(features, target, self.schema.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(LocationVocabulary::from_locations([
            "Whitefield",
            "1st Phase JP Nagar",
            "Hebbal",
        ]))
    }

    #[test]
    fn test_column_order() {
        assert_eq!(
            schema().columns(),
            vec!["total_sqft", "bath", "bhk", "1st Phase JP Nagar", "Hebbal", "Whitefield"]
        );
        assert_eq!(schema().len(), 6);
        assert_eq!(schema().location_position("Hebbal"), Some(4));
        assert_eq!(schema().location_position("hebbal"), None);
    }

    #[test]
    fn test_encode_known_location() {
        let encoder = FeatureEncoder::with_vocabulary(schema().vocabulary().clone());
        let row = encoder.encode(&CleanRecord::new("Whitefield", 1200.0, 2, 3, 80.0));
        assert_eq!(row.to_vec(), vec![1200.0, 2.0, 3.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_encode_other_is_all_zero_block() {
        let encoder = FeatureEncoder::with_vocabulary(schema().vocabulary().clone());
        for location in ["other", "Nonexistent Area"] {
            let row = encoder.encode(&CleanRecord::new(location, 900.0, 1, 2, 40.0));
            assert_eq!(row.to_vec(), vec![900.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_at_most_one_location_bit() {
        let encoder = FeatureEncoder::with_vocabulary(schema().vocabulary().clone());
        for location in schema().location_columns() {
            let row = encoder.encode(&CleanRecord::new(location.as_str(), 1000.0, 2, 2, 50.0));
            let bits: f64 = row.iter().skip(NUMERIC_COLUMNS.len()).sum();
            assert_eq!(bits, 1.0);
        }
    }

    #[test]
    fn test_fit_excludes_other() {
        let records = vec![
            CleanRecord::new("other", 1000.0, 2, 2, 50.0),
            CleanRecord::new("Hebbal", 1000.0, 2, 2, 60.0),
            CleanRecord::new("Hebbal", 1100.0, 2, 2, 65.0),
        ];
        let fitted = FeatureEncoder::new().fit(&records).unwrap();
        assert_eq!(fitted.schema().columns(), vec!["total_sqft", "bath", "bhk", "Hebbal"]);
    }

    #[test]
    fn test_transform_builds_design_matrix() {
        let records = vec![
            CleanRecord::new("Hebbal", 1000.0, 2, 2, 60.0),
            CleanRecord::new("other", 1500.0, 3, 3, 90.0),
        ];
        let matrix = FeatureEncoder::new().fit_transform(&records).unwrap();
        assert_eq!(matrix.features().dim(), (2, 4));
        assert_eq!(matrix.features().row(0).to_vec(), vec![1000.0, 2.0, 2.0, 1.0]);
        assert_eq!(matrix.features().row(1).to_vec(), vec![1500.0, 3.0, 3.0, 0.0]);
        assert_eq!(matrix.target().to_vec(), vec![60.0, 90.0]);
    }

    #[test]
    fn test_fit_rejects_empty() {
        assert!(FeatureEncoder::new().fit(&[]).is_err());
    }
}
