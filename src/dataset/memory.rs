use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::preprocessing::encoding::FeatureSchema;
use crate::preprocessing::error::PreprocessingError;

/// Numeric training table: one row per cleaned listing, columns in schema order,
/// paired with the listing price in lakhs.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    features: Array2<f64>,
    target: Array1<f64>,
    schema: FeatureSchema,
}

impl DesignMatrix {
    pub fn new(
        features: Array2<f64>,
        target: Array1<f64>,
        schema: FeatureSchema,
    ) -> Result<Self, PreprocessingError> {
        let (rows, cols) = features.dim();
        if cols != schema.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: schema.len(),
                got_features: cols,
            });
        }
        if rows != target.len() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "features have {} rows but target has {} values",
                rows,
                target.len()
            )));
        }
        Ok(Self {
            features,
            target,
            schema,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn target(&self) -> ArrayView1<'_, f64> {
        self.target.view()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Copy the given rows, in the given order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            target: self.target.select(Axis(0), indices),
            schema: self.schema.clone(),
        }
    }

    /// Shuffle row indices with a seeded RNG and split off `test_fraction` of them.
    ///
    /// Returns `(train, test)`. The same seed always yields the same split.
    pub fn train_test_split(
        &self,
        test_fraction: f64,
        seed: u64,
    ) -> Result<(Self, Self), PreprocessingError> {
        if !(0.0..1.0).contains(&test_fraction) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "test fraction must be in [0, 1), got {}",
                test_fraction
            )));
        }

        let mut indices: Vec<usize> = (0..self.n_rows()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_test = (self.n_rows() as f64 * test_fraction).ceil() as usize;
        let (test_idx, train_idx) = indices.split_at(n_test.min(indices.len()));
        if train_idx.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "train split would contain no rows".to_string(),
            ));
        }

        Ok((self.select_rows(train_idx), self.select_rows(test_idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::collapse::LocationVocabulary;

    fn matrix(rows: usize) -> DesignMatrix {
        let schema = FeatureSchema::new(LocationVocabulary::from_locations(["A"]));
        let features = Array2::from_shape_fn((rows, 4), |(r, c)| (r * 4 + c) as f64);
        let target = Array1::from_shape_fn(rows, |r| r as f64);
        DesignMatrix::new(features, target, schema).unwrap()
    }

    #[test]
    fn test_rejects_column_count_off_schema() {
        let schema = FeatureSchema::new(LocationVocabulary::from_locations(["A"]));
        let result = DesignMatrix::new(Array2::zeros((2, 3)), Array1::zeros(2), schema);
        assert!(matches!(
            result,
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_target_length_mismatch() {
        let schema = FeatureSchema::new(LocationVocabulary::default());
        let result = DesignMatrix::new(Array2::zeros((2, 3)), Array1::zeros(3), schema);
        assert!(result.is_err());
    }

    #[test]
    fn test_split_sizes_and_partition() {
        let data = matrix(10);
        let (train, test) = data.train_test_split(0.2, 10).unwrap();
        assert_eq!(train.n_rows(), 8);
        assert_eq!(test.n_rows(), 2);

        let mut seen: Vec<f64> = train
            .target()
            .iter()
            .chain(test.target().iter())
            .copied()
            .collect();
        seen.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(seen, (0..10).map(|r| r as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_reproducible() {
        let data = matrix(25);
        let (a, _) = data.train_test_split(0.2, 7).unwrap();
        let (b, _) = data.train_test_split(0.2, 7).unwrap();
        assert_eq!(a.target(), b.target());
    }

    #[test]
    fn test_split_keeps_rows_intact() {
        let data = matrix(6);
        let (train, _) = data.train_test_split(0.5, 1).unwrap();
        for (row, y) in train.features().rows().into_iter().zip(train.target().iter()) {
            assert_eq!(row[0], y * 4.0);
        }
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        let data = matrix(4);
        assert!(data.train_test_split(1.0, 0).is_err());
        assert!(data.train_test_split(-0.1, 0).is_err());
    }
}
