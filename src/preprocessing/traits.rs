//! Core traits for fitted preprocessing stages.
//!
//! - [`Transformer`]: unfitted stage; learns its state from training data.
//! - [`FittedTransformer`]: frozen state, applied to new data.
//!
//! Stages that learn something from the training corpus (the location collapser,
//! the feature encoder) go through this pair so their learned state is an explicit
//! value. The encoder's state, the [`FeatureSchema`](super::FeatureSchema), is
//! persisted with the model in `serving::ModelArtifacts`.

use crate::preprocessing::error::PreprocessingError;

/// Trait for unfitted stages with hyperparameters.
///
/// # Example
/// ```
/// use homeprice::preprocessing::{CategoryCollapser, Transformer};
///
/// let locations: Vec<String> = std::iter::repeat("Whitefield".to_string())
///     .take(11)
///     .chain(["Rare Lane".to_string()])
///     .collect();
/// let fitted = CategoryCollapser::new().fit(&locations).unwrap();
/// assert_eq!(fitted.collapse("Rare Lane"), "other");
/// assert_eq!(fitted.collapse("Whitefield"), "Whitefield");
/// ```
pub trait Transformer: Clone {
    /// Data the stage learns from and transforms.
    type Input: ?Sized;
    /// Result of transforming the input.
    type Output;
    /// The fitted stage ready for inference.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Learn the stage's state from training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty or malformed.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.fit(data)?.transform(data)
    }
}

/// Trait for fitted stages ready for inference.
pub trait FittedTransformer: Clone + Sized {
    type Input: ?Sized;
    type Output;

    /// Apply the learned state to data.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;
}
