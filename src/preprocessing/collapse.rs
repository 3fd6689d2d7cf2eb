//! Frequency-based collapsing of the location column.
//!
//! The raw export names well over a thousand distinct localities, most of them
//! only once or twice. Locations seen at most ten times are merged into a single
//! [`OTHER_LOCATION`] bucket; the rest form the [`LocationVocabulary`] that both
//! the training and the serving path encode against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Catch-all label for rare locations. Encodes as an all-zero location block.
pub const OTHER_LOCATION: &str = "other";

/// A location must appear at least this many times to keep its own column.
///
/// Fixed rather than configurable: a different threshold at training time would
/// silently change the schema the persisted model was fitted on.
pub const MIN_LOCATION_COUNT: usize = 11;

/// Ordered set of locations that keep their own one-hot column.
///
/// Entries are sorted, unique and never equal to [`OTHER_LOCATION`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationVocabulary {
    locations: Vec<String>,
}

impl LocationVocabulary {
    /// Build a vocabulary from arbitrary location names.
    ///
    /// Names are trimmed, sorted and deduplicated; blanks and the catch-all label
    /// are dropped.
    pub fn from_locations<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locations: Vec<String> = locations
            .into_iter()
            .map(|loc| loc.as_ref().trim().to_string())
            .filter(|loc| !loc.is_empty() && loc != OTHER_LOCATION)
            .collect();
        locations.sort();
        locations.dedup();
        Self { locations }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.locations
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(String::as_str)
    }

    /// Position of `location` within the vocabulary (exact, case-sensitive match).
    pub fn position(&self, location: &str) -> Option<usize> {
        self.locations
            .binary_search_by(|probe| probe.as_str().cmp(location))
            .ok()
    }

    pub fn contains(&self, location: &str) -> bool {
        self.position(location).is_some()
    }

    /// Keep only the entries that occur in `present`.
    pub fn restrict_to<'a, I>(&self, present: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = vec![false; self.locations.len()];
        for location in present {
            if let Some(idx) = self.position(location) {
                seen[idx] = true;
            }
        }
        let locations = self
            .locations
            .iter()
            .zip(seen)
            .filter_map(|(loc, keep)| keep.then(|| loc.clone()))
            .collect();
        Self { locations }
    }

    /// Whether the invariants hold. Deserialized vocabularies must be checked.
    pub fn is_well_formed(&self) -> bool {
        self.locations.windows(2).all(|pair| pair[0] < pair[1])
            && self
                .locations
                .iter()
                .all(|loc| !loc.is_empty() && loc != OTHER_LOCATION)
    }
}

/// Learns which locations are frequent enough to keep.
#[derive(Debug, Clone, Default)]
pub struct CategoryCollapser;

impl CategoryCollapser {
    pub fn new() -> Self {
        Self
    }
}

/// Fitted collapser: the kept vocabulary plus how many distinct names it saw.
#[derive(Debug, Clone)]
pub struct FittedCategoryCollapser {
    vocabulary: LocationVocabulary,
    n_distinct_seen: usize,
}

impl FittedCategoryCollapser {
    /// Map a location to itself if it was kept, otherwise to [`OTHER_LOCATION`].
    pub fn collapse<'a>(&self, location: &'a str) -> &'a str {
        let trimmed = location.trim();
        if self.vocabulary.contains(trimmed) {
            trimmed
        } else {
            OTHER_LOCATION
        }
    }

    pub fn vocabulary(&self) -> &LocationVocabulary {
        &self.vocabulary
    }

    /// Number of distinct trimmed locations in the training data.
    pub fn n_distinct_seen(&self) -> usize {
        self.n_distinct_seen
    }
}

impl Transformer for CategoryCollapser {
    type Input = [String];
    type Output = Vec<String>;
    type Fitted = FittedCategoryCollapser;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit CategoryCollapser on empty data".to_string(),
            ));
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for location in data {
            *counts.entry(location.trim()).or_default() += 1;
        }

        let kept = counts
            .iter()
            .filter(|(_, count)| **count >= MIN_LOCATION_COUNT)
            .map(|(loc, _)| *loc);

        Ok(FittedCategoryCollapser {
            vocabulary: LocationVocabulary::from_locations(kept),
            n_distinct_seen: counts.len(),
        })
    }
}

impl FittedTransformer for FittedCategoryCollapser {
    type Input = [String];
    type Output = Vec<String>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        Ok(data
            .iter()
            .map(|location| self.collapse(location).to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(counts: &[(&str, usize)]) -> Vec<String> {
        counts
            .iter()
            .flat_map(|(loc, n)| std::iter::repeat(loc.to_string()).take(*n))
            .collect()
    }

    #[test]
    fn test_threshold_is_strictly_more_than_ten() {
        let data = column(&[("Whitefield", 11), ("Hebbal", 10), ("Yelahanka", 1)]);
        let fitted = CategoryCollapser::new().fit(&data).unwrap();

        assert_eq!(fitted.vocabulary().as_slice(), ["Whitefield".to_string()]);
        assert_eq!(fitted.collapse("Whitefield"), "Whitefield");
        assert_eq!(fitted.collapse("Hebbal"), OTHER_LOCATION);
        assert_eq!(fitted.collapse("Yelahanka"), OTHER_LOCATION);
        assert_eq!(fitted.n_distinct_seen(), 3);
    }

    #[test]
    fn test_counts_trimmed_names_together() {
        let mut data = column(&[("Hebbal", 6)]);
        data.extend(column(&[(" Hebbal ", 5)]));
        let fitted = CategoryCollapser::new().fit(&data).unwrap();

        assert!(fitted.vocabulary().contains("Hebbal"));
        assert_eq!(fitted.collapse("  Hebbal"), "Hebbal");
        assert_eq!(fitted.n_distinct_seen(), 1);
    }

    #[test]
    fn test_collapse_is_idempotent_on_vocabulary() {
        let data = column(&[
            ("Whitefield", 30),
            ("Sarjapur  Road", 12),
            ("Hebbal", 4),
            ("Kengeri", 9),
        ]);
        let first = CategoryCollapser::new().fit(&data).unwrap();
        let collapsed = first.transform(&data).unwrap();
        let second = CategoryCollapser::new().fit(&collapsed).unwrap();

        assert_eq!(first.vocabulary(), second.vocabulary());
        assert_eq!(second.transform(&collapsed).unwrap(), collapsed);
    }

    #[test]
    fn test_other_never_enters_vocabulary() {
        let data = column(&[("other", 50), ("Whitefield", 11)]);
        let fitted = CategoryCollapser::new().fit(&data).unwrap();
        assert_eq!(fitted.vocabulary().len(), 1);
        assert!(!fitted.vocabulary().contains(OTHER_LOCATION));
    }

    #[test]
    fn test_fit_rejects_empty_input() {
        let data: Vec<String> = Vec::new();
        assert!(matches!(
            CategoryCollapser::new().fit(&data),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_vocabulary_is_sorted_and_deduplicated() {
        let vocab = LocationVocabulary::from_locations(["b", "a", "b", " c ", "", "other"]);
        assert_eq!(vocab.as_slice(), ["a", "b", "c"]);
        assert_eq!(vocab.position("c"), Some(2));
        assert_eq!(vocab.position("C"), None);
        assert!(vocab.is_well_formed());
    }

    #[test]
    fn test_restrict_to_present_locations() {
        let vocab = LocationVocabulary::from_locations(["a", "b", "c"]);
        let restricted = vocab.restrict_to(["c", "a", "zzz", "a"]);
        assert_eq!(restricted.as_slice(), ["a", "c"]);
    }
}
