//! Per-location outlier rejection.
//!
//! Every pass here is a pure group → aggregate → filter step: statistics are
//! computed from the full input snapshot first, then rows are kept or dropped in
//! one sweep. Surviving rows keep their relative input order.

use std::collections::{BTreeMap, HashMap};

use crate::dataset::CleanRecord;

/// Smallest believable floor area per bedroom, in square feet.
pub const MIN_SQFT_PER_BEDROOM: f64 = 300.0;

/// A `bhk - 1` group needs more rows than this before it can veto a larger unit.
pub const MIN_REFERENCE_GROUP_SIZE: usize = 5;

/// Count, mean and population standard deviation of one group's price per sqft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    /// All values in the group are identical.
    pub constant: bool,
}

impl GroupStats {
    /// Aggregate a non-empty group. Returns `None` for an empty iterator.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let values = values.into_iter();
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.clone() {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return None;
        }

        if min == max {
            return Some(Self {
                count,
                mean: min,
                std: 0.0,
                constant: true,
            });
        }

        let n = count as f64;
        let mean = sum / n;
        let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            count,
            mean,
            std: variance.sqrt(),
            constant: false,
        })
    }

    /// Whether `value` lies in the band `(mean - std, mean + std]`.
    ///
    /// A constant group has no spread, so only its own value is inside.
    pub fn within_one_std(&self, value: f64) -> bool {
        if self.constant {
            return value == self.mean;
        }
        self.mean - self.std < value && value <= self.mean + self.std
    }
}

fn group_by_location(records: &[CleanRecord]) -> BTreeMap<&str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        groups.entry(record.location.as_str()).or_default().push(idx);
    }
    groups
}

fn keep_marked(records: Vec<CleanRecord>, keep: &[bool]) -> Vec<CleanRecord> {
    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, &keep)| keep.then_some(record))
        .collect()
}

/// Drop listings with less than [`MIN_SQFT_PER_BEDROOM`] per bedroom.
pub fn remove_cramped_units(records: Vec<CleanRecord>) -> Vec<CleanRecord> {
    records
        .into_iter()
        .filter(|r| r.sqft_per_bedroom() >= MIN_SQFT_PER_BEDROOM)
        .collect()
}

/// Drop listings with more than one bathroom beyond the bedroom count.
pub fn remove_excess_bathrooms(records: Vec<CleanRecord>) -> Vec<CleanRecord> {
    records
        .into_iter()
        .filter(|r| r.bath.saturating_sub(r.bhk) < 2)
        .collect()
}

/// Keep, per location, only listings whose price per sqft lies within one
/// population standard deviation of the location mean.
///
/// The band is exclusive at the low end and inclusive at the high end:
/// `mean - std < pps <= mean + std`.
pub fn price_density_band_filter(records: Vec<CleanRecord>) -> Vec<CleanRecord> {
    let mut keep = vec![false; records.len()];
    for rows in group_by_location(&records).values() {
        let stats = GroupStats::from_values(rows.iter().map(|&i| records[i].price_per_sqft));
        let Some(stats) = stats else { continue };
        for &i in rows {
            keep[i] = stats.within_one_std(records[i].price_per_sqft);
        }
    }
    keep_marked(records, &keep)
}

/// Per-location, per-bedroom-count price statistics.
pub fn bhk_stats(records: &[CleanRecord]) -> BTreeMap<&str, BTreeMap<u32, GroupStats>> {
    let mut stats = BTreeMap::new();
    for (location, rows) in group_by_location(records) {
        let mut by_bhk: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for i in rows {
            by_bhk
                .entry(records[i].bhk)
                .or_default()
                .push(records[i].price_per_sqft);
        }
        let per_bhk = by_bhk
            .into_iter()
            .filter_map(|(bhk, values)| {
                GroupStats::from_values(values.iter().copied()).map(|s| (bhk, s))
            })
            .collect();
        stats.insert(location, per_bhk);
    }
    stats
}

/// Drop listings priced per sqft below the mean of the next-smaller unit type in
/// the same location.
///
/// A row with `b` bedrooms is dropped when the location has a `b - 1` group with
/// more than [`MIN_REFERENCE_GROUP_SIZE`] rows and the row's price per sqft is
/// strictly below that group's mean. All decisions use the statistics of the
/// unfiltered input.
pub fn bhk_monotonicity_filter(records: Vec<CleanRecord>) -> Vec<CleanRecord> {
    let excluded: Vec<bool> = {
        let stats = bhk_stats(&records);
        let reference: HashMap<(&str, u32), GroupStats> = stats
            .iter()
            .flat_map(|(loc, per_bhk)| per_bhk.iter().map(move |(bhk, s)| ((*loc, *bhk), *s)))
            .collect();

        records
            .iter()
            .map(|record| {
                let Some(smaller) = record.bhk.checked_sub(1) else {
                    return false;
                };
                match reference.get(&(record.location.as_str(), smaller)) {
                    Some(s) if s.count > MIN_REFERENCE_GROUP_SIZE => {
                        record.price_per_sqft < s.mean
                    }
                    _ => false,
                }
            })
            .collect()
    };
    let keep: Vec<bool> = excluded.iter().map(|&e| !e).collect();
    keep_marked(records, &keep)
}
