//! Filter engine: a total, order-independent conjunction of predicates
//! over the normalized record set.
//!
//! `FilterState` is an explicit value the caller rebuilds and passes
//! wholesale on every interaction; the engine never mutates it and never
//! mutates records. Minimum-group-size pruning is an aggregation concern
//! and deliberately absent here.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::core::{Dataset, Dimension, EmployeeRecord, Identity};
use crate::errors::Error;

/// Multi-attribute predicates a view can engage in addition to the
/// per-dimension accepted sets.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Combination {
    /// Two or more marginalization layers
    MultipleLayers,
    /// Three or more marginalization layers
    TripleLayers,
    /// LGBTQ and Minority both true
    LgbtqMinority,
    /// Disability and Veteran both true
    DisabilityVeteran,
}

impl Combination {
    fn matches(&self, record: &EmployeeRecord) -> bool {
        match self {
            Combination::MultipleLayers => record.layers >= 2,
            Combination::TripleLayers => record.layers >= 3,
            Combination::LgbtqMinority => record.flags.lgbtq && record.flags.minority,
            Combination::DisabilityVeteran => record.flags.disability && record.flags.veteran,
        }
    }
}

impl FromStr for Combination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "multiple" | "multiple-layers" => Ok(Combination::MultipleLayers),
            "triple" | "triple-layers" => Ok(Combination::TripleLayers),
            "lgbtq-minority" => Ok(Combination::LgbtqMinority),
            "disability-veteran" => Ok(Combination::DisabilityVeteran),
            other => Err(Error::Filter(format!("unknown combination: {other}"))),
        }
    }
}

/// Snapshot of every active filter. Rebuilt per interaction, never
/// partially updated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FilterState {
    /// Inclusive age bounds.
    pub age_range: (u32, u32),
    /// Accepted category values per dimension; an empty or absent set
    /// imposes no restriction on that dimension.
    #[serde(default)]
    pub accepted: BTreeMap<Dimension, BTreeSet<String>>,
    /// Inclusive marginalization-layer bounds.
    pub layer_range: (u8, u8),
    /// When engaged, a record must carry at least one of these identities
    /// or have zero layers.
    #[serde(default)]
    pub active_groups: Option<BTreeSet<Identity>>,
    /// When non-empty, a record must satisfy at least one combination.
    #[serde(default)]
    pub combinations: BTreeSet<Combination>,
    /// Applied downstream by the aggregation engine, not per record.
    pub min_group_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(24, 65, 5)
    }
}

impl FilterState {
    pub fn new(age_min: u32, age_max: u32, min_group_size: usize) -> Self {
        Self {
            age_range: (age_min, age_max),
            accepted: BTreeMap::new(),
            layer_range: (0, 5),
            active_groups: None,
            combinations: BTreeSet::new(),
            min_group_size,
        }
    }

    /// Restrict a dimension to the given accepted values.
    pub fn accept(mut self, dimension: Dimension, values: impl IntoIterator<Item = String>) -> Self {
        self.accepted.entry(dimension).or_default().extend(values);
        self
    }

    pub fn with_layer_range(mut self, min: u8, max: u8) -> Self {
        self.layer_range = (min, max);
        self
    }

    pub fn with_active_groups(mut self, groups: impl IntoIterator<Item = Identity>) -> Self {
        self.active_groups = Some(groups.into_iter().collect());
        self
    }

    pub fn with_combinations(mut self, combos: impl IntoIterator<Item = Combination>) -> Self {
        self.combinations.extend(combos);
        self
    }

    /// The full conjunction. A record passes iff every active predicate
    /// holds.
    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        let (age_min, age_max) = self.age_range;
        if record.age < age_min || record.age > age_max {
            return false;
        }

        for (dimension, values) in &self.accepted {
            if !values.is_empty() && !values.contains(dimension.value_of(record)) {
                return false;
            }
        }

        let (layer_min, layer_max) = self.layer_range;
        if record.layers < layer_min || record.layers > layer_max {
            return false;
        }

        if let Some(groups) = &self.active_groups {
            let in_active_group = groups.iter().any(|g| record.flags.has(*g));
            if record.layers > 0 && !in_active_group {
                return false;
            }
        }

        if !self.combinations.is_empty() && !self.combinations.iter().any(|c| c.matches(record)) {
            return false;
        }

        true
    }
}

/// Apply a filter snapshot to the working set. Deterministic, idempotent,
/// and a strict subset operation.
pub fn apply(dataset: &Dataset, filter: &FilterState) -> Vector<EmployeeRecord> {
    let filtered: Vector<EmployeeRecord> = dataset
        .records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();

    log::debug!(
        "filter kept {} of {} records",
        filtered.len(),
        dataset.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SyntheticNegative;
    use crate::io::loader::RawRow;
    use crate::normalize::normalize_row;

    fn record(age: u32, gender: &str, lgbtq: &str, veteran: &str) -> EmployeeRecord {
        let mut row = RawRow::new();
        row.insert("Id".to_string(), "1".to_string());
        row.insert("Age".to_string(), age.to_string());
        row.insert("Gender".to_string(), gender.to_string());
        row.insert("LGBTQ".to_string(), lgbtq.to_string());
        row.insert("Veteran".to_string(), veteran.to_string());
        row.insert("Ethnicity".to_string(), "White".to_string());
        // finite survey answers keep record equality meaningful (NaN != NaN)
        for pillar in ["D", "E", "I"] {
            for q in 1..=5 {
                row.insert(format!("Aug_{pillar}_Q{q}"), "1".to_string());
            }
        }
        normalize_row(&row, SyntheticNegative::Zero)
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record(25, "Female", "No", "No"),
            record(40, "Male", "Yes", "No"),
            record(55, "Female", "Yes", "Yes"),
            record(62, "Non-binary", "No", "Yes"),
        ])
    }

    #[test]
    fn test_age_bounds_inclusive() {
        let filter = FilterState::new(40, 55, 1);
        let kept = apply(&dataset(), &filter);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_accepted_set_restricts_dimension() {
        let filter =
            FilterState::new(24, 65, 1).accept(Dimension::Gender, ["Female".to_string()]);
        let kept = apply(&dataset(), &filter);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.gender == "Female"));
    }

    #[test]
    fn test_empty_accepted_set_means_show_all() {
        let filter = FilterState::new(24, 65, 1).accept(Dimension::Gender, []);
        assert_eq!(apply(&dataset(), &filter).len(), 4);
    }

    #[test]
    fn test_zero_layers_bypass_active_groups() {
        let filter = FilterState::new(24, 65, 1).with_active_groups([Identity::Veteran]);
        let kept = apply(&dataset(), &filter);

        // zero-layer records pass, as does anyone with the veteran flag;
        // the LGBTQ-only record does not
        let genders: Vec<&str> = kept.iter().map(|r| r.gender.as_str()).collect();
        assert_eq!(genders, vec!["Female", "Female", "Non-binary"]);
    }

    #[test]
    fn test_combination_predicates() {
        let filter =
            FilterState::new(24, 65, 1).with_combinations([Combination::MultipleLayers]);
        let kept = apply(&dataset(), &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].layers, 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = FilterState::new(24, 60, 1)
            .accept(Dimension::Lgbtq, ["Yes".to_string()])
            .with_layer_range(1, 5);

        let once = apply(&dataset(), &filter);
        let twice = apply(&Dataset { records: once.clone() }, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_is_subset() {
        let data = dataset();
        let filter = FilterState::new(30, 60, 1);
        let kept = apply(&data, &filter);
        assert!(kept.len() <= data.len());
        assert!(kept.iter().all(|r| data.records.contains(r)));
    }

    #[test]
    fn test_combination_parsing_rejects_unknown() {
        assert!(Combination::from_str("triple").is_ok());
        assert!(Combination::from_str("quadruple").is_err());
    }
}
