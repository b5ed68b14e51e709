//! Grouping and aggregation: partition a filtered record set by a
//! categorical key and bundle per-group statistics for the rendering
//! boundary.
//!
//! Partitions preserve first-seen key order, which is also the tie-break
//! order for every stable sort. Groups below the minimum-size threshold
//! are dropped silently; interactive filtering produces them routinely and
//! they are not errors.

use im::Vector;
use rayon::prelude::*;
use std::collections::HashMap;
use std::str::FromStr;

use crate::core::metrics::{self, simpson_diversity};
use crate::core::{
    BubblePoint, Dimension, EmployeeRecord, GroupRef, GroupSummary, HeatmapCell, Insights, Pillar,
    ScoreCategory, ScoreField, ScoreThresholds, ScoreVariant,
};
use crate::errors::Error;

/// What a grouped view partitions by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKey {
    Dimension(Dimension),
    /// The synthesized intersectional identity label.
    Intersection,
}

impl GroupKey {
    fn value_of<'a>(&self, record: &'a EmployeeRecord) -> &'a str {
        match self {
            GroupKey::Dimension(dimension) => dimension.value_of(record),
            GroupKey::Intersection => &record.intersection,
        }
    }
}

impl FromStr for GroupKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "intersection" | "intersectional" | "intersections" => Ok(GroupKey::Intersection),
            _ => Dimension::from_str(s).map(GroupKey::Dimension),
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Dimension(dimension) => write!(f, "{dimension}"),
            GroupKey::Intersection => write!(f, "Intersection"),
        }
    }
}

/// Group ordering requested by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Alphabetical by key
    Key,
    MeanAscending,
    #[default]
    MeanDescending,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "key" | "alphabetical" => Ok(SortOrder::Key),
            "asc" | "ascending" | "mean-asc" => Ok(SortOrder::MeanAscending),
            "desc" | "descending" | "mean-desc" => Ok(SortOrder::MeanDescending),
            other => Err(Error::Filter(format!("unknown sort order: {other}"))),
        }
    }
}

/// The metric axis of the matrix views: one kind applied across pillars.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetricKind {
    Positive,
    #[default]
    Negative,
    Gap,
}

impl MetricKind {
    pub fn field(&self, pillar: Pillar) -> ScoreField {
        match self {
            MetricKind::Positive => ScoreField::Positive(pillar),
            MetricKind::Negative => ScoreField::Negative(pillar),
            MetricKind::Gap => ScoreField::Gap(pillar),
        }
    }
}

impl FromStr for MetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(MetricKind::Positive),
            "negative" => Ok(MetricKind::Negative),
            "gap" => Ok(MetricKind::Gap),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MetricKind::Positive => "positive",
            MetricKind::Negative => "negative",
            MetricKind::Gap => "gap",
        };
        write!(f, "{s}")
    }
}

/// Partition records by key value, preserving first-seen key order.
/// Empty key values are skipped. The union of the partitions is exactly
/// the non-empty-keyed input; no record lands in two groups.
pub fn partition<'a>(
    records: &'a Vector<EmployeeRecord>,
    key: &GroupKey,
) -> Vec<(String, Vec<&'a EmployeeRecord>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&EmployeeRecord>)> = Vec::new();

    for record in records {
        let value = key.value_of(record);
        if value.is_empty() {
            continue;
        }
        match index.get(value).copied() {
            Some(i) => groups[i].1.push(record),
            None => {
                index.insert(value.to_string(), groups.len());
                groups.push((value.to_string(), vec![record]));
            }
        }
    }

    groups
}

/// Full statistics bundle for one group's scalar values. Count is the
/// member count; every statistic is computed over the finite values only.
/// A group with no finite values reports zeroed statistics (documented
/// sentinel) rather than NaN.
fn summarize(key: String, member_count: usize, values: &[f64]) -> GroupSummary {
    let sorted = metrics::sorted_finite(values);
    if sorted.is_empty() {
        return GroupSummary {
            key,
            count: member_count,
            mean: 0.0,
            median: 0.0,
            q1: 0.0,
            q3: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
            lower_whisker: 0.0,
            upper_whisker: 0.0,
            outliers: Vec::new(),
        };
    }

    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let q1 = metrics::quantile(&sorted, 0.25).unwrap_or(0.0);
    let median = metrics::quantile(&sorted, 0.5).unwrap_or(0.0);
    let q3 = metrics::quantile(&sorted, 0.75).unwrap_or(0.0);
    let std = metrics::population_std(&sorted).unwrap_or(0.0);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let (lower_whisker, upper_whisker) = metrics::whiskers(min, max, q1, q3);
    let outliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_whisker || *v > upper_whisker)
        .collect();

    GroupSummary {
        key,
        count: member_count,
        mean,
        median,
        q1,
        q3,
        std,
        min,
        max,
        lower_whisker,
        upper_whisker,
        outliers,
    }
}

/// Partition, prune under-threshold groups, compute statistics, sort.
pub fn aggregate(
    records: &Vector<EmployeeRecord>,
    key: &GroupKey,
    field: ScoreField,
    variant: ScoreVariant,
    min_size: usize,
    sort: SortOrder,
) -> Vec<GroupSummary> {
    let groups = partition(records, key);

    let mut summaries: Vec<GroupSummary> = groups
        .par_iter()
        .filter(|(_, members)| members.len() >= min_size.max(1))
        .map(|(group_key, members)| {
            let values: Vec<f64> = members.iter().map(|r| r.score(field, variant)).collect();
            summarize(group_key.clone(), members.len(), &values)
        })
        .collect();

    sort_groups(&mut summaries, sort);
    summaries
}

fn sort_groups(groups: &mut [GroupSummary], sort: SortOrder) {
    match sort {
        SortOrder::Key => groups.sort_by(|a, b| a.key.cmp(&b.key)),
        SortOrder::MeanAscending => groups.sort_by(|a, b| {
            a.mean
                .partial_cmp(&b.mean)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortOrder::MeanDescending => groups.sort_by(|a, b| {
            b.mean
                .partial_cmp(&a.mean)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }
}

/// Headline numbers over aggregated groups; `None` for an empty view.
pub fn insights(groups: &[GroupSummary]) -> Option<Insights> {
    let first = groups.first()?;
    let mut highest = first;
    let mut lowest = first;
    for group in groups {
        if group.mean > highest.mean {
            highest = group;
        }
        if group.mean < lowest.mean {
            lowest = group;
        }
    }

    let average = groups.iter().map(|g| g.mean).sum::<f64>() / groups.len() as f64;
    Some(Insights {
        highest: GroupRef {
            key: highest.key.clone(),
            mean: highest.mean,
            count: highest.count,
        },
        lowest: GroupRef {
            key: lowest.key.clone(),
            mean: lowest.mean,
            count: lowest.count,
        },
        gap: highest.mean - lowest.mean,
        average,
    })
}

/// Simpson's diversity index over one dimension of the record set.
pub fn diversity_index(records: &Vector<EmployeeRecord>, dimension: Dimension) -> f64 {
    let groups = partition(records, &GroupKey::Dimension(dimension));
    let counts: Vec<usize> = groups.iter().map(|(_, members)| members.len()).collect();
    simpson_diversity(&counts)
}

/// Demographics matrix: one row per dimension, one column per category,
/// cell value = mean of the selected score over that category's records.
pub fn heatmap_demographics(
    records: &Vector<EmployeeRecord>,
    dimensions: &[Dimension],
    field: ScoreField,
    variant: ScoreVariant,
) -> Vec<HeatmapCell> {
    let mut cells = Vec::new();
    for dimension in dimensions {
        for (category, members) in partition(records, &GroupKey::Dimension(*dimension)) {
            if let Some(cell) = matrix_cell(dimension.to_string(), category, &members, field, variant)
            {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Division matrix: one row per pillar of the chosen metric kind, one
/// column per division.
pub fn heatmap_divisions(
    records: &Vector<EmployeeRecord>,
    kind: MetricKind,
    variant: ScoreVariant,
) -> Vec<HeatmapCell> {
    let divisions = partition(records, &GroupKey::Dimension(Dimension::Division));
    let mut cells = Vec::new();
    for pillar in Pillar::ALL {
        for (division, members) in &divisions {
            if let Some(cell) = matrix_cell(
                pillar.to_string(),
                division.clone(),
                members,
                kind.field(pillar),
                variant,
            ) {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Manager matrix: one row per pillar, one column per manager, restricted
/// to the `top` managers by team size. Flag-like manager values are not
/// managers and are excluded.
pub fn heatmap_managers(
    records: &Vector<EmployeeRecord>,
    kind: MetricKind,
    variant: ScoreVariant,
    top: usize,
) -> Vec<HeatmapCell> {
    let mut managers: Vec<(String, Vec<&EmployeeRecord>)> =
        partition(records, &GroupKey::Dimension(Dimension::Manager))
            .into_iter()
            .filter(|(name, _)| !matches!(name.as_str(), "No" | "Yes" | "True" | "False"))
            .collect();
    managers.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    managers.truncate(top);

    let mut cells = Vec::new();
    for pillar in Pillar::ALL {
        for (manager, members) in &managers {
            if let Some(cell) = matrix_cell(
                pillar.to_string(),
                manager.clone(),
                members,
                kind.field(pillar),
                variant,
            ) {
                cells.push(cell);
            }
        }
    }
    cells
}

/// One matrix cell; `None` when no member has a finite value for the
/// field. Count is the sample actually averaged, not the raw member count.
fn matrix_cell(
    group: String,
    category: String,
    members: &[&EmployeeRecord],
    field: ScoreField,
    variant: ScoreVariant,
) -> Option<HeatmapCell> {
    let values: Vec<f64> = members
        .iter()
        .map(|r| r.score(field, variant))
        .filter(|v| v.is_finite())
        .collect();
    let mean = metrics::mean(&values)?;
    Some(HeatmapCell {
        group,
        category,
        value: mean,
        count: values.len(),
    })
}

/// Intersectional bubbles: one point per identity-combination group,
/// x = marginalization layers, y = mean score, size = head count.
pub fn intersectional_bubbles(
    records: &Vector<EmployeeRecord>,
    field: ScoreField,
    variant: ScoreVariant,
    min_size: usize,
    thresholds: &ScoreThresholds,
) -> Vec<BubblePoint> {
    partition(records, &GroupKey::Intersection)
        .into_iter()
        .filter(|(_, members)| members.len() >= min_size.max(1))
        .map(|(label, members)| {
            let layers = if label == "Majority Group" {
                0
            } else {
                label.split(" + ").count()
            };
            let mean = group_mean(&members, field, variant);
            BubblePoint {
                x: layers as f64,
                y: mean,
                size: members.len(),
                category: ScoreCategory::classify(mean, thresholds),
                key: label,
            }
        })
        .collect()
}

/// Division performance bubbles: x = Simpson gender-diversity index of the
/// division, y = mean score, size = head count.
pub fn division_bubbles(
    records: &Vector<EmployeeRecord>,
    field: ScoreField,
    variant: ScoreVariant,
    min_size: usize,
    thresholds: &ScoreThresholds,
) -> Vec<BubblePoint> {
    partition(records, &GroupKey::Dimension(Dimension::Division))
        .into_iter()
        .filter(|(_, members)| members.len() >= min_size.max(1))
        .map(|(division, members)| {
            let mut gender_counts: HashMap<&str, usize> = HashMap::new();
            for member in &members {
                *gender_counts.entry(member.gender.as_str()).or_insert(0) += 1;
            }
            let counts: Vec<usize> = gender_counts.values().copied().collect();

            let mean = group_mean(&members, field, variant);
            BubblePoint {
                x: simpson_diversity(&counts),
                y: mean,
                size: members.len(),
                category: ScoreCategory::classify(mean, thresholds),
                key: division,
            }
        })
        .collect()
}

fn group_mean(members: &[&EmployeeRecord], field: ScoreField, variant: ScoreVariant) -> f64 {
    let values: Vec<f64> = members.iter().map(|r| r.score(field, variant)).collect();
    metrics::mean(&values).unwrap_or(0.0)
}
