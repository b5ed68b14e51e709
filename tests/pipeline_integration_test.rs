//! End-to-end runs of the load → normalize → filter → aggregate/correlate
//! pipeline over an inline fixture table.

mod common;

use std::path::PathBuf;

use deimap::aggregation::{
    division_bubbles, heatmap_demographics, heatmap_divisions, intersectional_bubbles, MetricKind,
};
use deimap::analysis::{bivariate, scatter_points};
use deimap::core::{
    Dimension, Pillar, ScoreCategory, ScoreField, ScoreThresholds, ScoreVariant, SyntheticNegative,
};
use deimap::filters::{apply, FilterState};
use deimap::io::loader::read_rows;
use deimap::normalize::normalize_rows;
use deimap::Dataset;

fn dataset(csv: &str) -> Dataset {
    let rows = read_rows(csv.as_bytes(), &PathBuf::from("fixture.csv")).unwrap();
    normalize_rows(&rows, SyntheticNegative::Zero)
}

fn mixed_table() -> String {
    let mut rows = Vec::new();
    for i in 0..8 {
        rows.push(common::Row {
            id: i + 1,
            gender: "Female",
            division: "Engineering",
            age: 26 + i as u32,
            d_answer: "2",
            ..common::Row::default()
        });
    }
    for i in 0..8 {
        rows.push(common::Row {
            id: i + 9,
            gender: "Male",
            division: "Sales",
            age: 40 + i as u32,
            lgbtq: if i % 2 == 0 { "Yes" } else { "No" },
            d_answer: "-1",
            ..common::Row::default()
        });
    }
    common::table(&rows)
}

#[test]
fn test_filter_then_aggregate_flow() {
    let data = dataset(&mixed_table());
    assert_eq!(data.len(), 16);

    let filter = FilterState::new(24, 65, 1).accept(
        Dimension::Division,
        ["Engineering".to_string()],
    );
    let filtered = apply(&data, &filter);
    assert_eq!(filtered.len(), 8);

    // re-applying the same snapshot is a fixed point
    let again = apply(&Dataset { records: filtered.clone() }, &filter);
    assert_eq!(filtered, again);
}

#[test]
fn test_unique_values_first_seen_order() {
    let data = dataset(&mixed_table());
    assert_eq!(
        data.unique_values(Dimension::Division),
        vec!["Engineering".to_string(), "Sales".to_string()]
    );
}

#[test]
fn test_heatmap_demographics_cells() {
    let data = dataset(&mixed_table());
    let cells = heatmap_demographics(
        &data.records,
        &[Dimension::Gender],
        ScoreField::Negative(Pillar::Diversity),
        ScoreVariant::SignedSplit,
    );

    assert_eq!(cells.len(), 2);
    let female = cells.iter().find(|c| c.category == "Female").unwrap();
    let male = cells.iter().find(|c| c.category == "Male").unwrap();
    // sign-flipped severity: the all-negative group shows magnitude 1.0
    assert_eq!(female.value, 0.0);
    assert_eq!(male.value, 1.0);
    assert_eq!(male.count, 8);
}

#[test]
fn test_heatmap_divisions_has_pillar_rows() {
    let data = dataset(&mixed_table());
    let cells = heatmap_divisions(&data.records, MetricKind::Positive, ScoreVariant::SignedSplit);

    // three pillar rows x two divisions
    assert_eq!(cells.len(), 6);
    assert!(cells.iter().any(|c| c.group == "Diversity"));
    assert!(cells.iter().any(|c| c.group == "Inclusion" && c.category == "Sales"));
}

#[test]
fn test_intersectional_bubbles_layers_and_categories() {
    let data = dataset(&mixed_table());
    let thresholds = ScoreThresholds::default();
    let points = intersectional_bubbles(
        &data.records,
        ScoreField::Combined(Pillar::Diversity),
        ScoreVariant::SignedSplit,
        4,
        &thresholds,
    );

    // 12 majority records and 4 LGBTQ records survive the min size of 4
    assert_eq!(points.len(), 2);
    let majority = points.iter().find(|p| p.key == "Majority Group").unwrap();
    let lgbtq = points.iter().find(|p| p.key == "LGBTQ+").unwrap();

    assert_eq!(majority.x, 0.0);
    assert_eq!(majority.size, 12);
    assert_eq!(lgbtq.x, 1.0);
    assert_eq!(lgbtq.size, 4);
    // combined score of all-negative answers: (0 - 1)/5 per record
    assert!((lgbtq.y - (-0.2)).abs() < 1e-12);
    assert_eq!(lgbtq.category, ScoreCategory::Moderate);
}

#[test]
fn test_division_bubbles_diversity_index() {
    let data = dataset(&mixed_table());
    let thresholds = ScoreThresholds::default();
    let points = division_bubbles(
        &data.records,
        ScoreField::Combined(Pillar::Diversity),
        ScoreVariant::SignedSplit,
        1,
        &thresholds,
    );

    assert_eq!(points.len(), 2);
    // single-gender divisions have zero gender diversity
    assert!(points.iter().all(|p| p.x == 0.0));
    assert!(points.iter().all(|p| p.size == 8));
}

#[test]
fn test_bivariate_over_filtered_set() {
    let data = dataset(&mixed_table());
    let stats = bivariate(
        &data.records,
        ScoreField::Age,
        ScoreField::Positive(Pillar::Diversity),
        ScoreVariant::SignedSplit,
    );

    assert_eq!(stats.n, 16);
    // older records answered negatively, so age anti-correlates
    assert!(stats.r < 0.0);
    let regression = stats.regression.unwrap();
    assert!(regression.slope < 0.0);

    let points = scatter_points(
        &data.records,
        ScoreField::Age,
        ScoreField::Positive(Pillar::Diversity),
        ScoreVariant::SignedSplit,
    );
    assert_eq!(points.len(), 16);
    assert!(points.iter().any(|p| p.category == "LGBTQ+"));
}

#[test]
fn test_variant_b_synthetic_negative_modes() {
    let csv = common::table(&[common::Row {
        d_answer: "2",
        ..common::Row::default()
    }]);

    let rows = read_rows(csv.as_bytes(), &PathBuf::from("fixture.csv")).unwrap();

    let zero = normalize_rows(&rows, SyntheticNegative::Zero);
    let record = &zero.records[0];
    assert_eq!(record.scores.all_mean[0].positive, 2.0);
    assert_eq!(record.scores.all_mean[0].negative, 0.0);

    let mirrored = normalize_rows(&rows, SyntheticNegative::MirrorPositive);
    let record = &mirrored.records[0];
    assert_eq!(record.scores.all_mean[0].negative, 2.0);
    assert_eq!(
        record.score(ScoreField::Combined(Pillar::Diversity), ScoreVariant::AllMean),
        0.0
    );
}
