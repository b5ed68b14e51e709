mod common;

use std::collections::HashSet;
use std::path::PathBuf;

use deimap::aggregation::{aggregate, diversity_index, partition, GroupKey, SortOrder};
use deimap::core::{Dimension, Pillar, ScoreField, ScoreVariant, SyntheticNegative};
use deimap::io::loader::read_rows;
use deimap::normalize::normalize_rows;
use deimap::Dataset;
use pretty_assertions::assert_eq;

fn dataset(csv: &str) -> Dataset {
    let rows = read_rows(csv.as_bytes(), &PathBuf::from("fixture.csv")).unwrap();
    normalize_rows(&rows, SyntheticNegative::Zero)
}

#[test]
fn test_gender_split_acceptance_example() {
    let data = dataset(&common::gender_split_table());
    assert_eq!(data.len(), 20);

    let groups = aggregate(
        &data.records,
        &GroupKey::Dimension(Dimension::Gender),
        ScoreField::Positive(Pillar::Diversity),
        ScoreVariant::SignedSplit,
        1,
        SortOrder::Key,
    );

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "Female");
    assert_eq!(groups[0].count, 10);
    assert_eq!(groups[0].mean, 3.0);
    assert_eq!(groups[1].key, "Male");
    assert_eq!(groups[1].count, 10);
    assert_eq!(groups[1].mean, 2.0);

    let index = diversity_index(&data.records, Dimension::Gender);
    assert!((index - 0.5).abs() < 1e-12);
}

#[test]
fn test_partition_is_exact_and_disjoint() {
    let data = dataset(&common::gender_split_table());
    let groups = partition(&data.records, &GroupKey::Dimension(Dimension::Gender));

    let mut seen_ids = HashSet::new();
    let mut total = 0;
    for (_, members) in &groups {
        total += members.len();
        for member in members {
            // no record in two groups
            assert!(seen_ids.insert(member.id));
        }
    }
    // no record omitted
    assert_eq!(total, data.len());
}

#[test]
fn test_min_size_pruning_is_silent() {
    let mut rows: Vec<common::Row> = (0..6)
        .map(|i| common::Row {
            id: i + 1,
            gender: "Female",
            ..common::Row::default()
        })
        .collect();
    rows.push(common::Row {
        id: 7,
        gender: "Male",
        ..common::Row::default()
    });

    let data = dataset(&common::table(&rows));
    let groups = aggregate(
        &data.records,
        &GroupKey::Dimension(Dimension::Gender),
        ScoreField::Positive(Pillar::Diversity),
        ScoreVariant::SignedSplit,
        5,
        SortOrder::Key,
    );

    // the singleton male group drops without error
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "Female");
}

#[test]
fn test_group_stats_ordering_invariants() {
    let rows: Vec<common::Row> = ["1", "2", "2", "3", "5"]
        .into_iter()
        .enumerate()
        .map(|(i, answer)| common::Row {
            id: i as u32 + 1,
            d_answer: answer,
            ..common::Row::default()
        })
        .collect();

    let data = dataset(&common::table(&rows));
    let groups = aggregate(
        &data.records,
        &GroupKey::Dimension(Dimension::Gender),
        ScoreField::Positive(Pillar::Diversity),
        ScoreVariant::SignedSplit,
        1,
        SortOrder::Key,
    );

    let group = &groups[0];
    assert!(group.q1 <= group.median && group.median <= group.q3);
    assert!(group.std >= 0.0);
    assert!(group.lower_whisker >= group.min);
    assert!(group.upper_whisker <= group.max);
}

#[test]
fn test_intersection_grouping_uses_joined_labels() {
    let rows = vec![
        common::Row {
            id: 1,
            lgbtq: "Yes",
            ethnicity: "Asian",
            ..common::Row::default()
        },
        common::Row {
            id: 2,
            lgbtq: "Yes",
            ethnicity: "Asian",
            ..common::Row::default()
        },
        common::Row {
            id: 3,
            ..common::Row::default()
        },
    ];

    let data = dataset(&common::table(&rows));
    let groups = partition(&data.records, &GroupKey::Intersection);

    let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["Minority + LGBTQ+", "Majority Group"]);
    assert_eq!(groups[0].1.len(), 2);
}

#[test]
fn test_all_nan_survey_row_does_not_corrupt_group_mean() {
    let rows = vec![
        common::Row {
            id: 1,
            d_answer: "2",
            ..common::Row::default()
        },
        common::Row {
            id: 2,
            d_answer: "2",
            ..common::Row::default()
        },
        common::Row {
            id: 3,
            d_answer: "not-a-number",
            ..common::Row::default()
        },
    ];

    let data = dataset(&common::table(&rows));
    let groups = aggregate(
        &data.records,
        &GroupKey::Dimension(Dimension::Gender),
        ScoreField::Positive(Pillar::Diversity),
        ScoreVariant::SignedSplit,
        1,
        SortOrder::Key,
    );

    // the unparseable row's score collapses to the 0 sentinel and still
    // counts as a member; the mean stays finite
    assert_eq!(groups[0].count, 3);
    assert!((groups[0].mean - 4.0 / 3.0).abs() < 1e-12);
}
