//! Record normalization: raw string-keyed rows into typed, immutable
//! [`EmployeeRecord`]s with every derived field computed up front.
//!
//! There is no rejection path. A row missing a categorical field keeps a
//! placeholder; a numeric field that fails to parse becomes NaN and is
//! excluded from downstream means rather than silently counted as zero.

use crate::core::{
    AgeGroup, Dataset, EmployeeRecord, IdentityFlags, Pillar, PrecomputedScores, SurveyResponses,
    SyntheticNegative,
};
use crate::io::loader::RawRow;
use crate::scoring;

const NOT_SPECIFIED: &str = "Not specified";
const NO: &str = "No";

/// Normalize the whole row sequence into the immutable working set.
pub fn normalize_rows(rows: &[RawRow], synthetic: SyntheticNegative) -> Dataset {
    Dataset::from_records(rows.iter().map(|row| normalize_row(row, synthetic)))
}

/// Normalize one row. Pure; total over any row shape.
pub fn normalize_row(row: &RawRow, synthetic: SyntheticNegative) -> EmployeeRecord {
    let id = row
        .get("Id")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);
    let age = row
        .get("Age")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);

    let ethnicity = string_field(row, "Ethnicity", NOT_SPECIFIED);
    let lgbtq = string_field(row, "LGBTQ", NO);
    let indigenous = string_field(row, "Indigenous", NO);
    let disability = string_field(row, "Disability", NO);
    let veteran = string_field(row, "Veteran", NO);
    let manager = string_field(row, "Manager", NO);

    // An explicit Minority column wins; otherwise the flag derives from
    // ethnicity, with the string form kept consistent for filtering.
    let minority_flag = match row.get("Minority").filter(|v| !v.trim().is_empty()) {
        Some(value) => yes_like(value),
        None => ethnicity != "White",
    };
    let minority = match row.get("Minority").filter(|v| !v.trim().is_empty()) {
        Some(value) => value.to_string(),
        None => if minority_flag { "Yes" } else { "No" }.to_string(),
    };

    let flags = IdentityFlags {
        lgbtq: yes_like(&lgbtq),
        minority: minority_flag,
        disability: yes_like(&disability),
        indigenous: yes_like(&indigenous),
        veteran: yes_like(&veteran),
    };

    let responses = survey_responses(row);
    let precomputed = precomputed_scores(row);
    let scores = scoring::derive_scores(&responses, &precomputed, synthetic);

    EmployeeRecord {
        id,
        name: string_field(row, "Name", ""),
        surname: string_field(row, "Surname", ""),
        division: string_field(row, "Division", NOT_SPECIFIED),
        nationality: string_field(row, "Nationality", NOT_SPECIFIED),
        is_manager: yes_like(&manager),
        manager,
        pronouns: string_field(row, "Pronouns", NOT_SPECIFIED),
        gender: string_field(row, "Gender", NOT_SPECIFIED),
        sexual_orientation: string_field(row, "Sexual_Orientation", NOT_SPECIFIED),
        ethnicity,
        lgbtq,
        indigenous,
        disability,
        veteran,
        minority,
        age,
        age_group: AgeGroup::from_age(age),
        layers: flags.count(),
        category: scoring::intersectional_category(&flags),
        intersection: scoring::intersection_label(&flags),
        flags,
        responses,
        precomputed,
        scores,
    }
}

fn string_field(row: &RawRow, column: &str, placeholder: &str) -> String {
    match row.get(column) {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => placeholder.to_string(),
    }
}

fn yes_like(value: &str) -> bool {
    let v = value.trim();
    v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true")
}

/// NaN for unparseable answers; downstream means skip NaN.
fn numeric_field(row: &RawRow, column: &str) -> f64 {
    row.get(column)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(f64::NAN)
}

fn survey_responses(row: &RawRow) -> SurveyResponses {
    let mut responses = SurveyResponses::default();
    for pillar in Pillar::ALL {
        for q in 1..=5 {
            let column = format!("Aug_{}_Q{}", pillar.prefix(), q);
            responses.values[pillar.index()][q - 1] = numeric_field(row, &column);
        }
    }
    responses
}

fn precomputed_scores(row: &RawRow) -> PrecomputedScores {
    let mut precomputed = PrecomputedScores::default();
    for pillar in Pillar::ALL {
        let idx = pillar.index();
        precomputed.positive[idx] = optional_field(row, &format!("{}_Positive", pillar.prefix()));
        precomputed.negative[idx] = optional_field(row, &format!("{}_Negative", pillar.prefix()));
    }
    precomputed
}

/// `None` for an absent or unparseable optional column, never a silent 0.
fn optional_field(row: &RawRow, column: &str) -> Option<f64> {
    row.get(column).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IntersectionalCategory;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        let mut row = RawRow::new();
        for (key, value) in pairs {
            row.insert(key.to_string(), value.to_string());
        }
        row
    }

    #[test]
    fn test_age_buckets() {
        assert_eq!(AgeGroup::from_age(24).label(), "24-31");
        assert_eq!(AgeGroup::from_age(31).label(), "24-31");
        assert_eq!(AgeGroup::from_age(32).label(), "31-37");
        assert_eq!(AgeGroup::from_age(37).label(), "31-37");
        assert_eq!(AgeGroup::from_age(38).label(), "37-44");
        assert_eq!(AgeGroup::from_age(44).label(), "37-44");
        assert_eq!(AgeGroup::from_age(45).label(), "44-65");
        assert_eq!(AgeGroup::from_age(65).label(), "44-65");
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let record = normalize_row(&row(&[("Id", "7"), ("Age", "30")]), SyntheticNegative::Zero);

        assert_eq!(record.id, 7);
        assert_eq!(record.gender, "Not specified");
        assert_eq!(record.lgbtq, "No");
        assert!(!record.flags.lgbtq);
    }

    #[test]
    fn test_unparseable_survey_answer_becomes_nan() {
        let record = normalize_row(
            &row(&[("Aug_D_Q1", "not a number"), ("Aug_D_Q2", "2")]),
            SyntheticNegative::Zero,
        );

        assert!(record.responses.values[0][0].is_nan());
        assert_eq!(record.responses.values[0][1], 2.0);
        // the all-mean positive skips the NaN instead of treating it as 0
        assert_eq!(record.scores.all_mean[0].positive, 2.0);
    }

    #[test]
    fn test_minority_column_wins_over_ethnicity() {
        let record = normalize_row(
            &row(&[("Ethnicity", "White"), ("Minority", "Yes")]),
            SyntheticNegative::Zero,
        );
        assert!(record.flags.minority);
    }

    #[test]
    fn test_minority_derived_from_ethnicity() {
        let record = normalize_row(&row(&[("Ethnicity", "Asian")]), SyntheticNegative::Zero);
        assert!(record.flags.minority);
        assert_eq!(record.minority, "Yes");

        let white = normalize_row(&row(&[("Ethnicity", "White")]), SyntheticNegative::Zero);
        assert!(!white.flags.minority);
    }

    #[test]
    fn test_intersectional_fields_cached() {
        let record = normalize_row(
            &row(&[("LGBTQ", "Yes"), ("Ethnicity", "Hispanic")]),
            SyntheticNegative::Zero,
        );

        assert_eq!(record.layers, 2);
        assert_eq!(record.category, IntersectionalCategory::LgbtqMinority);
        assert_eq!(record.intersection, "Minority + LGBTQ+");
    }

    #[test]
    fn test_manager_flag_from_true() {
        let record = normalize_row(&row(&[("Manager", "True")]), SyntheticNegative::Zero);
        assert!(record.is_manager);
        assert_eq!(record.manager, "True");
    }
}
