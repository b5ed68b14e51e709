//! Shared fixtures: an in-memory CSV in the source-table column layout.

use deimap::io::loader::{survey_columns, REQUIRED_COLUMNS};

/// One row spec for the fixture table.
pub struct Row {
    pub id: u32,
    pub gender: &'static str,
    pub ethnicity: &'static str,
    pub division: &'static str,
    pub age: u32,
    pub lgbtq: &'static str,
    pub disability: &'static str,
    pub veteran: &'static str,
    /// Every diversity answer takes this value; equity and inclusion
    /// answers stay at "1".
    pub d_answer: &'static str,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            id: 1,
            gender: "Female",
            ethnicity: "White",
            division: "Engineering",
            age: 30,
            lgbtq: "No",
            disability: "No",
            veteran: "No",
            d_answer: "1",
        }
    }
}

pub fn header() -> String {
    let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(survey_columns());
    columns.join(",")
}

pub fn csv_row(row: &Row) -> String {
    let mut fields = vec![
        row.id.to_string(),
        format!("Name{}", row.id),
        format!("Surname{}", row.id),
        row.division.to_string(),
        "No".to_string(),
        "Chilean".to_string(),
        row.gender.to_string(),
        "Heterosexual".to_string(),
        row.lgbtq.to_string(),
        "No".to_string(),
        row.ethnicity.to_string(),
        row.disability.to_string(),
        row.veteran.to_string(),
        row.age.to_string(),
        String::new(),
        "she/her".to_string(),
    ];
    // five diversity answers, then five equity and five inclusion answers
    fields.extend(std::iter::repeat(row.d_answer.to_string()).take(5));
    fields.extend(std::iter::repeat("1".to_string()).take(10));
    fields.join(",")
}

pub fn table(rows: &[Row]) -> String {
    let mut lines = vec![header()];
    lines.extend(rows.iter().map(csv_row));
    lines.join("\n")
}

/// The twenty-row table from the aggregation acceptance example: ten male
/// records averaging a diversity-positive score of 2.0 and ten female
/// records averaging 3.0.
pub fn gender_split_table() -> String {
    let mut rows = Vec::new();
    for i in 0..10 {
        rows.push(Row {
            id: i + 1,
            gender: "Male",
            d_answer: "2",
            ..Row::default()
        });
        rows.push(Row {
            id: i + 11,
            gender: "Female",
            d_answer: "3",
            ..Row::default()
        });
    }
    table(&rows)
}
