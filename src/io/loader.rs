//! Delimited-text loading boundary.
//!
//! The loader's whole contract with the core: produce an ordered sequence
//! of string-keyed rows carrying the fixed column names, or fail once with
//! a load error. Malformed row *values* pass through uncorrected — the
//! normalizer owns coercion and placeholder policy.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::core::Pillar;
use crate::errors::{Error, Result};

/// Identity and demographic columns every source table must carry.
pub const REQUIRED_COLUMNS: [&str; 16] = [
    "Id",
    "Name",
    "Surname",
    "Division",
    "Manager",
    "Nationality",
    "Gender",
    "Sexual_Orientation",
    "LGBTQ",
    "Indigenous",
    "Ethnicity",
    "Disability",
    "Veteran",
    "Age",
    "Minority",
    "Pronouns",
];

/// One raw row, keyed by header name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRow {
    values: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Names of the fifteen survey answer columns, `Aug_{D,E,I}_Q{1..5}`.
pub fn survey_columns() -> Vec<String> {
    Pillar::ALL
        .iter()
        .flat_map(|pillar| (1..=5).map(move |q| format!("Aug_{}_Q{}", pillar.prefix(), q)))
        .collect()
}

/// Read rows from any reader. Header validation covers the identity and
/// survey columns; the precomputed score columns are optional.
pub fn read_rows<R: Read>(reader: R, origin: &Path) -> Result<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let header_names: Vec<&str> = headers.iter().collect();

    for column in REQUIRED_COLUMNS {
        if !header_names.contains(&column) {
            return Err(Error::MissingColumn {
                column: column.to_string(),
                path: origin.to_path_buf(),
            });
        }
    }
    for column in survey_columns() {
        if !header_names.contains(&column.as_str()) {
            return Err(Error::MissingColumn {
                column,
                path: origin.to_path_buf(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let mut row = RawRow::new();
        for (i, field) in record.iter().enumerate() {
            if let Some(header) = headers.get(i) {
                row.insert(header.to_string(), field.to_string());
            }
        }
        rows.push(row);
    }

    log::debug!("loaded {} rows from {}", rows.len(), origin.display());
    Ok(rows)
}

/// Load the source table from disk.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).map_err(|e| Error::load_io(path, e))?;
    read_rows(file, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn header_line() -> String {
        let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(survey_columns());
        columns.join(",")
    }

    fn data_line() -> String {
        let mut fields = vec![
            "1",
            "Ada",
            "Alvarez",
            "Engineering",
            "No",
            "Chilean",
            "Female",
            "Heterosexual",
            "No",
            "No",
            "White",
            "No",
            "No",
            "34",
            "No",
            "she/her",
        ]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
        fields.extend(std::iter::repeat("1".to_string()).take(15));
        fields.join(",")
    }

    #[test]
    fn test_read_rows_round_trip() {
        let csv = format!("{}\n{}", header_line(), data_line());
        let rows = read_rows(csv.as_bytes(), &PathBuf::from("test.csv")).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Name"), Some("Ada"));
        assert_eq!(rows[0].get("Aug_I_Q5"), Some("1"));
    }

    #[test]
    fn test_missing_column_is_load_error() {
        let csv = "Id,Name\n1,Ada";
        let err = read_rows(csv.as_bytes(), &PathBuf::from("test.csv")).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
    }

    #[test]
    fn test_short_rows_pass_through() {
        // flexible mode: a truncated row still loads; missing cells are
        // simply absent and the normalizer substitutes placeholders
        let csv = format!("{}\n1,Ada", header_line());
        let rows = read_rows(csv.as_bytes(), &PathBuf::from("test.csv")).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Surname"), None);
    }
}
