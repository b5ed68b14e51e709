//! CLI command implementations.
//!
//! Every command is the same thin view configuration over one core
//! pipeline: load → normalize → filter → aggregate/correlate → emit.
//! The handlers own no statistics; they parse selections, thread a fresh
//! `FilterState` snapshot through the pure core, and hand the resulting
//! report to the output boundary.

pub mod analyze;
pub mod correlate;
pub mod heatmap;
pub mod init;
pub mod intersections;

pub use analyze::{run_analyze, AnalyzeOptions};
pub use correlate::{run_correlate, CorrelateOptions};
pub use heatmap::{run_heatmap, HeatmapOptions};
pub use init::init_config;
pub use intersections::{run_intersections, IntersectionsOptions};

use std::path::Path;
use std::str::FromStr;

use crate::config::DeimapConfig;
use crate::core::{Dataset, Dimension, Report};
use crate::errors::{Error, Result};
use crate::filters::FilterState;
use crate::io::output::OutputFormat;
use crate::{io, normalize};

/// Load the source table and normalize it into the immutable working set.
pub(crate) fn load_dataset(path: &Path, config: &DeimapConfig) -> Result<Dataset> {
    let rows = io::loader::load_rows(path)?;
    let dataset = normalize::normalize_rows(&rows, config.scoring.synthetic_negative);
    log::info!("normalized {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Build a filter snapshot from config defaults plus CLI overrides.
/// Filter specs look like `Gender=Male,Female`.
pub(crate) fn build_filter_state(
    config: &DeimapConfig,
    filter_specs: &[String],
    age_min: Option<u32>,
    age_max: Option<u32>,
    min_group_size: Option<usize>,
) -> Result<FilterState> {
    let mut state = FilterState::new(
        age_min.unwrap_or(config.filters.age_min),
        age_max.unwrap_or(config.filters.age_max),
        min_group_size.unwrap_or(config.filters.min_group_size),
    );

    for spec in filter_specs {
        let (dimension, values) = spec
            .split_once('=')
            .ok_or_else(|| Error::Filter(format!("expected DIMENSION=VALUE[,VALUE]: {spec}")))?;
        let dimension = Dimension::from_str(dimension.trim())?;
        let values = values
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        state = state.accept(dimension, values);
    }

    Ok(state)
}

/// Parse an inclusive `MIN-MAX` range such as `1-5`.
pub(crate) fn parse_range(spec: &str) -> Result<(u8, u8)> {
    let (min, max) = spec
        .split_once('-')
        .ok_or_else(|| Error::Filter(format!("expected MIN-MAX: {spec}")))?;
    let min: u8 = min
        .trim()
        .parse()
        .map_err(|_| Error::Filter(format!("bad range bound: {spec}")))?;
    let max: u8 = max
        .trim()
        .parse()
        .map_err(|_| Error::Filter(format!("bad range bound: {spec}")))?;
    if min > max {
        return Err(Error::Filter(format!("inverted range: {spec}")));
    }
    Ok((min, max))
}

/// Hand the finished report to the output boundary: a file (always JSON)
/// or the selected stdout writer.
pub(crate) fn emit(report: &Report, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(report)?;
            io::write_file(path, &json)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            io::output::create_writer(format).write_report(report)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_state_parses_specs() {
        let config = DeimapConfig::default();
        let state = build_filter_state(
            &config,
            &["Gender=Male,Female".to_string(), "Division=Sales".to_string()],
            Some(30),
            None,
            None,
        )
        .unwrap();

        assert_eq!(state.age_range, (30, 65));
        assert_eq!(state.min_group_size, 5);
        assert_eq!(state.accepted.len(), 2);
        assert!(state.accepted[&Dimension::Gender].contains("Female"));
    }

    #[test]
    fn test_build_filter_state_rejects_unknown_dimension() {
        let config = DeimapConfig::default();
        let err = build_filter_state(&config, &["Starsign=Leo".to_string()], None, None, None)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownDimension(_)));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("1-5").unwrap(), (1, 5));
        assert!(parse_range("5-1").is_err());
        assert!(parse_range("all").is_err());
    }
}
