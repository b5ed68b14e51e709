use chrono::Utc;
use std::path::PathBuf;
use std::str::FromStr;

use super::{build_filter_state, emit, load_dataset, parse_range};
use crate::analysis;
use crate::config::DeimapConfig;
use crate::core::{CorrelationReport, Identity, Report, ScoreField, ScoreVariant};
use crate::errors::Result;
use crate::filters::{self, Combination};
use crate::io::output::OutputFormat;

pub struct CorrelateOptions {
    pub data: PathBuf,
    pub x: String,
    pub y: String,
    pub variant: Option<ScoreVariant>,
    pub filters: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub layers: Option<String>,
    pub groups: Option<Vec<String>>,
    pub combinations: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn run_correlate(options: CorrelateOptions) -> Result<()> {
    let config = DeimapConfig::load(options.config.as_deref())?;

    let x = ScoreField::from_str(&options.x)?;
    let y = ScoreField::from_str(&options.y)?;
    let variant = options.variant.unwrap_or(config.scoring.variant);

    let dataset = load_dataset(&options.data, &config)?;
    let mut filter = build_filter_state(
        &config,
        &options.filters,
        options.age_min,
        options.age_max,
        None,
    )?;
    if let Some(spec) = &options.layers {
        let (min, max) = parse_range(spec)?;
        filter = filter.with_layer_range(min, max);
    }
    if let Some(groups) = &options.groups {
        let identities = groups
            .iter()
            .map(|g| Identity::from_str(g))
            .collect::<Result<Vec<_>>>()?;
        filter = filter.with_active_groups(identities);
    }
    if !options.combinations.is_empty() {
        let combinations = options
            .combinations
            .iter()
            .map(|c| Combination::from_str(c))
            .collect::<Result<Vec<_>>>()?;
        filter = filter.with_combinations(combinations);
    }
    let filtered = filters::apply(&dataset, &filter);

    let stats = analysis::bivariate(&filtered, x, y, variant);
    let points = analysis::scatter_points(&filtered, x, y, variant);

    let report = Report::Correlation(CorrelationReport {
        generated: Utc::now(),
        source: options.data,
        x: x.to_string(),
        y: y.to_string(),
        variant,
        stats,
        points,
    });

    emit(&report, options.format, options.output.as_deref())
}
