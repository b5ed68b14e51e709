use chrono::Utc;
use std::path::PathBuf;
use std::str::FromStr;

use super::{build_filter_state, emit, load_dataset};
use crate::aggregation::{self, GroupKey, SortOrder};
use crate::config::DeimapConfig;
use crate::core::{GroupReport, Report, ScoreField, ScoreVariant};
use crate::errors::Result;
use crate::filters;
use crate::io::output::OutputFormat;

pub struct AnalyzeOptions {
    pub data: PathBuf,
    pub group_by: String,
    pub score: String,
    pub variant: Option<ScoreVariant>,
    pub filters: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub min_group_size: Option<usize>,
    pub sort: SortOrder,
    pub top: Option<usize>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn run_analyze(options: AnalyzeOptions) -> Result<()> {
    let config = DeimapConfig::load(options.config.as_deref())?;

    let key = GroupKey::from_str(&options.group_by)?;
    let field = ScoreField::from_str(&options.score)?;
    let variant = options.variant.unwrap_or(config.scoring.variant);

    let dataset = load_dataset(&options.data, &config)?;
    let filter = build_filter_state(
        &config,
        &options.filters,
        options.age_min,
        options.age_max,
        options.min_group_size,
    )?;
    let filtered = filters::apply(&dataset, &filter);

    let mut groups = aggregation::aggregate(
        &filtered,
        &key,
        field,
        variant,
        filter.min_group_size,
        options.sort,
    );
    if let Some(top) = options.top {
        groups.truncate(top);
    }

    let insights = aggregation::insights(&groups);
    let diversity_index = match key {
        GroupKey::Dimension(dimension) => {
            Some(aggregation::diversity_index(&filtered, dimension))
        }
        GroupKey::Intersection => None,
    };

    let report = Report::Groups(GroupReport {
        generated: Utc::now(),
        source: options.data,
        total_records: dataset.len(),
        filtered_records: filtered.len(),
        group_by: key.to_string(),
        score: field.to_string(),
        variant,
        groups,
        insights,
        diversity_index,
    });

    emit(&report, options.format, options.output.as_deref())
}
