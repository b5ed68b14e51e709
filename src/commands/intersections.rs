use chrono::Utc;
use std::path::PathBuf;
use std::str::FromStr;

use super::{build_filter_state, emit, load_dataset};
use crate::aggregation;
use crate::cli::BubbleView;
use crate::config::DeimapConfig;
use crate::core::{BubbleReport, Report, ScoreCategory, ScoreField, ScoreVariant};
use crate::errors::Result;
use crate::filters;
use crate::io::output::OutputFormat;

pub struct IntersectionsOptions {
    pub data: PathBuf,
    pub view: BubbleView,
    pub score: String,
    pub variant: Option<ScoreVariant>,
    pub filters: Vec<String>,
    pub min_group_size: Option<usize>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn run_intersections(options: IntersectionsOptions) -> Result<()> {
    let config = DeimapConfig::load(options.config.as_deref())?;

    let field = ScoreField::from_str(&options.score)?;
    let variant = options.variant.unwrap_or(config.scoring.variant);

    let dataset = load_dataset(&options.data, &config)?;
    let filter = build_filter_state(
        &config,
        &options.filters,
        None,
        None,
        options.min_group_size,
    )?;
    let filtered = filters::apply(&dataset, &filter);

    let (view, points) = match options.view {
        BubbleView::Intersectional => (
            "intersectional".to_string(),
            aggregation::intersectional_bubbles(
                &filtered,
                field,
                variant,
                filter.min_group_size,
                &config.thresholds,
            ),
        ),
        BubbleView::Divisions => (
            "division-performance".to_string(),
            aggregation::division_bubbles(
                &filtered,
                field,
                variant,
                filter.min_group_size,
                &config.thresholds,
            ),
        ),
    };

    let critical_groups = points
        .iter()
        .filter(|p| matches!(p.category, ScoreCategory::Critical | ScoreCategory::Low))
        .count();
    let best = extreme_key(&points, true);
    let worst = extreme_key(&points, false);

    let report = Report::Bubbles(BubbleReport {
        generated: Utc::now(),
        source: options.data,
        view,
        score: field.to_string(),
        variant,
        total_groups: points.len(),
        critical_groups,
        best,
        worst,
        points,
    });

    emit(&report, options.format, options.output.as_deref())
}

fn extreme_key(points: &[crate::core::BubblePoint], best: bool) -> Option<String> {
    let mut chosen = points.first()?;
    for point in points {
        let better = if best {
            point.y > chosen.y
        } else {
            point.y < chosen.y
        };
        if better {
            chosen = point;
        }
    }
    Some(chosen.key.clone())
}
