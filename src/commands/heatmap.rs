use chrono::Utc;
use std::path::PathBuf;
use std::str::FromStr;

use super::{build_filter_state, emit, load_dataset};
use crate::aggregation::{self, MetricKind};
use crate::cli::HeatmapView;
use crate::config::DeimapConfig;
use crate::core::{Dimension, HeatmapReport, Pillar, Report, ScoreVariant};
use crate::errors::Result;
use crate::filters;
use crate::io::output::OutputFormat;

pub struct HeatmapOptions {
    pub data: PathBuf,
    pub view: HeatmapView,
    pub metric: MetricKind,
    pub pillar: String,
    pub dims: Option<Vec<String>>,
    pub top_managers: usize,
    pub variant: Option<ScoreVariant>,
    pub filters: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn run_heatmap(options: HeatmapOptions) -> Result<()> {
    let config = DeimapConfig::load(options.config.as_deref())?;

    let pillar = Pillar::from_str(&options.pillar)?;
    let variant = options.variant.unwrap_or(config.scoring.variant);

    let dataset = load_dataset(&options.data, &config)?;
    let filter = build_filter_state(
        &config,
        &options.filters,
        options.age_min,
        options.age_max,
        None,
    )?;
    let filtered = filters::apply(&dataset, &filter);

    let (view, metric, cells) = match options.view {
        HeatmapView::Demographics => {
            let dimensions = match &options.dims {
                Some(names) => names
                    .iter()
                    .map(|n| Dimension::from_str(n))
                    .collect::<Result<Vec<_>>>()?,
                None => Dimension::DEMOGRAPHIC.to_vec(),
            };
            let field = options.metric.field(pillar);
            (
                "demographics".to_string(),
                field.to_string(),
                aggregation::heatmap_demographics(&filtered, &dimensions, field, variant),
            )
        }
        HeatmapView::Divisions => (
            "divisions".to_string(),
            options.metric.to_string(),
            aggregation::heatmap_divisions(&filtered, options.metric, variant),
        ),
        HeatmapView::Managers => (
            "managers".to_string(),
            options.metric.to_string(),
            aggregation::heatmap_managers(&filtered, options.metric, variant, options.top_managers),
        ),
    };

    // For a negative metric high means worse; for positive and gap high
    // means better.
    let values: Vec<f64> = cells.iter().map(|c| c.value).collect();
    let (best, worst) = match options.metric {
        MetricKind::Negative => (min_of(&values), max_of(&values)),
        _ => (max_of(&values), min_of(&values)),
    };

    let report = Report::Heatmap(HeatmapReport {
        generated: Utc::now(),
        source: options.data,
        view,
        metric,
        variant,
        cells,
        best,
        worst,
    });

    emit(&report, options.format, options.output.as_deref())
}

fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
