// Export modules for library usage
pub mod aggregation;
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod filters;
pub mod io;
pub mod normalize;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    AgeGroup, Bivariate, BubblePoint, BubbleReport, CorrelationReport, Dataset, Dimension,
    EmployeeRecord, GroupReport, GroupSummary, HeatmapCell, HeatmapReport, Identity,
    IdentityFlags, Insights, IntersectionalCategory, Pillar, Regression, Report, ScatterPoint,
    ScoreCategory, ScoreField, ScoreThresholds, ScoreVariant, SyntheticNegative,
};

pub use crate::aggregation::{
    aggregate, diversity_index, division_bubbles, heatmap_demographics, heatmap_divisions,
    heatmap_managers, insights, intersectional_bubbles, partition, GroupKey, MetricKind,
    SortOrder,
};

pub use crate::analysis::{bivariate, linear_regression, pearson, scatter_points};

pub use crate::config::DeimapConfig;

pub use crate::errors::{Error, Result};

pub use crate::filters::{apply, Combination, FilterState};

pub use crate::io::loader::{load_rows, read_rows, RawRow};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::normalize::{normalize_row, normalize_rows};
