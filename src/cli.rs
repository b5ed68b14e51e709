use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScoreVariantArg {
    /// positive = mean of answers > 0, negative = |mean of answers < 0|
    SignedSplit,
    /// positive = mean of all answers or the precomputed column
    AllMean,
}

impl From<ScoreVariantArg> for crate::core::ScoreVariant {
    fn from(v: ScoreVariantArg) -> Self {
        match v {
            ScoreVariantArg::SignedSplit => crate::core::ScoreVariant::SignedSplit,
            ScoreVariantArg::AllMean => crate::core::ScoreVariant::AllMean,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Alphabetical by group key
    Key,
    /// Ascending mean score
    Asc,
    /// Descending mean score
    Desc,
}

impl From<SortArg> for crate::aggregation::SortOrder {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Key => crate::aggregation::SortOrder::Key,
            SortArg::Asc => crate::aggregation::SortOrder::MeanAscending,
            SortArg::Desc => crate::aggregation::SortOrder::MeanDescending,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    Positive,
    Negative,
    Gap,
}

impl From<MetricArg> for crate::aggregation::MetricKind {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Positive => crate::aggregation::MetricKind::Positive,
            MetricArg::Negative => crate::aggregation::MetricKind::Negative,
            MetricArg::Gap => crate::aggregation::MetricKind::Gap,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HeatmapView {
    /// Demographic dimension rows, category columns
    Demographics,
    /// Pillar rows, division columns
    Divisions,
    /// Pillar rows, manager columns
    Managers,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BubbleView {
    /// Identity-combination groups vs marginalization layers
    Intersectional,
    /// Divisions vs gender-diversity index
    Divisions,
}

#[derive(Parser, Debug)]
#[command(name = "deimap")]
#[command(about = "Workforce DEI survey aggregation and analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Group records by a dimension and compute score statistics
    Analyze {
        /// Path to the source table
        data: PathBuf,

        /// Dimension to group by, or "intersection"
        #[arg(long = "group-by", default_value = "gender")]
        group_by: String,

        /// Score field: overall, composite, age, layers, or
        /// <pillar>-<positive|negative|gap|combined>
        #[arg(long, default_value = "overall")]
        score: String,

        /// Score variant (defaults to the configured one)
        #[arg(long, value_enum)]
        variant: Option<ScoreVariantArg>,

        /// Dimension filter, e.g. --filter Gender=Male,Female (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Lower age bound (defaults to the configured slider minimum)
        #[arg(long = "age-min")]
        age_min: Option<u32>,

        /// Upper age bound
        #[arg(long = "age-max")]
        age_max: Option<u32>,

        /// Drop groups smaller than this
        #[arg(long = "min-group-size")]
        min_group_size: Option<usize>,

        /// Group ordering
        #[arg(long, value_enum, default_value = "desc")]
        sort: SortArg,

        /// Show only the first N groups after sorting
        #[arg(long)]
        top: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout, always JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Matrix view of mean scores across groups and categories
    Heatmap {
        /// Path to the source table
        data: PathBuf,

        #[arg(long, value_enum, default_value = "demographics")]
        view: HeatmapView,

        /// Which side of the score feeds the cells
        #[arg(long, value_enum, default_value = "negative")]
        metric: MetricArg,

        /// Pillar for the demographics view
        #[arg(long, default_value = "equity")]
        pillar: String,

        /// Dimensions for the demographics rows (defaults to all seven)
        #[arg(long = "dims", value_delimiter = ',')]
        dims: Option<Vec<String>>,

        /// Managers shown in the managers view
        #[arg(long = "top-managers", default_value = "15")]
        top_managers: usize,

        #[arg(long, value_enum)]
        variant: Option<ScoreVariantArg>,

        #[arg(long = "filter")]
        filters: Vec<String>,

        #[arg(long = "age-min")]
        age_min: Option<u32>,

        #[arg(long = "age-max")]
        age_max: Option<u32>,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Pearson correlation and OLS trend over two score fields
    Correlate {
        /// Path to the source table
        data: PathBuf,

        /// X-axis score field
        #[arg(short = 'x', long, default_value = "d-positive")]
        x: String,

        /// Y-axis score field
        #[arg(short = 'y', long, default_value = "e-positive")]
        y: String,

        #[arg(long, value_enum)]
        variant: Option<ScoreVariantArg>,

        #[arg(long = "filter")]
        filters: Vec<String>,

        #[arg(long = "age-min")]
        age_min: Option<u32>,

        #[arg(long = "age-max")]
        age_max: Option<u32>,

        /// Marginalization layer range, e.g. --layers 1-5
        #[arg(long)]
        layers: Option<String>,

        /// Restrict to records carrying one of these identities (or none
        /// at all), e.g. --groups lgbtq,veteran
        #[arg(long = "groups", value_delimiter = ',')]
        groups: Option<Vec<String>>,

        /// Require at least one combination: multiple, triple,
        /// lgbtq-minority, disability-veteran
        #[arg(long = "combinations", value_delimiter = ',')]
        combinations: Vec<String>,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Bubble view of intersectional groups or division performance
    Intersections {
        /// Path to the source table
        data: PathBuf,

        #[arg(long, value_enum, default_value = "intersectional")]
        view: BubbleView,

        /// Score field (overall or a pillar combined/gap score)
        #[arg(long, default_value = "overall")]
        score: String,

        #[arg(long, value_enum)]
        variant: Option<ScoreVariantArg>,

        #[arg(long = "filter")]
        filters: Vec<String>,

        #[arg(long = "min-group-size")]
        min_group_size: Option<usize>,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
