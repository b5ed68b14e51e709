pub mod metrics;

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::Error;

/// The three survey pillars, each scored from five questions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Pillar {
    Diversity,
    Equity,
    Inclusion,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::Diversity, Pillar::Equity, Pillar::Inclusion];

    /// Column prefix used by the source table (`Aug_D_Q1`, `D_Positive`, ...)
    pub fn prefix(&self) -> &'static str {
        match self {
            Pillar::Diversity => "D",
            Pillar::Equity => "E",
            Pillar::Inclusion => "I",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Pillar::Diversity => 0,
            Pillar::Equity => 1,
            Pillar::Inclusion => 2,
        }
    }
}

impl FromStr for Pillar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "diversity" => Ok(Pillar::Diversity),
            "e" | "equity" => Ok(Pillar::Equity),
            "i" | "inclusion" => Ok(Pillar::Inclusion),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Pillar::Diversity => "Diversity",
            Pillar::Equity => "Equity",
            Pillar::Inclusion => "Inclusion",
        };
        write!(f, "{s}")
    }
}

/// Fixed age buckets used by every view.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeGroup {
    #[serde(rename = "24-31")]
    From24,
    #[serde(rename = "31-37")]
    From31,
    #[serde(rename = "37-44")]
    From37,
    #[serde(rename = "44-65")]
    From44,
}

impl AgeGroup {
    /// Total over the whole age domain: every age lands in exactly one bucket.
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=31 => AgeGroup::From24,
            32..=37 => AgeGroup::From31,
            38..=44 => AgeGroup::From37,
            _ => AgeGroup::From44,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::From24 => "24-31",
            AgeGroup::From31 => "31-37",
            AgeGroup::From37 => "37-44",
            AgeGroup::From44 => "44-65",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One marginalized-identity attribute.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identity {
    Lgbtq,
    Minority,
    Disability,
    Indigenous,
    Veteran,
}

impl Identity {
    /// Fixed priority order used for single-flag categories and labels.
    pub const ALL: [Identity; 5] = [
        Identity::Lgbtq,
        Identity::Minority,
        Identity::Disability,
        Identity::Indigenous,
        Identity::Veteran,
    ];
}

impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lgbtq" | "lgbtq+" => Ok(Identity::Lgbtq),
            "minority" => Ok(Identity::Minority),
            "disability" => Ok(Identity::Disability),
            "indigenous" => Ok(Identity::Indigenous),
            "veteran" => Ok(Identity::Veteran),
            other => Err(Error::Filter(format!("unknown identity group: {other}"))),
        }
    }
}

/// The five boolean identity flags of a record.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityFlags {
    pub lgbtq: bool,
    pub minority: bool,
    pub disability: bool,
    pub indigenous: bool,
    pub veteran: bool,
}

impl IdentityFlags {
    pub fn has(&self, identity: Identity) -> bool {
        match identity {
            Identity::Lgbtq => self.lgbtq,
            Identity::Minority => self.minority,
            Identity::Disability => self.disability,
            Identity::Indigenous => self.indigenous,
            Identity::Veteran => self.veteran,
        }
    }

    /// Marginalization layer count: number of true flags.
    pub fn count(&self) -> u8 {
        Identity::ALL.iter().filter(|i| self.has(**i)).count() as u8
    }
}

/// Coarse intersectional bucket for coloring scatter views.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IntersectionalCategory {
    None,
    Lgbtq,
    Minority,
    Disability,
    Indigenous,
    Veteran,
    LgbtqMinority,
    DisabilityVeteran,
    Multiple,
}

impl std::fmt::Display for IntersectionalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(IntersectionalCategory, &str)] = &[
            (IntersectionalCategory::None, "None"),
            (IntersectionalCategory::Lgbtq, "LGBTQ"),
            (IntersectionalCategory::Minority, "Minority"),
            (IntersectionalCategory::Disability, "Disability"),
            (IntersectionalCategory::Indigenous, "Indigenous"),
            (IntersectionalCategory::Veteran, "Veteran"),
            (IntersectionalCategory::LgbtqMinority, "LGBTQ+Minority"),
            (
                IntersectionalCategory::DisabilityVeteran,
                "Disability+Veteran",
            ),
            (IntersectionalCategory::Multiple, "Multiple"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Which positive/negative definition a view runs under.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreVariant {
    /// positive = mean of answers > 0, negative = |mean of answers < 0|
    #[default]
    SignedSplit,
    /// positive = mean of all answers (or the precomputed column),
    /// negative = precomputed column or the configured synthetic value
    AllMean,
}

impl std::fmt::Display for ScoreVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScoreVariant::SignedSplit => "signed-split",
            ScoreVariant::AllMean => "all-mean",
        };
        write!(f, "{s}")
    }
}

/// Deterministic stand-in for a missing negative-score column under
/// [`ScoreVariant::AllMean`]. The original system synthesized this with a
/// random offset; here the mode is explicit configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SyntheticNegative {
    #[default]
    Zero,
    /// negative := positive, so the gap score collapses to zero
    MirrorPositive,
}

/// Positive/negative pair for one pillar under one variant.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PillarScores {
    pub positive: f64,
    pub negative: f64,
}

impl PillarScores {
    pub fn gap(&self) -> f64 {
        self.positive - self.negative
    }

    /// Combined score on the -1..1-ish scale used by the bubble views.
    pub fn combined(&self) -> f64 {
        (self.positive - self.negative) / 5.0
    }
}

/// Per-record composite scores, computed once at normalization time.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DerivedScores {
    pub signed_split: [PillarScores; 3],
    pub all_mean: [PillarScores; 3],
}

impl DerivedScores {
    pub fn for_variant(&self, variant: ScoreVariant) -> &[PillarScores; 3] {
        match variant {
            ScoreVariant::SignedSplit => &self.signed_split,
            ScoreVariant::AllMean => &self.all_mean,
        }
    }
}

/// Raw survey answers, `[pillar][question]`, NaN where unparseable.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SurveyResponses {
    pub values: [[f64; 5]; 3],
}

impl SurveyResponses {
    pub fn pillar(&self, pillar: Pillar) -> &[f64; 5] {
        &self.values[pillar.index()]
    }
}

/// Optional precomputed `{D,E,I}_{Positive,Negative}` columns.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PrecomputedScores {
    pub positive: [Option<f64>; 3],
    pub negative: [Option<f64>; 3],
}

/// Scalar field of a record that aggregation and bivariate views select.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoreField {
    Age,
    MarginalizationCount,
    Positive(Pillar),
    Negative(Pillar),
    Gap(Pillar),
    Combined(Pillar),
    /// Mean of the three pillar positives
    CompositePositive,
    /// Mean of the three pillar combined scores
    Overall,
}

impl FromStr for ScoreField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "age" => return Ok(ScoreField::Age),
            "layers" | "marginalization" | "marginalization-count" => {
                return Ok(ScoreField::MarginalizationCount)
            }
            "overall" | "dei" => return Ok(ScoreField::Overall),
            "composite" | "composite-positive" | "dei-positive" => {
                return Ok(ScoreField::CompositePositive)
            }
            _ => {}
        }

        let (pillar_token, kind) = normalized
            .rsplit_once('-')
            .ok_or_else(|| Error::UnknownField(s.to_string()))?;
        let pillar = match pillar_token {
            "d" | "diversity" => Pillar::Diversity,
            "e" | "equity" => Pillar::Equity,
            "i" | "inclusion" => Pillar::Inclusion,
            _ => return Err(Error::UnknownField(s.to_string())),
        };
        match kind {
            "positive" => Ok(ScoreField::Positive(pillar)),
            "negative" => Ok(ScoreField::Negative(pillar)),
            "gap" => Ok(ScoreField::Gap(pillar)),
            "combined" => Ok(ScoreField::Combined(pillar)),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScoreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreField::Age => write!(f, "Age"),
            ScoreField::MarginalizationCount => write!(f, "Marginalization Count"),
            ScoreField::Positive(p) => write!(f, "{p} Positive"),
            ScoreField::Negative(p) => write!(f, "{p} Negative"),
            ScoreField::Gap(p) => write!(f, "{p} Gap"),
            ScoreField::Combined(p) => write!(f, "{p} Combined"),
            ScoreField::CompositePositive => write!(f, "Composite Positive"),
            ScoreField::Overall => write!(f, "Overall DEI"),
        }
    }
}

/// Closed enumeration of the categorical dimensions a view may group or
/// filter by. Unknown names are rejected at the boundary instead of
/// resolving to nothing.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Dimension {
    Gender,
    AgeGroup,
    Ethnicity,
    SexualOrientation,
    Lgbtq,
    Veteran,
    Disability,
    Indigenous,
    Minority,
    Division,
    Nationality,
    Manager,
}

impl Dimension {
    /// The demographic dimensions shown as heatmap rows.
    pub const DEMOGRAPHIC: [Dimension; 7] = [
        Dimension::Gender,
        Dimension::Ethnicity,
        Dimension::Lgbtq,
        Dimension::Disability,
        Dimension::Veteran,
        Dimension::Indigenous,
        Dimension::Minority,
    ];

    /// The record's categorical value for this dimension.
    pub fn value_of<'a>(&self, record: &'a EmployeeRecord) -> &'a str {
        match self {
            Dimension::Gender => &record.gender,
            Dimension::AgeGroup => record.age_group.label(),
            Dimension::Ethnicity => &record.ethnicity,
            Dimension::SexualOrientation => &record.sexual_orientation,
            Dimension::Lgbtq => &record.lgbtq,
            Dimension::Veteran => &record.veteran,
            Dimension::Disability => &record.disability,
            Dimension::Indigenous => &record.indigenous,
            Dimension::Minority => &record.minority,
            Dimension::Division => &record.division,
            Dimension::Nationality => &record.nationality,
            Dimension::Manager => &record.manager,
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "gender" => Ok(Dimension::Gender),
            "agegroup" => Ok(Dimension::AgeGroup),
            "ethnicity" => Ok(Dimension::Ethnicity),
            "sexualorientation" => Ok(Dimension::SexualOrientation),
            "lgbtq" => Ok(Dimension::Lgbtq),
            "veteran" => Ok(Dimension::Veteran),
            "disability" => Ok(Dimension::Disability),
            "indigenous" => Ok(Dimension::Indigenous),
            "minority" => Ok(Dimension::Minority),
            "division" | "department" => Ok(Dimension::Division),
            "nationality" => Ok(Dimension::Nationality),
            "manager" => Ok(Dimension::Manager),
            _ => Err(Error::UnknownDimension(s.to_string())),
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Dimension, &str)] = &[
            (Dimension::Gender, "Gender"),
            (Dimension::AgeGroup, "Age_Group"),
            (Dimension::Ethnicity, "Ethnicity"),
            (Dimension::SexualOrientation, "Sexual_Orientation"),
            (Dimension::Lgbtq, "LGBTQ"),
            (Dimension::Veteran, "Veteran"),
            (Dimension::Disability, "Disability"),
            (Dimension::Indigenous, "Indigenous"),
            (Dimension::Minority, "Minority"),
            (Dimension::Division, "Division"),
            (Dimension::Nationality, "Nationality"),
            (Dimension::Manager, "Manager"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(d, _)| d == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Severity cut points for classifying a mean score.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreThresholds {
    pub critical: f64,
    pub low: f64,
    pub moderate: f64,
    pub good: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            critical: -1.0,
            low: -0.5,
            moderate: 0.0,
            good: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    Critical,
    Low,
    Moderate,
    Good,
    Excellent,
}

impl ScoreCategory {
    pub fn classify(score: f64, thresholds: &ScoreThresholds) -> Self {
        if score < thresholds.critical {
            ScoreCategory::Critical
        } else if score < thresholds.low {
            ScoreCategory::Low
        } else if score < thresholds.moderate {
            ScoreCategory::Moderate
        } else if score < thresholds.good {
            ScoreCategory::Good
        } else {
            ScoreCategory::Excellent
        }
    }
}

impl std::fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScoreCategory::Critical => "critical",
            ScoreCategory::Low => "low",
            ScoreCategory::Moderate => "moderate",
            ScoreCategory::Good => "good",
            ScoreCategory::Excellent => "excellent",
        };
        write!(f, "{s}")
    }
}

/// One normalized employee row. Immutable after creation; every derived
/// field is computed once by the normalizer and cached here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmployeeRecord {
    pub id: u32,
    pub name: String,
    pub surname: String,
    pub division: String,
    pub nationality: String,
    /// Raw manager column: a flag-like value or a manager name.
    pub manager: String,
    pub is_manager: bool,
    pub pronouns: String,
    pub gender: String,
    pub ethnicity: String,
    pub sexual_orientation: String,
    pub lgbtq: String,
    pub indigenous: String,
    pub disability: String,
    pub veteran: String,
    pub minority: String,
    pub age: u32,
    pub age_group: AgeGroup,
    pub flags: IdentityFlags,
    pub layers: u8,
    pub category: IntersectionalCategory,
    /// Joined identity label, e.g. `"Minority + Veteran"` or `"Majority Group"`.
    pub intersection: String,
    pub responses: SurveyResponses,
    pub precomputed: PrecomputedScores,
    pub scores: DerivedScores,
}

impl EmployeeRecord {
    pub fn pillar_scores(&self, pillar: Pillar, variant: ScoreVariant) -> &PillarScores {
        &self.scores.for_variant(variant)[pillar.index()]
    }

    /// The scalar this record contributes to an aggregation or scatter axis.
    pub fn score(&self, field: ScoreField, variant: ScoreVariant) -> f64 {
        match field {
            ScoreField::Age => self.age as f64,
            ScoreField::MarginalizationCount => self.layers as f64,
            ScoreField::Positive(p) => self.pillar_scores(p, variant).positive,
            ScoreField::Negative(p) => self.pillar_scores(p, variant).negative,
            ScoreField::Gap(p) => self.pillar_scores(p, variant).gap(),
            ScoreField::Combined(p) => self.pillar_scores(p, variant).combined(),
            ScoreField::CompositePositive => {
                let pillars = self.scores.for_variant(variant);
                pillars.iter().map(|p| p.positive).sum::<f64>() / 3.0
            }
            ScoreField::Overall => {
                let pillars = self.scores.for_variant(variant);
                pillars.iter().map(PillarScores::combined).sum::<f64>() / 3.0
            }
        }
    }
}

/// The immutable working set every view reads from.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub records: Vector<EmployeeRecord>,
}

impl Dataset {
    pub fn from_records(records: impl IntoIterator<Item = EmployeeRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-empty values of a dimension, in first-seen order.
    pub fn unique_values(&self, dimension: Dimension) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut values = Vec::new();
        for record in &self.records {
            let value = dimension.value_of(record);
            if !value.is_empty() && seen.insert(value.to_string()) {
                values.push(value.to_string());
            }
        }
        values
    }
}

/// Per-group statistics bundle handed to the rendering boundary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// One cell of a matrix-style view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HeatmapCell {
    pub group: String,
    pub category: String,
    pub value: f64,
    pub count: usize,
}

/// One bubble of the intersectional / division-performance views.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BubblePoint {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub size: usize,
    pub category: ScoreCategory,
}

/// One point of a scatter view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub size: u8,
    pub category: String,
    pub outlier: bool,
}

/// OLS regression line.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

/// Pearson correlation plus the (possibly indeterminate) regression.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bivariate {
    pub n: usize,
    pub r: f64,
    pub regression: Option<Regression>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupRef {
    pub key: String,
    pub mean: f64,
    pub count: usize,
}

/// Headline numbers over an aggregated view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Insights {
    pub highest: GroupRef,
    pub lowest: GroupRef,
    pub gap: f64,
    pub average: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupReport {
    pub generated: DateTime<Utc>,
    pub source: PathBuf,
    pub total_records: usize,
    pub filtered_records: usize,
    pub group_by: String,
    pub score: String,
    pub variant: ScoreVariant,
    pub groups: Vec<GroupSummary>,
    pub insights: Option<Insights>,
    /// Simpson's index over the grouping dimension, for dimension keys.
    pub diversity_index: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeatmapReport {
    pub generated: DateTime<Utc>,
    pub source: PathBuf,
    pub view: String,
    pub metric: String,
    pub variant: ScoreVariant,
    pub cells: Vec<HeatmapCell>,
    pub best: Option<f64>,
    pub worst: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub generated: DateTime<Utc>,
    pub source: PathBuf,
    pub x: String,
    pub y: String,
    pub variant: ScoreVariant,
    pub stats: Bivariate,
    pub points: Vec<ScatterPoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BubbleReport {
    pub generated: DateTime<Utc>,
    pub source: PathBuf,
    pub view: String,
    pub score: String,
    pub variant: ScoreVariant,
    pub total_groups: usize,
    pub critical_groups: usize,
    pub best: Option<String>,
    pub worst: Option<String>,
    pub points: Vec<BubblePoint>,
}

/// Everything the rendering boundary can receive.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Groups(GroupReport),
    Heatmap(HeatmapReport),
    Correlation(CorrelationReport),
    Bubbles(BubbleReport),
}
