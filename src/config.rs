//! TOML configuration for defaults the CLI does not override per run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{ScoreThresholds, ScoreVariant, SyntheticNegative};
use crate::errors::Result;

pub const DEFAULT_CONFIG_PATH: &str = "deimap.toml";

/// Score derivation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Which positive/negative definition views use unless overridden
    pub variant: ScoreVariant,

    /// Stand-in for a missing negative column under the all-mean variant
    pub synthetic_negative: SyntheticNegative,
}

/// Filter defaults applied when a run does not specify its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Lower age slider bound
    #[serde(default = "default_age_min")]
    pub age_min: u32,

    /// Upper age slider bound
    #[serde(default = "default_age_max")]
    pub age_max: u32,

    /// Groups smaller than this are dropped from aggregated views
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            age_min: default_age_min(),
            age_max: default_age_max(),
            min_group_size: default_min_group_size(),
        }
    }
}

fn default_age_min() -> u32 {
    24
}
fn default_age_max() -> u32 {
    65
}
fn default_min_group_size() -> usize {
    5
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeimapConfig {
    pub scoring: ScoringSettings,
    pub filters: FilterSettings,
    pub thresholds: ScoreThresholds,
}

impl DeimapConfig {
    /// Load from an explicit path, or from `deimap.toml` in the working
    /// directory when present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        use crate::errors::Error;

        if self.filters.age_min > self.filters.age_max {
            return Err(Error::Configuration(format!(
                "age_min ({}) must not exceed age_max ({})",
                self.filters.age_min, self.filters.age_max
            )));
        }
        if self.filters.min_group_size == 0 {
            return Err(Error::Configuration(
                "min_group_size must be at least 1".to_string(),
            ));
        }

        let t = &self.thresholds;
        if !(t.critical < t.low && t.low < t.moderate && t.moderate < t.good) {
            return Err(Error::Configuration(
                "thresholds must be strictly ascending: critical < low < moderate < good"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Template written by `deimap init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Deimap Configuration

[scoring]
# signed-split: positive = mean of answers > 0, negative = |mean of answers < 0|
# all-mean:     positive = mean of all answers or the precomputed column
variant = "signed-split"
# negative stand-in when the source has no negative column (all-mean only):
# "zero" or "mirror-positive"
synthetic_negative = "zero"

[filters]
age_min = 24
age_max = 65
min_group_size = 5

[thresholds]
critical = -1.0
low = -0.5
moderate = 0.0
good = 0.5
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeimapConfig::default();
        assert_eq!(config.scoring.variant, ScoreVariant::SignedSplit);
        assert_eq!(config.scoring.synthetic_negative, SyntheticNegative::Zero);
        assert_eq!(config.filters.age_min, 24);
        assert_eq!(config.filters.age_max, 65);
        assert_eq!(config.filters.min_group_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: DeimapConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.filters.min_group_size, 5);
        assert_eq!(config.thresholds.good, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: DeimapConfig =
            toml::from_str("[scoring]\nvariant = \"all-mean\"\n").unwrap();
        assert_eq!(config.scoring.variant, ScoreVariant::AllMean);
        assert_eq!(config.filters.age_max, 65);
    }

    #[test]
    fn test_validation_rejects_bad_thresholds() {
        let mut config = DeimapConfig::default();
        config.thresholds.low = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_ages() {
        let mut config = DeimapConfig::default();
        config.filters.age_min = 70;
        assert!(config.validate().is_err());
    }
}
