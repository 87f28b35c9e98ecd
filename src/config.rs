//! Analysis configuration loaded from YAML.

use crate::data::Rank;
use crate::error::Result;
use crate::rank::RankOptions;
use serde::{Deserialize, Serialize};

/// Configuration for a multi-rank analysis run.
///
/// Replaces the ad-hoc constants of one-off analysis scripts (which ranks
/// to extract, how many entries to keep, decimal precision) with an
/// explicit value that is passed into each operation rather than read from
/// ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Name of this analysis, used in output messages.
    pub name: String,
    /// Ranks to extract, processed in order.
    pub ranks: Vec<Rank>,
    /// Decimal precision for percentages.
    pub precision: u32,
    /// Keep only the top K taxa per rank; `null` is unbounded.
    pub top: Option<usize>,
    /// Fail when a rank filter yields zero records.
    pub strict: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            name: "abundance".to_string(),
            ranks: vec![Rank::Phylum, Rank::Genus, Rank::Species],
            precision: 2,
            top: Some(20),
            strict: false,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The ranking options this configuration describes.
    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            precision: self.precision,
            top: self.top,
            strict: self.strict,
        }
    }
}
