//! Injected configuration for scoring and summary limits.
//!
//! Every field has a default, so a config file only needs to name what it overrides:
//!
//! ```rust
//! use roster_pipeline::config::CatalogConfig;
//!
//! let config = CatalogConfig::from_json_str(r#"{"valueThreshold": 45}"#).unwrap();
//! assert_eq!(config.value_threshold, 45.0);
//! assert_eq!(config.top_recorded_limit, 5);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};
use crate::processing::rating::RatingScale;
use crate::processing::value::{is_value_deal_with, value_score_with, DEFAULT_VALUE_THRESHOLD};
use crate::types::RatingTier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogConfig {
    /// Tier → score table.
    pub scale: RatingScale,
    /// Price at or below which a record is a value deal.
    pub value_threshold: f64,
    /// Length of `recordingStats.topRecordedModels`.
    pub top_recorded_limit: usize,
    /// Number of tags shown as popular.
    pub top_tags_limit: usize,
    /// Tags previewed on a model card.
    pub card_tag_limit: usize,
    /// Recent notes shown on a model card.
    pub card_note_limit: usize,
    /// Records in the dashboard's top list.
    pub dashboard_top_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            scale: RatingScale::default(),
            value_threshold: DEFAULT_VALUE_THRESHOLD,
            top_recorded_limit: 5,
            top_tags_limit: 8,
            card_tag_limit: 4,
            card_note_limit: 3,
            dashboard_top_limit: 50,
        }
    }
}

impl CatalogConfig {
    /// Parse overrides from JSON.
    ///
    /// An invalid rating scale is reported as [`RosterError::InvalidScale`]; any other shape
    /// error is [`RosterError::Json`].
    pub fn from_json_str(input: &str) -> RosterResult<Self> {
        let mut doc: serde_json::Value = serde_json::from_str(input)?;
        let scale = doc.as_object_mut().and_then(|obj| obj.remove("scale"));

        let mut config: Self = serde_json::from_value(doc)?;
        if let Some(scale) = scale {
            let table: BTreeMap<String, u32> = serde_json::from_value(scale)?;
            config.scale = RatingScale::try_from(table)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> RosterResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> RosterResult<()> {
        if !self.value_threshold.is_finite() || self.value_threshold < 0.0 {
            return Err(RosterError::Config {
                message: format!("valueThreshold must be a non-negative number, got {}", self.value_threshold),
            });
        }
        Ok(())
    }

    pub fn score_of(&self, tier: RatingTier) -> u32 {
        self.scale.score_of(tier)
    }

    pub fn value_score(&self, price: f64, tier: RatingTier) -> u32 {
        value_score_with(&self.scale, price, tier)
    }

    pub fn is_value_deal(&self, price: f64) -> bool {
        is_value_deal_with(price, self.value_threshold)
    }
}
