//! Rating scale: tier → score lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};
use crate::types::RatingTier;

/// Scores of the default scale, in tier rank order (`S++` first).
pub const DEFAULT_SCORES: [u32; 8] = [100, 95, 88, 82, 75, 65, 50, 35];

/// Maximum score any tier may map to.
pub const MAX_SCORE: u32 = 100;

/// A tier → score table, strictly decreasing along tier rank.
///
/// On the wire a scale is a map from tier label to score, e.g. `{"S++": 100, "S+": 95, ...}`.
/// Every tier must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct RatingScale {
    scores: [u32; 8],
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            scores: DEFAULT_SCORES,
        }
    }
}

impl RatingScale {
    /// Create a scale from scores in tier rank order.
    ///
    /// Returns [`RosterError::InvalidScale`] if any score exceeds [`MAX_SCORE`] or the scores
    /// are not strictly decreasing.
    pub fn new(scores: [u32; 8]) -> RosterResult<Self> {
        if let Some((i, s)) = scores.iter().enumerate().find(|(_, s)| **s > MAX_SCORE) {
            return Err(RosterError::InvalidScale {
                message: format!("score {s} for tier {} exceeds {MAX_SCORE}", RatingTier::ALL[i]),
            });
        }
        for (i, pair) in scores.windows(2).enumerate() {
            if pair[0] <= pair[1] {
                return Err(RosterError::InvalidScale {
                    message: format!(
                        "tier {} ({}) must score higher than tier {} ({})",
                        RatingTier::ALL[i],
                        pair[0],
                        RatingTier::ALL[i + 1],
                        pair[1]
                    ),
                });
            }
        }
        Ok(Self { scores })
    }

    /// Score of a tier.
    pub fn score_of(&self, tier: RatingTier) -> u32 {
        self.scores[tier.rank()]
    }

    /// Score of a raw tier label. Unknown or malformed labels score `0`.
    pub fn score_label(&self, label: &str) -> u32 {
        RatingTier::from_label(label)
            .map(|t| self.score_of(t))
            .unwrap_or(0)
    }

    /// Scores in tier rank order.
    pub fn scores(&self) -> [u32; 8] {
        self.scores
    }
}

impl TryFrom<BTreeMap<String, u32>> for RatingScale {
    type Error = RosterError;

    fn try_from(map: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        let mut scores: [Option<u32>; 8] = [None; 8];
        for (label, score) in &map {
            let tier = RatingTier::from_label(label).ok_or_else(|| RosterError::InvalidScale {
                message: format!("unknown tier '{label}'"),
            })?;
            scores[tier.rank()] = Some(*score);
        }
        let mut out = [0u32; 8];
        for (i, s) in scores.into_iter().enumerate() {
            out[i] = s.ok_or_else(|| RosterError::InvalidScale {
                message: format!("missing tier '{}'", RatingTier::ALL[i]),
            })?;
        }
        Self::new(out)
    }
}

impl From<RatingScale> for BTreeMap<String, u32> {
    fn from(scale: RatingScale) -> Self {
        RatingTier::ALL
            .into_iter()
            .map(|t| (t.label().to_string(), scale.score_of(t)))
            .collect()
    }
}

/// Score of a tier on the default scale.
pub fn score_of(tier: RatingTier) -> u32 {
    DEFAULT_SCORES[tier.rank()]
}

/// Score of a raw tier label on the default scale; unknown labels score `0`.
pub fn score_label(label: &str) -> u32 {
    RatingScale::default().score_label(label)
}

/// True iff the tier is in the `S` family.
pub fn is_premium(tier: RatingTier) -> bool {
    tier.is_premium()
}
