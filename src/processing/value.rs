//! Value scoring: blend quality and affordability into a single 0-10 score.

use serde::{Deserialize, Serialize};

use super::rating::RatingScale;
use crate::types::RatingTier;

/// Default price at or below which a record counts as a value deal.
pub const DEFAULT_VALUE_THRESHOLD: f64 = 30.0;

/// Value score on the default scale: `round((score + max(0, 100 - price)) / 20)`.
pub fn value_score(price: f64, tier: RatingTier) -> u32 {
    value_score_with(&RatingScale::default(), price, tier)
}

/// Value score using an explicit rating scale. The result is clamped to `[0, 10]`.
pub fn value_score_with(scale: &RatingScale, price: f64, tier: RatingTier) -> u32 {
    let quality = f64::from(scale.score_of(tier));
    let affordability = (100.0 - price).max(0.0);
    ((quality + affordability) / 20.0).round().clamp(0.0, 10.0) as u32
}

/// True iff `price` is at or below [`DEFAULT_VALUE_THRESHOLD`].
pub fn is_value_deal(price: f64) -> bool {
    is_value_deal_with(price, DEFAULT_VALUE_THRESHOLD)
}

pub fn is_value_deal_with(price: f64, threshold: f64) -> bool {
    price <= threshold
}

/// Coarse price class of a primary rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueTier {
    /// Rate at or below 25.
    Budget,
    /// Rate below 50.
    Standard,
    /// Rate below 100.
    Premium,
    /// Rate of 100 or more.
    Luxury,
}

impl ValueTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate <= 25.0 {
            ValueTier::Budget
        } else if rate < 50.0 {
            ValueTier::Standard
        } else if rate < 100.0 {
            ValueTier::Premium
        } else {
            ValueTier::Luxury
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_score_blends_quality_and_price() {
        // (88 + 80) / 20 = 8.4
        assert_eq!(value_score(20.0, RatingTier::S), 8);
        // (100 + 100) / 20 = 10
        assert_eq!(value_score(0.0, RatingTier::SPlusPlus), 10);
        // (35 + 0) / 20 = 1.75
        assert_eq!(value_score(150.0, RatingTier::D), 2);
        // (75 + 55) / 20 = 6.5 rounds up
        assert_eq!(value_score(45.0, RatingTier::A), 7);
    }

    #[test]
    fn value_score_is_clamped() {
        assert_eq!(value_score(-500.0, RatingTier::SPlusPlus), 10);
    }

    #[test]
    fn value_score_uses_injected_scale() {
        let scale = RatingScale::new([80, 70, 60, 50, 40, 30, 20, 10]).unwrap();
        // (60 + 80) / 20 = 7
        assert_eq!(value_score_with(&scale, 20.0, RatingTier::S), 7);
    }

    #[test]
    fn value_deal_threshold() {
        assert!(is_value_deal(30.0));
        assert!(is_value_deal(0.0));
        assert!(!is_value_deal(30.5));
        assert!(is_value_deal_with(40.0, 45.0));
    }

    #[test]
    fn value_tier_boundaries() {
        assert_eq!(ValueTier::from_rate(25.0), ValueTier::Budget);
        assert_eq!(ValueTier::from_rate(26.0), ValueTier::Standard);
        assert_eq!(ValueTier::from_rate(50.0), ValueTier::Premium);
        assert_eq!(ValueTier::from_rate(100.0), ValueTier::Luxury);
    }
}
