//! Card and dashboard projections of roster records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{summarize_with, DashboardSummary, TagCount};
use super::sort::{sort_with, SortKey, SortSpec};
use super::value::ValueTier;
use crate::config::CatalogConfig;
use crate::types::{ModelRecord, RatingAxis, RatingTier, Roster};

/// One rating axis as shown on a card's detail grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRating {
    pub axis: RatingAxis,
    pub tier: RatingTier,
    pub score: u32,
}

/// Compact, display-ready view of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCard {
    pub username: String,
    pub site: String,
    pub display_name: String,
    pub rating: RatingTier,
    /// Every axis in [`RatingAxis::ALL`] order, overall first.
    pub axes: Vec<AxisRating>,
    pub score: u32,
    pub value_score: u32,
    pub value_deal: bool,
    pub premium: bool,
    /// Absent when the record has no primary rate.
    pub value_tier: Option<ValueTier>,
    pub pvt_rate: Option<f64>,
    pub recordings: u64,
    pub tags: Vec<String>,
    /// Newest first.
    pub recent_notes: Vec<String>,
    pub prospect: bool,
}

impl ModelCard {
    pub fn from_record(record: &ModelRecord, config: &CatalogConfig) -> Self {
        let rate = record.pricing.primary_rate();
        let tier = record.overall();

        let mut notes: Vec<_> = record.notes.iter().collect();
        notes.sort_by(|a, b| b.time.cmp(&a.time));

        Self {
            username: record.username.clone(),
            site: record.site.clone(),
            display_name: record.display_name().to_string(),
            rating: tier,
            axes: RatingAxis::ALL
                .into_iter()
                .map(|axis| {
                    let tier = record.ratings.get(axis);
                    AxisRating {
                        axis,
                        tier,
                        score: config.score_of(tier),
                    }
                })
                .collect(),
            score: config.score_of(tier),
            value_score: config.value_score(rate, tier),
            value_deal: record.pricing.rate.is_some() && config.is_value_deal(rate),
            premium: tier.is_premium(),
            value_tier: record.pricing.rate.map(ValueTier::from_rate),
            pvt_rate: record.pricing.rate,
            recordings: record.recordings,
            tags: record.tags.iter().take(config.card_tag_limit).cloned().collect(),
            recent_notes: notes
                .into_iter()
                .take(config.card_note_limit)
                .map(|n| n.note.clone())
                .collect(),
            prospect: record.prospect,
        }
    }
}

/// Cards for every record, in roster order.
pub fn cards(roster: &Roster, config: &CatalogConfig) -> Vec<ModelCard> {
    roster.iter().map(|r| ModelCard::from_record(r, config)).collect()
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub generated_at: DateTime<Utc>,
    pub summary: DashboardSummary,
    pub popular_tags: Vec<TagCount>,
    /// Best-rated records, at most `dashboard_top_limit`.
    pub top: Vec<ModelCard>,
    /// Prospect records in roster order.
    pub prospects: Vec<ModelCard>,
}

pub fn build_dashboard(roster: &Roster, config: &CatalogConfig, generated_at: DateTime<Utc>) -> DashboardData {
    let summary = summarize_with(roster, config);
    let popular_tags = summary.popular_tags(config.top_tags_limit);

    let ranked = sort_with(roster, SortSpec::descending(SortKey::Rating), &config.scale);
    let top = ranked
        .iter()
        .take(config.dashboard_top_limit)
        .map(|r| ModelCard::from_record(r, config))
        .collect();

    let prospects = roster
        .iter()
        .filter(|r| r.prospect)
        .map(|r| ModelCard::from_record(r, config))
        .collect();

    DashboardData {
        generated_at,
        summary,
        popular_tags,
        top,
        prospects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Note, Pricing};
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 9, 30, 0).unwrap()
    }

    fn note(day: u32, text: &str) -> Note {
        Note {
            time: at(day),
            note: text.to_string(),
            source: None,
            url: None,
        }
    }

    #[test]
    fn card_projects_scores_tags_and_recent_notes() {
        let mut r = ModelRecord::new("luna", RatingTier::S, at(1));
        r.pricing = Pricing::with_rate(20.0);
        r.tags = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        r.notes = vec![note(3, "third"), note(1, "first"), note(9, "ninth"), note(5, "fifth")];

        let card = ModelCard::from_record(&r, &CatalogConfig::default());
        assert_eq!(card.display_name, "luna");
        assert_eq!(card.score, 88);
        assert_eq!(card.value_score, 8);
        assert!(card.value_deal);
        assert!(card.premium);
        assert_eq!(card.value_tier, Some(ValueTier::Budget));
        assert_eq!(card.tags, vec!["a", "b", "c", "d"]);
        assert_eq!(card.recent_notes, vec!["ninth", "fifth", "third"]);
    }

    #[test]
    fn card_lists_every_axis_with_its_score() {
        let mut r = ModelRecord::new("ivy", RatingTier::A, at(1));
        r.ratings.vibe = RatingTier::SPlusPlus;
        r.ratings.production = RatingTier::D;

        let card = ModelCard::from_record(&r, &CatalogConfig::default());
        let axes: Vec<RatingAxis> = card.axes.iter().map(|a| a.axis).collect();
        assert_eq!(axes, RatingAxis::ALL.to_vec());
        assert_eq!(card.axes[0].tier, RatingTier::A);
        assert_eq!(card.axes[0].score, 75);

        let vibe = card.axes.iter().find(|a| a.axis == RatingAxis::Vibe).unwrap();
        assert_eq!((vibe.tier, vibe.score), (RatingTier::SPlusPlus, 100));

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["axes"][6]["axis"], "production");
        assert_eq!(json["axes"][6]["tier"], "D");
    }

    #[test]
    fn card_without_rate_has_no_value_tier_and_is_not_a_deal() {
        let r = ModelRecord::new("nora", RatingTier::B, at(1));
        let card = ModelCard::from_record(&r, &CatalogConfig::default());
        assert_eq!(card.value_tier, None);
        assert!(!card.value_deal);
        assert!(!card.premium);
    }

    #[test]
    fn dashboard_ranks_top_and_collects_prospects() {
        let mut a = ModelRecord::new("a", RatingTier::B, at(1));
        a.prospect = true;
        let b = ModelRecord::new("b", RatingTier::SPlus, at(1));
        let mut c = ModelRecord::new("c", RatingTier::A, at(1));
        c.prospect = true;
        let roster = Roster::new(vec![a, b, c]);

        let config = CatalogConfig {
            dashboard_top_limit: 2,
            ..CatalogConfig::default()
        };
        let data = build_dashboard(&roster, &config, at(10));
        let top: Vec<&str> = data.top.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(top, vec!["b", "c"]);
        let prospects: Vec<&str> = data.prospects.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(prospects, vec!["a", "c"]);
        assert_eq!(data.summary.total_models, 3);
        assert_eq!(data.generated_at, at(10));
    }
}
