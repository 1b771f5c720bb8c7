//! Dashboard aggregation: reduce a whole roster into distributional statistics.
//!
//! [`summarize`] is a single pass over the roster through a [`SummaryAccumulator`]. The
//! accumulator can also be built per chunk and merged (see
//! [`crate::execution::CatalogEngine::summarize_parallel`]); merging in chunk order gives the
//! same result as one sequential pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rating::RatingScale;
use crate::config::CatalogConfig;
use crate::types::{ModelRecord, RatingTier, Roster};

/// Price bucket of a primary rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceBucket {
    /// Rate `<= 25`.
    Low,
    /// Rate in `26-49` (any rate above 25 and below 50).
    Mid,
    /// Rate `>= 50`.
    High,
}

impl PriceBucket {
    pub fn for_rate(rate: f64) -> Self {
        if rate <= 25.0 {
            PriceBucket::Low
        } else if rate < 50.0 {
            PriceBucket::Mid
        } else {
            PriceBucket::High
        }
    }
}

/// Record counts per [`PriceBucket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBuckets {
    #[serde(rename = "<=25")]
    pub low: usize,
    #[serde(rename = "26-49")]
    pub mid: usize,
    #[serde(rename = ">=50")]
    pub high: usize,
}

impl PricingBuckets {
    pub fn add(&mut self, bucket: PriceBucket) {
        match bucket {
            PriceBucket::Low => self.low += 1,
            PriceBucket::Mid => self.mid += 1,
            PriceBucket::High => self.high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.mid + self.high
    }
}

/// Username and recordings count of a top-recorded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedModel {
    pub username: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStats {
    pub total_recordings: u64,
    pub average_per_model: f64,
    pub top_recorded_models: Vec<RecordedModel>,
    pub auto_record_enabled: usize,
}

/// Tag name and occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Full-roster summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_models: usize,
    /// Mean overall score; `0` for an empty roster.
    pub average_score: f64,
    /// Count per overall tier. Every tier is present, possibly with `0`.
    pub rating_distribution: BTreeMap<RatingTier, usize>,
    /// Occurrences of every tag across all records (not deduplicated per record).
    pub top_tags: BTreeMap<String, usize>,
    #[serde(rename = "pvtBuckets", alias = "pricingBuckets")]
    pub pricing_buckets: PricingBuckets,
    pub recording_stats: RecordingStats,
}

impl DashboardSummary {
    /// The `limit` most frequent tags, by count descending then tag name.
    pub fn popular_tags(&self, limit: usize) -> Vec<TagCount> {
        let mut tags: Vec<TagCount> = self
            .top_tags
            .iter()
            .map(|(tag, count)| TagCount {
                tag: tag.clone(),
                count: *count,
            })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count));
        tags.truncate(limit);
        tags
    }

    pub fn tier_count(&self, tier: RatingTier) -> usize {
        self.rating_distribution.get(&tier).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
struct TopCandidate {
    index: usize,
    username: String,
    count: u64,
}

/// Incremental summary state.
#[derive(Debug, Clone)]
pub struct SummaryAccumulator {
    scale: RatingScale,
    top_limit: usize,
    total: usize,
    score_sum: u64,
    distribution: [usize; 8],
    tags: BTreeMap<String, usize>,
    buckets: PricingBuckets,
    total_recordings: u64,
    auto_record: usize,
    top: Vec<TopCandidate>,
}

impl SummaryAccumulator {
    pub fn new(scale: RatingScale, top_limit: usize) -> Self {
        Self {
            scale,
            top_limit,
            total: 0,
            score_sum: 0,
            distribution: [0; 8],
            tags: BTreeMap::new(),
            buckets: PricingBuckets::default(),
            total_recordings: 0,
            auto_record: 0,
            top: Vec::new(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.scale.clone(), config.top_recorded_limit)
    }

    /// Add the record found at position `index` of the roster.
    pub fn push(&mut self, index: usize, record: &ModelRecord) {
        self.total += 1;
        self.score_sum += u64::from(self.scale.score_of(record.overall()));
        self.distribution[record.overall().rank()] += 1;
        for tag in &record.tags {
            *self.tags.entry(tag.clone()).or_insert(0) += 1;
        }
        self.buckets.add(PriceBucket::for_rate(record.pricing.primary_rate()));
        self.total_recordings += record.recordings;
        if record.auto_record {
            self.auto_record += 1;
        }
        self.offer_top(TopCandidate {
            index,
            username: record.username.clone(),
            count: record.recordings,
        });
    }

    fn offer_top(&mut self, candidate: TopCandidate) {
        if self.top_limit == 0 {
            return;
        }
        if self.top.len() == self.top_limit {
            if let Some(last) = self.top.last() {
                if !ranks_before(&candidate, last) {
                    return;
                }
            }
        }
        let pos = self
            .top
            .iter()
            .position(|c| ranks_before(&candidate, c))
            .unwrap_or(self.top.len());
        self.top.insert(pos, candidate);
        self.top.truncate(self.top_limit);
    }

    /// Merge another accumulator built from a later part of the same roster.
    pub fn merge(mut self, other: SummaryAccumulator) -> Self {
        self.total += other.total;
        self.score_sum += other.score_sum;
        for (dst, src) in self.distribution.iter_mut().zip(other.distribution) {
            *dst += src;
        }
        for (tag, count) in other.tags {
            *self.tags.entry(tag).or_insert(0) += count;
        }
        self.buckets.low += other.buckets.low;
        self.buckets.mid += other.buckets.mid;
        self.buckets.high += other.buckets.high;
        self.total_recordings += other.total_recordings;
        self.auto_record += other.auto_record;
        for candidate in other.top {
            self.offer_top(candidate);
        }
        self
    }

    pub fn finish(self) -> DashboardSummary {
        let (average_score, average_per_model) = if self.total == 0 {
            (0.0, 0.0)
        } else {
            let n = self.total as f64;
            (self.score_sum as f64 / n, self.total_recordings as f64 / n)
        };

        let rating_distribution = RatingTier::ALL
            .into_iter()
            .map(|t| (t, self.distribution[t.rank()]))
            .collect();

        DashboardSummary {
            total_models: self.total,
            average_score,
            rating_distribution,
            top_tags: self.tags,
            pricing_buckets: self.buckets,
            recording_stats: RecordingStats {
                total_recordings: self.total_recordings,
                average_per_model,
                top_recorded_models: self
                    .top
                    .into_iter()
                    .map(|c| RecordedModel {
                        username: c.username,
                        count: c.count,
                    })
                    .collect(),
                auto_record_enabled: self.auto_record,
            },
        }
    }
}

/// Higher count first; on equal counts the earlier roster position wins.
fn ranks_before(a: &TopCandidate, b: &TopCandidate) -> bool {
    a.count > b.count || (a.count == b.count && a.index < b.index)
}

/// Summarize a roster with the default configuration.
pub fn summarize(roster: &Roster) -> DashboardSummary {
    summarize_with(roster, &CatalogConfig::default())
}

/// Summarize a roster with an explicit configuration.
pub fn summarize_with(roster: &Roster, config: &CatalogConfig) -> DashboardSummary {
    let mut acc = SummaryAccumulator::from_config(config);
    for (i, r) in roster.iter().enumerate() {
        acc.push(i, r);
    }
    acc.finish()
}
