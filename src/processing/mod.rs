//! In-memory roster transformations.
//!
//! Every operation reads a [`crate::types::Roster`] and returns a new value; nothing here
//! mutates its input, performs I/O, or fails.
//!
//! - [`rating`]: tier → score lookup ([`score_of`], [`RatingScale`])
//! - [`value`]: price/quality blend ([`value_score`], [`is_value_deal`])
//! - [`filter()`]: AND of optional predicates ([`Criteria`])
//! - [`sort()`]: stable ordering by [`SortKey`] and [`SortDirection`]
//! - [`summarize()`]: dashboard statistics ([`DashboardSummary`])
//! - [`cards`]: card and dashboard projections
//! - [`query`]: lenient parsing of query parameters
//! - [`fallback`]: counts of default substitutions
//!
//! ## Example: filter → sort → summarize
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use roster_pipeline::processing::{filter, sort, summarize, Criteria, SortDirection, SortKey};
//! use roster_pipeline::types::{ModelRecord, Pricing, RatingTier, Roster};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let mut records = Vec::new();
//! for (name, tier, rate) in [("s", RatingTier::S, 20.0), ("a", RatingTier::A, 40.0), ("b", RatingTier::B, 10.0)] {
//!     let mut r = ModelRecord::new(name, tier, ts);
//!     r.pricing = Pricing::with_rate(rate);
//!     records.push(r);
//! }
//! let roster = Roster::new(records);
//!
//! let only_s = filter(&roster, &Criteria::new().with_rating_tier(RatingTier::S));
//! assert_eq!(only_s.usernames(), vec!["s"]);
//!
//! let by_price = sort(&roster, SortKey::Price, SortDirection::Ascending);
//! assert_eq!(by_price.usernames(), vec!["b", "s", "a"]);
//!
//! let summary = summarize(&roster);
//! assert_eq!(summary.average_score, 76.0);
//! assert_eq!(summary.pricing_buckets.low, 2);
//! ```

pub mod aggregate;
pub mod cards;
pub mod fallback;
pub mod filter;
pub mod query;
pub mod rating;
pub mod sort;
pub mod value;

pub use aggregate::{
    summarize, summarize_with, DashboardSummary, PriceBucket, PricingBuckets, RecordedModel, RecordingStats,
    SummaryAccumulator, TagCount,
};
pub use cards::{build_dashboard, cards, AxisRating, DashboardData, ModelCard};
pub use fallback::{FallbackCounts, FallbackKind};
pub use filter::{filter, Criteria};
pub use query::{parse_query, parse_sort, ParsedQuery};
pub use rating::{is_premium, score_label, score_of, RatingScale};
pub use sort::{sort, sort_with, SortDirection, SortKey, SortSpec};
pub use value::{is_value_deal, value_score, value_score_with, ValueTier};
