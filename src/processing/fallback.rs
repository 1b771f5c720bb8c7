//! Diagnostics for the silent defaults applied by the pipeline.
//!
//! The pipeline never fails on odd input; it substitutes a default instead (missing price → 0,
//! missing `addedAt` → epoch, unknown tier label → score 0, unrecognized sort key/direction →
//! rating descending). [`FallbackCounts`] tallies how often that happens so callers can notice
//! bad upstream data without changing the default-first behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::sort::SortKey;
use crate::types::Roster;

/// One kind of default substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// A record had no primary rate and was treated as `0`.
    MissingPrice,
    /// A record had no `addedAt` and was treated as the Unix epoch.
    MissingAddedAt,
    /// A tier label was not recognized.
    UnknownTierLabel,
    /// A sort key was not recognized; `rating` was used.
    UnrecognizedSortKey,
    /// A sort direction was not recognized; `descending` was used.
    UnrecognizedDirection,
}

impl FallbackKind {
    pub const ALL: [FallbackKind; 5] = [
        FallbackKind::MissingPrice,
        FallbackKind::MissingAddedAt,
        FallbackKind::UnknownTierLabel,
        FallbackKind::UnrecognizedSortKey,
        FallbackKind::UnrecognizedDirection,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackKind::MissingPrice => "missing_price",
            FallbackKind::MissingAddedAt => "missing_added_at",
            FallbackKind::UnknownTierLabel => "unknown_tier_label",
            FallbackKind::UnrecognizedSortKey => "unrecognized_sort_key",
            FallbackKind::UnrecognizedDirection => "unrecognized_direction",
        };
        f.write_str(s)
    }
}

/// Hit counts per [`FallbackKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackCounts {
    counts: [u64; 5],
}

impl FallbackCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: FallbackKind) {
        self.add(kind, 1);
    }

    pub fn add(&mut self, kind: FallbackKind, n: u64) {
        self.counts[kind.index()] += n;
    }

    pub fn get(&self, kind: FallbackKind) -> u64 {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Non-zero counts, in [`FallbackKind::ALL`] order.
    pub fn non_zero(&self) -> impl Iterator<Item = (FallbackKind, u64)> + '_ {
        FallbackKind::ALL
            .into_iter()
            .map(|k| (k, self.get(k)))
            .filter(|(_, n)| *n > 0)
    }

    /// Defaults a sort by `key` would apply to `roster`.
    pub fn for_sort(roster: &Roster, key: SortKey) -> Self {
        let mut out = Self::new();
        match key {
            SortKey::Price => out.add(FallbackKind::MissingPrice, missing_price(roster)),
            SortKey::Recent => {
                let n = roster.iter().filter(|r| r.added_at.is_none()).count() as u64;
                out.add(FallbackKind::MissingAddedAt, n);
            }
            SortKey::Rating | SortKey::Name | SortKey::Recordings => {}
        }
        out
    }

    /// Defaults a summary of `roster` would apply (missing rates are bucketed as `0`).
    pub fn for_summary(roster: &Roster) -> Self {
        let mut out = Self::new();
        out.add(FallbackKind::MissingPrice, missing_price(roster));
        out
    }
}

impl fmt::Display for FallbackCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, n) in self.non_zero() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{kind}={n}")?;
            first = false;
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

fn missing_price(roster: &Roster) -> u64 {
    roster.iter().filter(|r| r.pricing.rate.is_none()).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ModelRecord, Pricing, RatingTier};
    use chrono::{TimeZone, Utc};

    fn roster() -> Roster {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut priced = ModelRecord::new("priced", RatingTier::A, ts);
        priced.pricing = Pricing::with_rate(12.0);
        priced.added_at = Some(ts);
        let bare = ModelRecord::new("bare", RatingTier::B, ts);
        let bare2 = ModelRecord::new("bare2", RatingTier::B, ts);
        Roster::new(vec![priced, bare, bare2])
    }

    #[test]
    fn sort_fallbacks_depend_on_key() {
        let r = roster();
        assert_eq!(FallbackCounts::for_sort(&r, SortKey::Price).get(FallbackKind::MissingPrice), 2);
        assert_eq!(FallbackCounts::for_sort(&r, SortKey::Recent).get(FallbackKind::MissingAddedAt), 2);
        assert_eq!(FallbackCounts::for_sort(&r, SortKey::Name).total(), 0);
    }

    #[test]
    fn summary_fallbacks_count_missing_rates() {
        assert_eq!(FallbackCounts::for_summary(&roster()).get(FallbackKind::MissingPrice), 2);
    }

    #[test]
    fn display_lists_non_zero_kinds() {
        let mut c = FallbackCounts::new();
        assert_eq!(c.to_string(), "none");
        c.record(FallbackKind::UnknownTierLabel);
        c.add(FallbackKind::MissingPrice, 3);
        assert_eq!(c.to_string(), "missing_price=3, unknown_tier_label=1");
        assert_eq!(c.total(), 4);
    }
}
