//! Core data model for the roster.
//!
//! A [`Roster`] is an ordered collection of [`ModelRecord`]s with unique usernames. Every
//! transformation in [`crate::processing`] reads a roster and returns a new one; records are
//! never mutated in place.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};

/// Ordinal quality rating, highest first.
///
/// The derived ordering follows rank: `SPlusPlus < SPlus < ... < D`, i.e. better tiers sort
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingTier {
    #[serde(rename = "S++")]
    SPlusPlus,
    #[serde(rename = "S+")]
    SPlus,
    S,
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
}

impl RatingTier {
    /// All tiers in rank order (best first).
    pub const ALL: [RatingTier; 8] = [
        RatingTier::SPlusPlus,
        RatingTier::SPlus,
        RatingTier::S,
        RatingTier::APlus,
        RatingTier::A,
        RatingTier::B,
        RatingTier::C,
        RatingTier::D,
    ];

    /// Display label, e.g. `"S++"`.
    pub fn label(self) -> &'static str {
        match self {
            RatingTier::SPlusPlus => "S++",
            RatingTier::SPlus => "S+",
            RatingTier::S => "S",
            RatingTier::APlus => "A+",
            RatingTier::A => "A",
            RatingTier::B => "B",
            RatingTier::C => "C",
            RatingTier::D => "D",
        }
    }

    /// Parse a tier label (surrounding whitespace and letter case are ignored).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Zero-based position in rank order (`S++` is 0).
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Premium tiers are the `S` family.
    pub fn is_premium(self) -> bool {
        self.label().starts_with('S')
    }
}

impl fmt::Display for RatingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rating axis of [`Ratings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingAxis {
    Overall,
    Face,
    Body,
    Ass,
    Boobs,
    Vibe,
    Production,
}

impl RatingAxis {
    pub const ALL: [RatingAxis; 7] = [
        RatingAxis::Overall,
        RatingAxis::Face,
        RatingAxis::Body,
        RatingAxis::Ass,
        RatingAxis::Boobs,
        RatingAxis::Vibe,
        RatingAxis::Production,
    ];
}

/// Fixed-shape mapping from [`RatingAxis`] to [`RatingTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub overall: RatingTier,
    pub face: RatingTier,
    pub body: RatingTier,
    pub ass: RatingTier,
    pub boobs: RatingTier,
    pub vibe: RatingTier,
    pub production: RatingTier,
}

impl Ratings {
    /// Ratings with every axis set to `tier`.
    pub fn uniform(tier: RatingTier) -> Self {
        Self {
            overall: tier,
            face: tier,
            body: tier,
            ass: tier,
            boobs: tier,
            vibe: tier,
            production: tier,
        }
    }

    pub fn get(&self, axis: RatingAxis) -> RatingTier {
        match axis {
            RatingAxis::Overall => self.overall,
            RatingAxis::Face => self.face,
            RatingAxis::Body => self.body,
            RatingAxis::Ass => self.ass,
            RatingAxis::Boobs => self.boobs,
            RatingAxis::Vibe => self.vibe,
            RatingAxis::Production => self.production,
        }
    }
}

/// Pricing information.
///
/// Field names on the wire follow the upstream API (`pvt`, `pvt_rate`, `pvt_min`, `toy`,
/// `toy_costs`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Compact label such as `"44/10"` (44 per minute, 10 minute minimum).
    #[serde(rename = "pvt", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Primary rate, cost per minute.
    #[serde(rename = "pvt_rate", default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// Minimum billable minutes.
    #[serde(rename = "pvt_min", default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u32>,
    /// Secondary rate, e.g. `"2/1low"`.
    #[serde(rename = "toy", default, skip_serializing_if = "Option::is_none")]
    pub secondary_rate: Option<String>,
    #[serde(rename = "toy_costs", default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_costs: Vec<String>,
}

impl Pricing {
    /// Pricing with only a primary rate.
    pub fn with_rate(rate: f64) -> Self {
        Self {
            rate: Some(rate),
            ..Self::default()
        }
    }

    /// Primary rate; an absent rate counts as `0`. A negative zero reads as `0`.
    pub fn primary_rate(&self) -> f64 {
        self.rate.map_or(0.0, |rate| rate + 0.0)
    }

    /// Parse a `"<rate>/<minimum>"` label into `(rate, minimum)`.
    ///
    /// The minimum is optional (`"44"` parses as `(44.0, None)`).
    pub fn parse_label(label: &str) -> Option<(f64, Option<u32>)> {
        let mut parts = label.trim().splitn(2, '/');
        let rate = parts.next()?.trim().parse::<f64>().ok()?;
        if !rate.is_finite() {
            return None;
        }
        let minimum = match parts.next() {
            Some(m) => Some(m.trim().parse::<u32>().ok()?),
            None => None,
        };
        Some((rate, minimum))
    }
}

/// A timestamped freeform annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub time: DateTime<Utc>,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single model profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    /// Unique key within a roster.
    pub username: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub ratings: Ratings,
    #[serde(default)]
    pub pricing: Pricing,
    /// Free-text labels; display order is preserved, matching is case-insensitive.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Notes in storage order, which is not necessarily chronological.
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub recordings: u64,
    #[serde(default)]
    pub prospect: bool,
    #[serde(default)]
    pub auto_record: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

impl ModelRecord {
    /// Create a record with the given identity and overall tier; every other axis gets the same
    /// tier and all optional data is empty.
    pub fn new(username: impl Into<String>, overall: RatingTier, last_updated: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            site: String::new(),
            display_name: None,
            ratings: Ratings::uniform(overall),
            pricing: Pricing::default(),
            tags: Vec::new(),
            notes: Vec::new(),
            recordings: 0,
            prospect: false,
            auto_record: false,
            added_at: None,
            last_updated,
        }
    }

    /// Display name, falling back to the username.
    pub fn display_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    pub fn overall(&self) -> RatingTier {
        self.ratings.overall
    }

    /// Case-insensitive exact tag match.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }
}

/// In-memory roster: an ordered sequence of records with unique usernames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    /// Records in roster order.
    pub records: Vec<ModelRecord>,
}

impl Roster {
    /// Create a roster without checking identity uniqueness.
    pub fn new(records: Vec<ModelRecord>) -> Self {
        Self { records }
    }

    /// Create a roster, rejecting duplicate usernames.
    pub fn try_new(records: Vec<ModelRecord>) -> RosterResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert(r.username.as_str()) {
                return Err(RosterError::DuplicateIdentity {
                    username: r.username.clone(),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelRecord> {
        self.records.iter()
    }

    /// Look up a record by username.
    pub fn get(&self, username: &str) -> Option<&ModelRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    /// Usernames in roster order.
    pub fn usernames(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.username.as_str()).collect()
    }

    /// Create a new roster containing only records that match `predicate`.
    ///
    /// Relative order is preserved.
    pub fn filter_records<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&ModelRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self { records }
    }

    /// Reduce (fold) all records into an accumulator value.
    pub fn reduce_records<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &ModelRecord) -> A,
    {
        self.records.iter().fold(init, |acc, r| reducer(acc, r))
    }
}

impl FromIterator<ModelRecord> for Roster {
    fn from_iter<I: IntoIterator<Item = ModelRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a ModelRecord;
    type IntoIter = std::slice::Iter<'a, ModelRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn tier_labels_round_trip_and_rank_in_order() {
        for (i, tier) in RatingTier::ALL.into_iter().enumerate() {
            assert_eq!(RatingTier::from_label(tier.label()), Some(tier));
            assert_eq!(tier.rank(), i);
        }
        assert_eq!(RatingTier::from_label(" s+ "), Some(RatingTier::SPlus));
        assert_eq!(RatingTier::from_label("S+++"), None);
        assert!(RatingTier::SPlusPlus < RatingTier::D);
    }

    #[test]
    fn premium_is_the_s_family() {
        assert!(RatingTier::SPlusPlus.is_premium());
        assert!(RatingTier::S.is_premium());
        assert!(!RatingTier::APlus.is_premium());
        assert!(!RatingTier::D.is_premium());
    }

    #[test]
    fn tier_serializes_with_label() {
        let json = serde_json::to_string(&RatingTier::APlus).unwrap();
        assert_eq!(json, "\"A+\"");
        let back: RatingTier = serde_json::from_str("\"S++\"").unwrap();
        assert_eq!(back, RatingTier::SPlusPlus);
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut r = ModelRecord::new("ada", RatingTier::A, ts());
        assert_eq!(r.display_name(), "ada");
        r.display_name = Some("  ".to_string());
        assert_eq!(r.display_name(), "ada");
        r.display_name = Some("Ada L.".to_string());
        assert_eq!(r.display_name(), "Ada L.");
    }

    #[test]
    fn has_tag_ignores_case() {
        let mut r = ModelRecord::new("ada", RatingTier::A, ts());
        r.tags = vec!["Latina".to_string(), "curvy".to_string()];
        assert!(r.has_tag("latina"));
        assert!(r.has_tag("CURVY"));
        assert!(!r.has_tag("curv"));
    }

    #[test]
    fn pricing_label_parses_rate_and_minimum() {
        assert_eq!(Pricing::parse_label("44/10"), Some((44.0, Some(10))));
        assert_eq!(Pricing::parse_label(" 30 "), Some((30.0, None)));
        assert_eq!(Pricing::parse_label("abc/10"), None);
        assert_eq!(Pricing::parse_label("44/x"), None);
        assert_eq!(Pricing::default().primary_rate(), 0.0);
    }

    #[test]
    fn try_new_rejects_duplicate_usernames() {
        let a = ModelRecord::new("ada", RatingTier::A, ts());
        let b = ModelRecord::new("ada", RatingTier::B, ts());
        let err = Roster::try_new(vec![a, b]).unwrap_err();
        assert!(err.to_string().contains("duplicate identity 'ada'"));
    }

    #[test]
    fn filter_records_preserves_order_and_leaves_source_unchanged() {
        let roster = Roster::new(vec![
            ModelRecord::new("a", RatingTier::S, ts()),
            ModelRecord::new("b", RatingTier::B, ts()),
            ModelRecord::new("c", RatingTier::S, ts()),
        ]);
        let out = roster.filter_records(|r| r.overall() == RatingTier::S);
        assert_eq!(out.usernames(), vec!["a", "c"]);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn reduce_records_folds_in_order() {
        let roster = Roster::new(vec![
            ModelRecord::new("a", RatingTier::S, ts()),
            ModelRecord::new("b", RatingTier::B, ts()),
        ]);
        let joined = roster.reduce_records(String::new(), |mut acc, r| {
            acc.push_str(&r.username);
            acc
        });
        assert_eq!(joined, "ab");
    }
}
