//! Stable ordering of a [`crate::types::Roster`] by a selectable key.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::rating::RatingScale;
use crate::types::{ModelRecord, Roster};

/// Sort key. Each variant carries its own ascending comparator (see [`SortKey::compare`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Overall tier score.
    #[default]
    Rating,
    /// Display name, falling back to username.
    Name,
    /// `addedAt`; records without one sort as the Unix epoch.
    Recent,
    /// Primary rate; an absent rate counts as `0`.
    Price,
    /// Recordings count.
    Recordings,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Rating,
        SortKey::Name,
        SortKey::Recent,
        SortKey::Price,
        SortKey::Recordings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Name => "name",
            SortKey::Recent => "recent",
            SortKey::Price => "price",
            SortKey::Recordings => "recordings",
        }
    }

    /// Parse a key label (case-insensitive). Accepts the aliases `overall`, `added`, and `recs`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "rating" | "overall" => Some(SortKey::Rating),
            "name" => Some(SortKey::Name),
            "recent" | "added" => Some(SortKey::Recent),
            "price" => Some(SortKey::Price),
            "recordings" | "recs" => Some(SortKey::Recordings),
            _ => None,
        }
    }

    /// Ascending comparison of two records under this key.
    pub fn compare(self, a: &ModelRecord, b: &ModelRecord, scale: &RatingScale) -> Ordering {
        match self {
            SortKey::Rating => scale.score_of(a.overall()).cmp(&scale.score_of(b.overall())),
            SortKey::Name => compare_names(a.display_name(), b.display_name()),
            SortKey::Recent => added_millis(a).cmp(&added_millis(b)),
            SortKey::Price => a.pricing.primary_rate().total_cmp(&b.pricing.primary_rate()),
            SortKey::Recordings => a.recordings.cmp(&b.recordings),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Parse `asc`/`ascending` or `desc`/`descending` (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    /// Orient an ascending comparison. Descending negates the result, so ties stay `Equal`.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Key and direction together. The default is rating, descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Descending)
    }
}

/// Collation order for display names: base letters first (accents and case ignored), then
/// accents, then case, then raw code points.
fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Canonically decomposed, combining marks stripped, lowercased: `"Élodie"` becomes `"elodie"`.
fn base_letters(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn added_millis(r: &ModelRecord) -> i64 {
    r.added_at.map(|t| t.timestamp_millis()).unwrap_or(0)
}

/// Returns a new [`Roster`] ordered by `key` in `direction` on the default rating scale.
///
/// The sort is stable in both directions: records that compare equal keep their input order.
pub fn sort(roster: &Roster, key: SortKey, direction: SortDirection) -> Roster {
    sort_with(roster, SortSpec::new(key, direction), &RatingScale::default())
}

/// Like [`sort`], with an explicit [`SortSpec`] and rating scale.
pub fn sort_with(roster: &Roster, spec: SortSpec, scale: &RatingScale) -> Roster {
    let mut records = roster.records.clone();
    records.sort_by(|a, b| spec.direction.apply(spec.key.compare(a, b, scale)));
    Roster::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pricing, RatingTier};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn record(username: &str, tier: RatingTier, rate: Option<f64>) -> ModelRecord {
        let mut r = ModelRecord::new(username, tier, ts(1));
        if let Some(rate) = rate {
            r.pricing = Pricing::with_rate(rate);
        }
        r
    }

    #[test]
    fn price_ascending_orders_by_rate() {
        let roster = Roster::new(vec![
            record("a", RatingTier::S, Some(20.0)),
            record("b", RatingTier::A, Some(40.0)),
            record("c", RatingTier::B, Some(10.0)),
        ]);
        let out = sort(&roster, SortKey::Price, SortDirection::Ascending);
        assert_eq!(out.usernames(), vec!["c", "a", "b"]);
        // Input untouched.
        assert_eq!(roster.usernames(), vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_price_sorts_as_zero() {
        let roster = Roster::new(vec![
            record("a", RatingTier::S, Some(5.0)),
            record("b", RatingTier::A, None),
        ]);
        let out = sort(&roster, SortKey::Price, SortDirection::Ascending);
        assert_eq!(out.usernames(), vec!["b", "a"]);
    }

    #[test]
    fn rating_descending_puts_best_first() {
        let roster = Roster::new(vec![
            record("b", RatingTier::B, None),
            record("spp", RatingTier::SPlusPlus, None),
            record("a", RatingTier::A, None),
        ]);
        let out = sort(&roster, SortKey::Rating, SortDirection::Descending);
        assert_eq!(out.usernames(), vec!["spp", "a", "b"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let roster = Roster::new(vec![
            record("s1", RatingTier::S, None),
            record("a1", RatingTier::A, None),
            record("s2", RatingTier::S, None),
            record("a2", RatingTier::A, None),
        ]);
        let desc = sort(&roster, SortKey::Rating, SortDirection::Descending);
        assert_eq!(desc.usernames(), vec!["s1", "s2", "a1", "a2"]);
        let asc = sort(&roster, SortKey::Rating, SortDirection::Ascending);
        assert_eq!(asc.usernames(), vec!["a1", "a2", "s1", "s2"]);
    }

    #[test]
    fn sort_is_a_fixed_point_once_sorted() {
        let roster = Roster::new(vec![
            record("x", RatingTier::C, Some(3.0)),
            record("y", RatingTier::S, Some(3.0)),
            record("z", RatingTier::A, Some(1.0)),
        ]);
        for key in SortKey::ALL {
            for dir in [SortDirection::Ascending, SortDirection::Descending] {
                let once = sort(&roster, key, dir);
                assert_eq!(sort(&once, key, dir), once, "key={key} dir={dir:?}");
            }
        }
    }

    #[test]
    fn name_uses_display_name_case_insensitively() {
        let mut bravo = record("zz_user", RatingTier::A, None);
        bravo.display_name = Some("bravo".to_string());
        let roster = Roster::new(vec![
            record("Charlie", RatingTier::A, None),
            bravo,
            record("alpha", RatingTier::A, None),
        ]);
        let out = sort(&roster, SortKey::Name, SortDirection::Ascending);
        assert_eq!(out.usernames(), vec!["alpha", "zz_user", "Charlie"]);
    }

    #[test]
    fn name_collates_accented_letters_with_their_base_letter() {
        let roster = Roster::new(
            ["Zoe", "Ámbar", "Bree", "Élodie"]
                .into_iter()
                .map(|n| record(n, RatingTier::A, None))
                .collect(),
        );
        let asc = sort(&roster, SortKey::Name, SortDirection::Ascending);
        assert_eq!(asc.usernames(), vec!["Ámbar", "Bree", "Élodie", "Zoe"]);
        let desc = sort(&roster, SortKey::Name, SortDirection::Descending);
        assert_eq!(desc.usernames(), vec!["Zoe", "Élodie", "Bree", "Ámbar"]);
    }

    #[test]
    fn name_breaks_base_letter_ties_by_accent_then_case() {
        assert_eq!(compare_names("elodie", "Élodie"), Ordering::Less);
        assert_eq!(compare_names("Elodie", "elodie"), Ordering::Less);
        assert_eq!(compare_names("Élodie", "Élodie"), Ordering::Equal);
        // Precomposed and decomposed forms share a base key.
        assert_eq!(base_letters("E\u{301}lodie"), base_letters("Élodie"));
    }

    #[test]
    fn price_ties_keep_input_order_including_signed_zero() {
        let roster = Roster::new(vec![
            record("zero", RatingTier::A, Some(0.0)),
            record("neg_zero", RatingTier::B, Some(-0.0)),
            record("absent", RatingTier::C, None),
            record("ten", RatingTier::D, Some(10.0)),
            record("ten_again", RatingTier::S, Some(10.0)),
        ]);
        let asc = sort(&roster, SortKey::Price, SortDirection::Ascending);
        assert_eq!(asc.usernames(), vec!["zero", "neg_zero", "absent", "ten", "ten_again"]);
        let desc = sort(&roster, SortKey::Price, SortDirection::Descending);
        assert_eq!(desc.usernames(), vec!["ten", "ten_again", "zero", "neg_zero", "absent"]);
    }

    #[test]
    fn recent_treats_missing_added_at_as_oldest() {
        let mut old = record("old", RatingTier::A, None);
        old.added_at = Some(ts(2));
        let mut new = record("new", RatingTier::A, None);
        new.added_at = Some(ts(20));
        let none = record("none", RatingTier::A, None);
        let roster = Roster::new(vec![old, none, new]);
        let out = sort(&roster, SortKey::Recent, SortDirection::Descending);
        assert_eq!(out.usernames(), vec!["new", "old", "none"]);
    }

    #[test]
    fn recordings_key() {
        let mut a = record("a", RatingTier::A, None);
        a.recordings = 4;
        let mut b = record("b", RatingTier::A, None);
        b.recordings = 9;
        let out = sort(&Roster::new(vec![a, b]), SortKey::Recordings, SortDirection::Descending);
        assert_eq!(out.usernames(), vec!["b", "a"]);
    }

    #[test]
    fn labels_and_aliases_parse() {
        assert_eq!(SortKey::from_label("overall"), Some(SortKey::Rating));
        assert_eq!(SortKey::from_label("RECS"), Some(SortKey::Recordings));
        assert_eq!(SortKey::from_label("added"), Some(SortKey::Recent));
        assert_eq!(SortKey::from_label("spent"), None);
        assert_eq!(SortDirection::from_label("asc"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::from_label("sideways"), None);
        assert_eq!(SortSpec::default(), SortSpec::descending(SortKey::Rating));
    }
}
