//! Lenient parsing of catalog query parameters into [`Criteria`] and [`SortSpec`].
//!
//! Recognized keys: `search`, `rating`, `tags` (comma-separated), `minRecs`, `prospect`,
//! `sort`, `order`. Pagination keys (`limit`, `offset`, `page`) and unknown keys are ignored.
//! A malformed value drops that predicate (or falls back to the default sort) and is reported
//! in [`ParsedQuery::fallbacks`].

use super::fallback::{FallbackCounts, FallbackKind};
use super::filter::Criteria;
use super::sort::{SortDirection, SortKey, SortSpec};
use crate::types::RatingTier;

/// Result of [`parse_query`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub criteria: Criteria,
    pub sort: SortSpec,
    pub fallbacks: FallbackCounts,
    /// Keys whose values could not be parsed.
    pub rejected: Vec<String>,
}

/// Parse `(key, value)` query pairs. Later duplicates of a key override earlier ones.
pub fn parse_query<'a, I>(pairs: I) -> ParsedQuery
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = ParsedQuery::default();
    let mut sort_key: Option<&str> = None;
    let mut order: Option<&str> = None;

    for (key, value) in pairs {
        let value = value.trim();
        match key {
            "search" => {
                out.criteria.search = if value.is_empty() { None } else { Some(value.to_string()) };
            }
            "rating" => match RatingTier::from_label(value) {
                Some(tier) => out.criteria.rating_tier = Some(tier),
                None => {
                    out.criteria.rating_tier = None;
                    if !value.is_empty() {
                        out.fallbacks.record(FallbackKind::UnknownTierLabel);
                        out.rejected.push(key.to_string());
                    }
                }
            },
            "tags" => {
                out.criteria.tags = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "minRecs" => match value.parse::<u64>() {
                Ok(n) => out.criteria.min_recordings = Some(n),
                Err(_) => {
                    out.criteria.min_recordings = None;
                    out.rejected.push(key.to_string());
                }
            },
            "prospect" => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => out.criteria.prospect_only = Some(true),
                "false" | "0" => out.criteria.prospect_only = Some(false),
                _ => {
                    out.criteria.prospect_only = None;
                    out.rejected.push(key.to_string());
                }
            },
            "sort" => sort_key = Some(value),
            "order" => order = Some(value),
            _ => {}
        }
    }

    let (sort, sort_fallbacks) = parse_sort(sort_key, order);
    out.sort = sort;
    for kind in FallbackKind::ALL {
        out.fallbacks.add(kind, sort_fallbacks.get(kind));
    }
    out
}

/// Resolve a sort key and direction, substituting defaults for anything unrecognized.
///
/// An unrecognized key resets both key and direction to rating/descending.
pub fn parse_sort(key: Option<&str>, direction: Option<&str>) -> (SortSpec, FallbackCounts) {
    let mut fallbacks = FallbackCounts::new();

    let key = match key {
        None => SortKey::default(),
        Some(label) => match SortKey::from_label(label) {
            Some(k) => k,
            None => {
                fallbacks.record(FallbackKind::UnrecognizedSortKey);
                return (SortSpec::default(), fallbacks);
            }
        },
    };

    let direction = match direction {
        None => SortDirection::default(),
        Some(label) => SortDirection::from_label(label).unwrap_or_else(|| {
            fallbacks.record(FallbackKind::UnrecognizedDirection);
            SortDirection::default()
        }),
    };

    (SortSpec::new(key, direction), fallbacks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_recognized_key() {
        let q = parse_query([
            ("search", " luna "),
            ("rating", "S+"),
            ("tags", "latina, petite,,"),
            ("minRecs", "3"),
            ("prospect", "true"),
            ("sort", "recs"),
            ("order", "asc"),
            ("limit", "50"),
        ]);
        assert_eq!(q.criteria.search.as_deref(), Some("luna"));
        assert_eq!(q.criteria.rating_tier, Some(RatingTier::SPlus));
        assert_eq!(q.criteria.tags, vec!["latina", "petite"]);
        assert_eq!(q.criteria.min_recordings, Some(3));
        assert_eq!(q.criteria.prospect_only, Some(true));
        assert_eq!(q.sort, SortSpec::ascending(SortKey::Recordings));
        assert_eq!(q.fallbacks.total(), 0);
        assert!(q.rejected.is_empty());
    }

    #[test]
    fn empty_query_is_identity_with_default_sort() {
        let q = parse_query(std::iter::empty());
        assert!(q.criteria.is_empty());
        assert_eq!(q.sort, SortSpec::default());
    }

    #[test]
    fn malformed_values_are_dropped_and_reported() {
        let q = parse_query([("rating", "SSS"), ("minRecs", "-2"), ("prospect", "maybe")]);
        assert!(q.criteria.is_empty());
        assert_eq!(q.fallbacks.get(FallbackKind::UnknownTierLabel), 1);
        assert_eq!(q.rejected, vec!["rating", "minRecs", "prospect"]);
    }

    #[test]
    fn unrecognized_sort_key_falls_back_to_rating_descending() {
        let (spec, fb) = parse_sort(Some("spent"), Some("asc"));
        assert_eq!(spec, SortSpec::default());
        assert_eq!(fb.get(FallbackKind::UnrecognizedSortKey), 1);

        let (spec, fb) = parse_sort(Some("price"), Some("up"));
        assert_eq!(spec, SortSpec::descending(SortKey::Price));
        assert_eq!(fb.get(FallbackKind::UnrecognizedDirection), 1);
    }
}
