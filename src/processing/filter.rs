//! Record filtering for [`crate::types::Roster`].
//!
//! A [`Criteria`] is a set of independently optional predicates combined with logical AND.
//! Absent predicates impose no constraint, so `Criteria::default()` is the identity filter.

use serde::{Deserialize, Serialize};

use crate::types::{ModelRecord, RatingTier, Roster};

/// Filter predicates supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    /// Case-insensitive substring matched against username, display name, or any tag.
    /// An empty string is treated as absent.
    pub search: Option<String>,
    /// Exact overall tier.
    pub rating_tier: Option<RatingTier>,
    /// Every listed tag must be present (case-insensitive exact match).
    pub tags: Vec<String>,
    /// Minimum recordings count (inclusive).
    pub min_recordings: Option<u64>,
    /// The record's prospect flag must equal this value.
    pub prospect_only: Option<bool>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_rating_tier(mut self, tier: RatingTier) -> Self {
        self.rating_tier = Some(tier);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_recordings(mut self, min: u64) -> Self {
        self.min_recordings = Some(min);
        self
    }

    pub fn with_prospect(mut self, prospect: bool) -> Self {
        self.prospect_only = Some(prospect);
        self
    }

    /// True if no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.compile().is_identity()
    }

    /// Returns `true` if `record` passes every active predicate.
    ///
    /// Prefer [`filter`] for whole rosters; it case-folds the criteria once.
    pub fn matches(&self, record: &ModelRecord) -> bool {
        self.compile().matches(record)
    }

    pub(crate) fn compile(&self) -> CompiledCriteria {
        CompiledCriteria {
            search: self
                .search
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            rating_tier: self.rating_tier,
            tags: self.tags.iter().map(|t| t.to_lowercase()).collect(),
            min_recordings: self.min_recordings,
            prospect_only: self.prospect_only,
        }
    }
}

/// [`Criteria`] with search text and tags case-folded up front.
#[derive(Debug, Clone)]
pub(crate) struct CompiledCriteria {
    search: Option<String>,
    rating_tier: Option<RatingTier>,
    tags: Vec<String>,
    min_recordings: Option<u64>,
    prospect_only: Option<bool>,
}

impl CompiledCriteria {
    pub(crate) fn is_identity(&self) -> bool {
        self.search.is_none()
            && self.rating_tier.is_none()
            && self.tags.is_empty()
            && self.min_recordings.is_none()
            && self.prospect_only.is_none()
    }

    /// Evaluates the cheap scalar predicates first and stops at the first failure.
    pub(crate) fn matches(&self, record: &ModelRecord) -> bool {
        if let Some(tier) = self.rating_tier {
            if record.ratings.overall != tier {
                return false;
            }
        }
        if let Some(min) = self.min_recordings {
            if record.recordings < min {
                return false;
            }
        }
        if let Some(prospect) = self.prospect_only {
            if record.prospect != prospect {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            if !matches_search(record, needle) {
                return false;
            }
        }
        if !self.tags.is_empty() {
            let have: Vec<String> = record.tags.iter().map(|t| t.to_lowercase()).collect();
            if !self.tags.iter().all(|wanted| have.iter().any(|t| t == wanted)) {
                return false;
            }
        }
        true
    }
}

fn matches_search(record: &ModelRecord, needle: &str) -> bool {
    record.username.to_lowercase().contains(needle)
        || record.display_name().to_lowercase().contains(needle)
        || record.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Returns a new [`Roster`] containing only records that pass `criteria`, in original order.
pub fn filter(roster: &Roster, criteria: &Criteria) -> Roster {
    let compiled = criteria.compile();
    if compiled.is_identity() {
        return roster.clone();
    }
    roster.filter_records(|r| compiled.matches(r))
}
