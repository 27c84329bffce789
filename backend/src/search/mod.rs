//! Catalog search and filtering.
//!
//! An influencer matches when every predicate holds:
//!
//! | Predicate | Field tested | Unset when |
//! |-----------|--------------|------------|
//! | query     | name or category contains query | query is blank |
//! | category  | category contains chip / filter | no chip (or `"All"`) and no filter |
//! | location  | location contains filter | filter is blank |
//! | rate      | numeric rate in `[min, max]` | no range |
//! | audience  | audience in `[min, max]` | no range |
//!
//! Text matching is case-insensitive substring matching. A range without a
//! `max` is unbounded above. Platforms are accepted but do not narrow results
//! because the catalog carries no platform data.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::FieldError;
use crate::models::Influencer;

/// Chip value that means "no category".
pub const ALL_CATEGORIES: &str = "All";

/// Number of remembered searches.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Numeric bound used by rate and audience filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: u64,
    #[serde(default)]
    pub max: Option<u64>,
}

impl Bounds {
    pub fn new(min: u64, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// Filter object built by the filter sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_range: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_range: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
}

impl FilterCriteria {
    /// Range warnings that keep the criteria from being applied.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let ranges = [("rateRange", self.rate_range), ("audienceRange", self.audience_range)];
        for (field, range) in ranges {
            if let Some(Bounds { min, max: Some(max) }) = range {
                if min > max {
                    errors.push(FieldError::new(field, "Minimum must not exceed maximum"));
                }
            }
        }
        errors
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Non-blank text filter, trimmed.
fn active(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Whether `influencer` passes every predicate.
pub fn matches(
    influencer: &Influencer,
    query: &str,
    chip: Option<&str>,
    criteria: &FilterCriteria,
) -> bool {
    let matches_query = match active(Some(query)) {
        None => true,
        Some(q) => contains_ci(&influencer.name, q) || contains_ci(&influencer.category, q),
    };

    let chip = active(chip).filter(|c| *c != ALL_CATEGORIES);
    let matches_chip = chip.map_or(true, |c| contains_ci(&influencer.category, c));
    let matches_category = active(criteria.category.as_deref())
        .map_or(true, |c| contains_ci(&influencer.category, c));

    let matches_location = active(criteria.location.as_deref())
        .map_or(true, |l| contains_ci(&influencer.location, l));

    let matches_rate = criteria.rate_range.map_or(true, |range| {
        influencer.rate_amount().is_some_and(|rate| range.contains(rate))
    });

    let matches_audience = criteria
        .audience_range
        .map_or(true, |range| range.contains(influencer.audience));

    matches_query
        && matches_chip
        && matches_category
        && matches_location
        && matches_rate
        && matches_audience
}

/// Filter the catalog, preserving catalog order.
pub fn filter_influencers<'a>(
    influencers: &'a [Influencer],
    query: &str,
    chip: Option<&str>,
    criteria: &FilterCriteria,
) -> Vec<&'a Influencer> {
    influencers
        .iter()
        .filter(|i| matches(i, query, chip, criteria))
        .collect()
}

/// Most-recent-first list of submitted queries, without duplicates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecentSearches {
    entries: VecDeque<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted query. Blank queries are ignored.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|q| q != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}
