//! Domain models shared across the catalog, wishlist and campaign modules.
//!
//! - [`Influencer`] - Read-only catalog entry
//! - [`ValueRange`] - Inclusive `[min, max]` pair, serialized as a JSON array
//! - [`CampaignStatus`] - `Draft → Active → Completed`
//! - [`DurationMode`] - Fixed dates or running until paused
//! - [`Campaign`] - A submitted campaign as persisted under `campaigns`

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Influencer
// =============================================================================

static NON_DIGITS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^\d]").ok());

/// An influencer profile from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Influencer {
    pub id: String,
    pub name: String,
    /// Profile picture URL.
    pub image: String,
    /// Display string of `|`-separated tags, e.g. `"Beauty | UGC"`.
    pub category: String,
    /// Display string, e.g. `"From R2000"`.
    pub rate: String,
    /// Follower count.
    pub audience: u64,
    pub location: String,
}

impl Influencer {
    /// Numeric rate extracted from the display string.
    ///
    /// All digits are concatenated (`"From R2000"` → `2000`). Returns `None`
    /// when the string carries no digits.
    pub fn rate_amount(&self) -> Option<u64> {
        NON_DIGITS
            .as_ref()
            .map(|re| re.replace_all(&self.rate, "").to_string())
            .and_then(|digits| digits.parse::<u64>().ok())
    }

    /// Individual category tags, trimmed.
    pub fn tags(&self) -> Vec<&str> {
        self.category
            .split('|')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

// =============================================================================
// Value Range
// =============================================================================

/// Inclusive numeric range stored as `[min, max]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueRange(pub u64, pub u64);

impl ValueRange {
    pub fn min(&self) -> u64 {
        self.0
    }

    pub fn max(&self) -> u64 {
        self.1
    }

    pub fn is_ordered(&self) -> bool {
        self.0 <= self.1
    }
}

// =============================================================================
// Campaign Status
// =============================================================================

/// Lifecycle of a campaign. Transitions only move forward.
///
/// `Draft` exists for stored records that predate submission stamping; no
/// code path assigns it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl CampaignStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Active => 1,
            Self::Completed => 2,
        }
    }

    /// Whether moving from `self` to `next` respects the forward-only order.
    pub fn can_transition_to(self, next: CampaignStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

// =============================================================================
// Duration Mode
// =============================================================================

/// How long a campaign runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DurationMode {
    /// Runs between a start and an end date.
    Fixed,
    /// Runs until the brand ends it.
    #[default]
    UntilPaused,
}

impl DurationMode {
    pub fn from_ongoing(is_ongoing: bool) -> Self {
        if is_ongoing {
            Self::UntilPaused
        } else {
            Self::Fixed
        }
    }
}

// =============================================================================
// Campaign
// =============================================================================

/// A submitted campaign.
///
/// Fields written by other clients and unknown to this crate are kept in
/// `extra` so a read-map-write cycle does not drop them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Display name, initialised from the title and editable afterwards.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub media: String,
    #[serde(default)]
    pub brief_url: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_range: Option<ValueRange>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub deliverables: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<ValueRange>,
    #[serde(default)]
    pub duration: DurationMode,
    #[serde(default)]
    pub is_ongoing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub committed: u64,
    #[serde(default)]
    pub influencers: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Campaign {
    /// Creation time in milliseconds since the epoch; missing or unparsable
    /// timestamps sort as epoch 0.
    pub fn created_at_millis(&self) -> i64 {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0)
    }

    /// Name to display in lists: the edited name, else the title.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.title
        } else {
            &self.name
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(rate: &str) -> Influencer {
        Influencer {
            id: "1".into(),
            name: "John Doe".into(),
            image: String::new(),
            category: "Fashion | Lifestyle".into(),
            rate: rate.into(),
            audience: 30000,
            location: "Cape Town".into(),
        }
    }

    #[test]
    fn test_rate_amount_strips_non_digits() {
        assert_eq!(sample("From R2000").rate_amount(), Some(2000));
        assert_eq!(sample("R 1,500").rate_amount(), Some(1500));
        assert_eq!(sample("On request").rate_amount(), None);
    }

    #[test]
    fn test_tags_split_on_pipe() {
        assert_eq!(sample("R1").tags(), vec!["Fashion", "Lifestyle"]);
    }

    #[test]
    fn test_status_is_forward_only() {
        assert!(CampaignStatus::Draft.can_transition_to(CampaignStatus::Active));
        assert!(CampaignStatus::Active.can_transition_to(CampaignStatus::Completed));
        assert!(CampaignStatus::Draft.can_transition_to(CampaignStatus::Completed));
        assert!(!CampaignStatus::Completed.can_transition_to(CampaignStatus::Active));
        assert!(!CampaignStatus::Active.can_transition_to(CampaignStatus::Active));
    }

    #[test]
    fn test_campaign_keeps_unknown_fields() {
        let raw = json!({
            "id": "c1",
            "title": "Launch",
            "status": "Active",
            "budgetRange": [0, 50000],
            "niche": "Beauty"
        });
        let campaign: Campaign = serde_json::from_value(raw).unwrap();
        assert_eq!(campaign.budget_range, Some(ValueRange(0, 50000)));
        assert_eq!(campaign.extra.get("niche"), Some(&json!("Beauty")));

        let back = serde_json::to_value(&campaign).unwrap();
        assert_eq!(back["niche"], "Beauty");
        assert_eq!(back["budgetRange"], json!([0, 50000]));
    }

    #[test]
    fn test_created_at_missing_sorts_as_epoch() {
        let mut campaign = Campaign::default();
        assert_eq!(campaign.created_at_millis(), 0);
        campaign.created_at = Some("not a date".into());
        assert_eq!(campaign.created_at_millis(), 0);
        campaign.created_at = Some("2024-03-01T10:00:00.000Z".into());
        assert!(campaign.created_at_millis() > 0);
    }

    #[test]
    fn test_duration_mode_serialization() {
        assert_eq!(
            serde_json::to_value(DurationMode::UntilPaused).unwrap(),
            json!("untilPaused")
        );
        assert_eq!(DurationMode::from_ongoing(false), DurationMode::Fixed);
    }
}
