//! Campaign wizard steps and their partial records.
//!
//! ```text
//! Basics ──▶ Details ──▶ Budget ──▶ Review
//! (step1)    (step2)     (step3)    (merge + submit)
//! ```
//!
//! Each of the first three steps owns a disjoint set of campaign fields and
//! is persisted on its own key. [`CampaignDraft`] is the aggregate the review
//! step works with.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FieldError;
use crate::models::{Campaign, DurationMode, ValueRange};
use crate::navigation::Screen;

pub const BASICS_KEY: &str = "campaignStep1";
pub const DETAILS_KEY: &str = "campaignStep2";
pub const BUDGET_KEY: &str = "campaignStep3";

/// Every partial-draft key, in wizard order.
pub const DRAFT_KEYS: [&str; 3] = [BASICS_KEY, DETAILS_KEY, BUDGET_KEY];

pub const DEFAULT_AUDIENCE_RANGE: ValueRange = ValueRange(1_000, 1_000_000);
pub const DEFAULT_BUDGET_RANGE: ValueRange = ValueRange(0, 50_000);

/// Platforms offered by the details step.
pub const PLATFORMS: [&str; 3] = ["Instagram", "TikTok", "YouTube"];

/// Categories offered by the details step.
pub const CATEGORIES: [&str; 10] = [
    "Beauty",
    "Fashion",
    "Lifestyle",
    "Travel",
    "Food",
    "Health",
    "Animals",
    "Makeup",
    "Sport",
    "Content Creation",
];

// =============================================================================
// Wizard Step
// =============================================================================

/// Position in the linear wizard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Basics,
    Details,
    Budget,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [Self::Basics, Self::Details, Self::Budget, Self::Review];

    pub fn next(self) -> Option<WizardStep> {
        match self {
            Self::Basics => Some(Self::Details),
            Self::Details => Some(Self::Budget),
            Self::Budget => Some(Self::Review),
            Self::Review => None,
        }
    }

    pub fn previous(self) -> Option<WizardStep> {
        match self {
            Self::Basics => None,
            Self::Details => Some(Self::Basics),
            Self::Budget => Some(Self::Details),
            Self::Review => Some(Self::Budget),
        }
    }

    /// Storage key of the step's partial record. Review owns none.
    pub fn storage_key(self) -> Option<&'static str> {
        match self {
            Self::Basics => Some(BASICS_KEY),
            Self::Details => Some(DETAILS_KEY),
            Self::Budget => Some(BUDGET_KEY),
            Self::Review => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Details => "details",
            Self::Budget => "budget",
            Self::Review => "review",
        }
    }

    /// Parse a step from its name or its 1-based number.
    pub fn parse(s: &str) -> Option<WizardStep> {
        match s.trim().to_lowercase().as_str() {
            "basics" | "1" => Some(Self::Basics),
            "details" | "2" => Some(Self::Details),
            "budget" | "3" => Some(Self::Budget),
            "review" | "4" => Some(Self::Review),
            _ => None,
        }
    }

    /// Screen that renders this step.
    pub fn screen(self) -> Screen {
        match self {
            Self::Basics => Screen::CampaignBasics,
            Self::Details => Screen::CampaignDetails,
            Self::Budget => Screen::CampaignBudget,
            Self::Review => Screen::CampaignReview,
        }
    }
}

// =============================================================================
// Step Forms
// =============================================================================

/// A partial record owned by one wizard step.
pub trait StepForm: Serialize + DeserializeOwned + Default + Send + Sync {
    const STEP: WizardStep;
    const KEY: &'static str;

    /// Field-level problems that block leaving the step.
    fn validate(&self) -> Vec<FieldError>;
}

/// Step 1: what the campaign is about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicsDraft {
    pub title: String,
    pub description: String,
    pub product: String,
    pub brief_url: String,
    /// Local URI of the uploaded media.
    pub media: String,
}

impl StepForm for BasicsDraft {
    const STEP: WizardStep = WizardStep::Basics;
    const KEY: &'static str = BASICS_KEY;

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Campaign title is required"));
        }
        errors
    }
}

/// Step 2: who the campaign targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailsDraft {
    pub platforms: Vec<String>,
    pub categories: Vec<String>,
    pub audience_range: ValueRange,
    /// Set when the range was typed past the slider maximum.
    pub audience_override: bool,
    pub audience_min: String,
    pub audience_max: String,
    pub location: String,
}

impl Default for DetailsDraft {
    fn default() -> Self {
        Self {
            platforms: Vec::new(),
            categories: Vec::new(),
            audience_range: DEFAULT_AUDIENCE_RANGE,
            audience_override: false,
            audience_min: String::new(),
            audience_max: String::new(),
            location: String::new(),
        }
    }
}

impl DetailsDraft {
    /// Add `platform` if missing, remove it otherwise.
    pub fn toggle_platform(&mut self, platform: &str) {
        toggle_item(&mut self.platforms, platform);
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle_item(&mut self.categories, category);
    }
}

fn toggle_item(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|x| x == item) {
        list.remove(pos);
    } else {
        list.push(item.to_string());
    }
}

impl StepForm for DetailsDraft {
    const STEP: WizardStep = WizardStep::Details;
    const KEY: &'static str = DETAILS_KEY;

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !self.audience_range.is_ordered() {
            errors.push(FieldError::new(
                "audienceRange",
                "Minimum audience must not exceed maximum",
            ));
        }
        errors
    }
}

/// Step 3: money and timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetDraft {
    pub deliverables: String,
    pub budget_range: ValueRange,
    pub budget_min_override: String,
    pub budget_max_override: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_ongoing: bool,
}

impl Default for BudgetDraft {
    fn default() -> Self {
        Self {
            deliverables: String::new(),
            budget_range: DEFAULT_BUDGET_RANGE,
            budget_min_override: String::new(),
            budget_max_override: String::new(),
            start_date: None,
            end_date: None,
            is_ongoing: true,
        }
    }
}

impl StepForm for BudgetDraft {
    const STEP: WizardStep = WizardStep::Budget;
    const KEY: &'static str = BUDGET_KEY;

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !self.budget_range.is_ordered() {
            errors.push(FieldError::new(
                "budgetRange",
                "Minimum budget must not exceed maximum",
            ));
        }
        if !self.is_ongoing {
            match (self.start_date, self.end_date) {
                (None, _) => errors.push(FieldError::new("startDate", "Pick a start date")),
                (Some(_), None) => errors.push(FieldError::new("endDate", "Pick an end date")),
                (Some(start), Some(end)) if end < start => {
                    errors.push(FieldError::new("endDate", "End date must be after the start date"))
                }
                _ => {}
            }
        }
        errors
    }
}

// =============================================================================
// Aggregate
// =============================================================================

/// The three partial records together, as seen by the review step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub basics: BasicsDraft,
    pub details: DetailsDraft,
    pub budget: BudgetDraft,
}

impl CampaignDraft {
    /// Validation errors of every step, in wizard order.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = self.basics.validate();
        errors.extend(self.details.validate());
        errors.extend(self.budget.validate());
        errors
    }

    /// Shallow merge of the three records; later steps win on key conflicts.
    pub fn merged(&self) -> serde_json::Result<Map<String, Value>> {
        let mut merged = Map::new();
        let parts = [
            serde_json::to_value(&self.basics)?,
            serde_json::to_value(&self.details)?,
            serde_json::to_value(&self.budget)?,
        ];
        for part in parts {
            if let Value::Object(fields) = part {
                merged.extend(fields);
            }
        }
        Ok(merged)
    }

    /// The campaign this draft describes, before submission stamping.
    pub fn to_campaign(&self) -> serde_json::Result<Campaign> {
        let mut campaign: Campaign = serde_json::from_value(Value::Object(self.merged()?))?;
        campaign.name = campaign.title.clone();
        campaign.duration = DurationMode::from_ongoing(self.budget.is_ongoing);
        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_step_order_is_linear() {
        let mut step = WizardStep::Basics;
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            assert_eq!(next.previous(), Some(step));
            seen.push(next);
            step = next;
        }
        assert_eq!(seen, WizardStep::ALL.to_vec());
        assert!(WizardStep::Basics.previous().is_none());
    }

    #[test]
    fn test_step_parse() {
        assert_eq!(WizardStep::parse("Details"), Some(WizardStep::Details));
        assert_eq!(WizardStep::parse("3"), Some(WizardStep::Budget));
        assert_eq!(WizardStep::parse("payment"), None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let details: DetailsDraft =
            serde_json::from_value(json!({"platforms": ["Instagram"]})).unwrap();
        assert_eq!(details.platforms, vec!["Instagram"]);
        assert_eq!(details.audience_range, DEFAULT_AUDIENCE_RANGE);

        let budget: BudgetDraft = serde_json::from_value(json!({})).unwrap();
        assert!(budget.is_ongoing);
        assert_eq!(budget.budget_range, DEFAULT_BUDGET_RANGE);
    }

    #[test]
    fn test_basics_requires_title() {
        let errors = BasicsDraft::default().validate();
        assert_eq!(errors, vec![FieldError::new("title", "Campaign title is required")]);

        let ok = BasicsDraft {
            title: "Summer Promo".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn test_budget_fixed_duration_needs_ordered_dates() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();

        let mut budget = BudgetDraft {
            is_ongoing: false,
            ..Default::default()
        };
        assert_eq!(budget.validate()[0].field, "startDate");

        budget.start_date = Some(start);
        assert_eq!(budget.validate()[0].field, "endDate");

        budget.end_date = Some(end);
        assert_eq!(budget.validate()[0].message, "End date must be after the start date");

        budget.end_date = Some(start);
        assert!(budget.validate().is_empty());
    }

    #[test]
    fn test_inverted_ranges_are_rejected() {
        let details = DetailsDraft {
            audience_range: ValueRange(5000, 10),
            ..Default::default()
        };
        assert_eq!(details.validate()[0].field, "audienceRange");

        let budget = BudgetDraft {
            budget_range: ValueRange(100, 1),
            ..Default::default()
        };
        assert_eq!(budget.validate()[0].field, "budgetRange");
    }

    #[test]
    fn test_toggle_platform() {
        let mut details = DetailsDraft::default();
        details.toggle_platform("TikTok");
        details.toggle_platform("Instagram");
        details.toggle_platform("TikTok");
        assert_eq!(details.platforms, vec!["Instagram"]);
    }

    #[test]
    fn test_to_campaign_merges_all_steps() {
        let draft = CampaignDraft {
            basics: BasicsDraft {
                title: "Summer Promo".into(),
                ..Default::default()
            },
            details: DetailsDraft {
                platforms: vec!["Instagram".into()],
                ..Default::default()
            },
            budget: BudgetDraft::default(),
        };

        let campaign = draft.to_campaign().unwrap();
        assert_eq!(campaign.title, "Summer Promo");
        assert_eq!(campaign.name, "Summer Promo");
        assert_eq!(campaign.platforms, vec!["Instagram"]);
        assert_eq!(campaign.budget_range, Some(ValueRange(0, 50_000)));
        assert_eq!(campaign.audience_range, Some(DEFAULT_AUDIENCE_RANGE));
        assert!(campaign.is_ongoing);
        assert_eq!(campaign.duration, DurationMode::UntilPaused);
        // Step-only fields ride along untouched
        assert_eq!(campaign.extra.get("audienceOverride"), Some(&json!(false)));
    }
}
