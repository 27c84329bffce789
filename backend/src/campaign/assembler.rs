//! Campaign draft assembler - drives the four-step wizard over storage.
//!
//! Each step autosaves its own partial record. Review loads all three,
//! merges them, and submission stamps the result, prepends it to the
//! campaign list and clears the partial records.

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::draft::{
    BasicsDraft, BudgetDraft, CampaignDraft, DetailsDraft, StepForm, WizardStep, DRAFT_KEYS,
};
use super::repository::CampaignRepository;
use crate::api::logs::{log_error, log_success, log_warning};
use crate::error::{DraftError, DraftResult};
use crate::models::{Campaign, CampaignStatus};
use crate::storage::{load_json, save_json, KeyValueStore};

/// Wizard state persisted through an injected key-value store.
#[derive(Clone)]
pub struct DraftAssembler {
    store: Arc<dyn KeyValueStore>,
    campaigns: CampaignRepository,
}

impl DraftAssembler {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let campaigns = CampaignRepository::new(store.clone());
        Self { store, campaigns }
    }

    pub fn campaigns(&self) -> &CampaignRepository {
        &self.campaigns
    }

    /// The step's saved record, or its defaults when absent or unreadable.
    pub async fn load<F: StepForm>(&self) -> F {
        match load_json::<F, _>(self.store.as_ref(), F::KEY).await {
            Ok(Some(form)) => form,
            Ok(None) => F::default(),
            Err(e) => {
                log_warning(
                    "draft",
                    format!("Could not read {} draft, starting fresh: {}", F::STEP.name(), e),
                );
                F::default()
            }
        }
    }

    /// Overwrite the step's saved record.
    pub async fn save<F: StepForm>(&self, form: &F) -> DraftResult<()> {
        save_json(self.store.as_ref(), F::KEY, form)
            .await
            .map_err(|e| {
                log_error("draft", format!("Failed to save {} draft: {}", F::STEP.name(), e));
                DraftError::from(e)
            })
    }

    /// Load a step's record as JSON. Review returns the merged campaign.
    pub async fn load_value(&self, step: WizardStep) -> Value {
        let value = match step {
            WizardStep::Basics => serde_json::to_value(self.load::<BasicsDraft>().await),
            WizardStep::Details => serde_json::to_value(self.load::<DetailsDraft>().await),
            WizardStep::Budget => serde_json::to_value(self.load::<BudgetDraft>().await),
            WizardStep::Review => self
                .review()
                .await
                .to_campaign()
                .and_then(serde_json::to_value),
        };
        value.unwrap_or(Value::Null)
    }

    /// Replace a step's record from JSON; missing fields take their defaults.
    pub async fn save_value(&self, step: WizardStep, value: Value) -> DraftResult<Value> {
        async fn typed<F: StepForm>(
            assembler: &DraftAssembler,
            value: Value,
        ) -> DraftResult<Value> {
            let form: F = serde_json::from_value(value)?;
            assembler.save(&form).await?;
            Ok(serde_json::to_value(&form)?)
        }

        match step {
            WizardStep::Basics => typed::<BasicsDraft>(self, value).await,
            WizardStep::Details => typed::<DetailsDraft>(self, value).await,
            WizardStep::Budget => typed::<BudgetDraft>(self, value).await,
            WizardStep::Review => Err(DraftError::UnknownStep(step.name().to_string())),
        }
    }

    /// Validate the step's saved record and return the step to show next.
    ///
    /// Leaving review re-validates every step and stays on review.
    pub async fn advance(&self, step: WizardStep) -> DraftResult<WizardStep> {
        let errors = match step {
            WizardStep::Basics => self.load::<BasicsDraft>().await.validate(),
            WizardStep::Details => self.load::<DetailsDraft>().await.validate(),
            WizardStep::Budget => self.load::<BudgetDraft>().await.validate(),
            WizardStep::Review => self.review().await.validate(),
        };
        if !errors.is_empty() {
            return Err(DraftError::Invalid(errors));
        }
        Ok(step.next().unwrap_or(WizardStep::Review))
    }

    /// All three partial records.
    pub async fn review(&self) -> CampaignDraft {
        CampaignDraft {
            basics: self.load().await,
            details: self.load().await,
            budget: self.load().await,
        }
    }

    /// Turn the current draft into an active campaign.
    pub async fn submit(&self) -> DraftResult<Campaign> {
        let draft = self.review().await;
        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(DraftError::Invalid(errors));
        }

        let mut campaign = draft.to_campaign()?;
        campaign.id = Uuid::new_v4().to_string();
        campaign.created_at = Some(Utc::now().to_rfc3339());
        campaign.status = CampaignStatus::Active;
        campaign.committed = 0;
        campaign.influencers = Vec::new();

        self.campaigns
            .prepend(campaign.clone())
            .await
            .map_err(|e| {
                log_error("draft", format!("Error saving campaign: {}", e));
                DraftError::from(e)
            })?;

        if let Err(e) = self.store.multi_remove(&DRAFT_KEYS).await {
            // The campaign is saved; a stale draft only pre-fills the next wizard run.
            log_warning("draft", format!("Campaign saved but draft not cleared: {}", e));
        }

        log_success("draft", format!("Campaign '{}' created ({})", campaign.title, campaign.id));
        Ok(campaign)
    }

    /// Discard all partial records.
    pub async fn clear(&self) -> DraftResult<()> {
        self.store.multi_remove(&DRAFT_KEYS).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DurationMode, ValueRange};
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn assembler() -> (Arc<MemoryStore>, DraftAssembler) {
        let store = Arc::new(MemoryStore::new());
        let assembler = DraftAssembler::new(store.clone());
        (store, assembler)
    }

    #[tokio::test]
    async fn test_load_falls_back_to_defaults() {
        let (store, assembler) = assembler();
        assert_eq!(assembler.load::<BudgetDraft>().await, BudgetDraft::default());

        store.set("campaignStep2", "{broken").await.unwrap();
        assert_eq!(assembler.load::<DetailsDraft>().await, DetailsDraft::default());
    }

    #[tokio::test]
    async fn test_advance_blocks_on_invalid_step() {
        let (_, assembler) = assembler();
        match assembler.advance(WizardStep::Basics).await {
            Err(DraftError::Invalid(errors)) => assert_eq!(errors[0].field, "title"),
            other => panic!("expected validation error, got {:?}", other),
        }

        assembler
            .save_value(WizardStep::Basics, json!({"title": "Summer Promo"}))
            .await
            .unwrap();
        assert_eq!(assembler.advance(WizardStep::Basics).await.unwrap(), WizardStep::Details);
        assert_eq!(assembler.advance(WizardStep::Details).await.unwrap(), WizardStep::Budget);
        assert_eq!(assembler.advance(WizardStep::Budget).await.unwrap(), WizardStep::Review);
    }

    #[tokio::test]
    async fn test_wizard_end_to_end() {
        let (store, assembler) = assembler();
        assembler
            .save_value(WizardStep::Basics, json!({"title": "Summer Promo"}))
            .await
            .unwrap();
        assembler
            .save_value(WizardStep::Details, json!({"platforms": ["Instagram"]}))
            .await
            .unwrap();
        assembler
            .save_value(
                WizardStep::Budget,
                json!({"budgetRange": [0, 50000], "isOngoing": true}),
            )
            .await
            .unwrap();

        let created = assembler.submit().await.unwrap();
        assert!(!created.id.is_empty());

        let raw = store.get("campaigns").await.unwrap().unwrap();
        let stored: Value = serde_json::from_str(&raw).unwrap();
        let head = &stored[0];
        assert_eq!(head["status"], "Active");
        assert_eq!(head["committed"], 0);
        assert_eq!(head["influencers"], json!([]));
        assert_eq!(head["title"], "Summer Promo");
        assert_eq!(head["platforms"], json!(["Instagram"]));
        assert_eq!(head["budgetRange"], json!([0, 50000]));
        assert_eq!(head["isOngoing"], true);
        assert!(head["createdAt"].as_str().is_some());

        for key in DRAFT_KEYS {
            assert_eq!(store.get(key).await.unwrap(), None);
        }

        let listed = assembler.campaigns().list().await;
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].duration, DurationMode::UntilPaused);
        assert_eq!(listed[0].budget_range, Some(ValueRange(0, 50_000)));
    }

    #[tokio::test]
    async fn test_submit_prepends_to_existing_list() {
        let (_, assembler) = assembler();
        for title in ["First", "Second"] {
            assembler
                .save_value(WizardStep::Basics, json!({ "title": title }))
                .await
                .unwrap();
            assembler.submit().await.unwrap();
        }
        let stored = assembler.campaigns().load_all().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title, "Second");
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_draft() {
        let (store, assembler) = assembler();
        assert!(matches!(assembler.submit().await, Err(DraftError::Invalid(_))));
        assert_eq!(store.get("campaigns").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_submit_does_not_overwrite_corrupt_list() {
        let (store, assembler) = assembler();
        store.set("campaigns", "garbage").await.unwrap();
        assembler
            .save_value(WizardStep::Basics, json!({"title": "Promo"}))
            .await
            .unwrap();

        assert!(matches!(assembler.submit().await, Err(DraftError::Campaign(_))));
        assert_eq!(store.get("campaigns").await.unwrap().as_deref(), Some("garbage"));
        assert!(store.get("campaignStep1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_review_value_is_merged_campaign() {
        let (_, assembler) = assembler();
        assembler
            .save_value(WizardStep::Basics, json!({"title": "Promo", "product": "Kit"}))
            .await
            .unwrap();
        assembler
            .save_value(WizardStep::Details, json!({"location": "Durban"}))
            .await
            .unwrap();

        let review = assembler.load_value(WizardStep::Review).await;
        assert_eq!(review["product"], "Kit");
        assert_eq!(review["location"], "Durban");
        assert_eq!(review["duration"], "untilPaused");
    }

    #[tokio::test]
    async fn test_save_value_rejects_wrong_shape() {
        let (_, assembler) = assembler();
        let result = assembler
            .save_value(WizardStep::Details, json!({"platforms": "Instagram"}))
            .await;
        assert!(matches!(result, Err(DraftError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_save_value_rejects_review() {
        let (_, assembler) = assembler();
        let result = assembler.save_value(WizardStep::Review, json!({})).await;
        assert!(matches!(result, Err(DraftError::UnknownStep(_))));
    }

    #[tokio::test]
    async fn test_clear_removes_partial_records() {
        let (store, assembler) = assembler();
        assembler
            .save_value(WizardStep::Budget, json!({"deliverables": "3 reels"}))
            .await
            .unwrap();
        assembler.clear().await.unwrap();
        assert_eq!(store.get("campaignStep3").await.unwrap(), None);
    }
}
