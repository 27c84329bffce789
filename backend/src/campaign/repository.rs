//! Persisted campaign list.
//!
//! The whole list lives under one key. Mutations read the entire array, map
//! the matching record and write the entire array back; concurrent writers
//! race and the last one wins.
//!
//! Records are decoded one at a time. A record this crate cannot read is
//! skipped in listings and written back untouched, so one bad entry never
//! hides the rest of the list.

use std::cmp::Reverse;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::api::logs::{log_error, log_info, log_warning};
use crate::error::{CampaignError, CampaignResult, StorageError};
use crate::models::{Campaign, CampaignStatus};
use crate::storage::{load_json, save_json, KeyValueStore};

pub const CAMPAIGNS_KEY: &str = "campaigns";

/// Read/write access to the stored campaigns.
#[derive(Clone)]
pub struct CampaignRepository {
    store: Arc<dyn KeyValueStore>,
}

impl CampaignRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored records as raw JSON, in storage order. A missing key is an
    /// empty list; a value that is not an array is an error.
    async fn load_records(&self) -> CampaignResult<Vec<Value>> {
        let records: Option<Vec<Value>> = load_json(self.store.as_ref(), CAMPAIGNS_KEY).await?;
        Ok(records.unwrap_or_default())
    }

    async fn save_records(&self, records: &[Value]) -> CampaignResult<()> {
        save_json(self.store.as_ref(), CAMPAIGNS_KEY, records).await?;
        Ok(())
    }

    /// Readable campaigns in storage order. Records that do not decode are
    /// logged and left out.
    pub async fn load_all(&self) -> CampaignResult<Vec<Campaign>> {
        let records = self.load_records().await?;
        Ok(records.iter().filter_map(decode_logged).collect())
    }

    /// Campaigns newest first. Unreadable storage is logged and shown as empty.
    pub async fn list(&self) -> Vec<Campaign> {
        match self.load_all().await {
            Ok(mut campaigns) => {
                sort_newest_first(&mut campaigns);
                campaigns
            }
            Err(e) => {
                log_error("campaigns", format!("Failed to load campaigns: {}", e));
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: &str) -> CampaignResult<Campaign> {
        let records = self.load_records().await?;
        let record = records
            .iter()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| CampaignError::NotFound(id.to_string()))?;
        decode(record)
    }

    /// Put `campaign` at the front of the stored list.
    pub async fn prepend(&self, campaign: Campaign) -> CampaignResult<()> {
        let mut records = self.load_records().await?;
        records.insert(0, encode(&campaign)?);
        self.save_records(&records).await
    }

    /// Apply `f` to the campaign with `id` and write the list back. Other
    /// records are written back exactly as read.
    async fn update<F>(&self, id: &str, f: F) -> CampaignResult<Campaign>
    where
        F: FnOnce(&mut Campaign),
    {
        let mut records = self.load_records().await?;
        let record = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| CampaignError::NotFound(id.to_string()))?;
        let mut campaign = decode(record)?;
        f(&mut campaign);
        *record = encode(&campaign)?;
        self.save_records(&records).await?;
        Ok(campaign)
    }

    /// Overwrite the display name.
    pub async fn rename(&self, id: &str, name: &str) -> CampaignResult<Campaign> {
        let updated = self.update(id, |c| c.name = name.to_string()).await?;
        log_info("campaigns", format!("Renamed campaign {} to '{}'", id, name));
        Ok(updated)
    }

    /// Mark the campaign completed. Already completed campaigns are unchanged.
    pub async fn end(&self, id: &str) -> CampaignResult<Campaign> {
        let updated = self
            .update(id, |c| {
                if c.status.can_transition_to(CampaignStatus::Completed) {
                    c.status = CampaignStatus::Completed;
                }
            })
            .await?;
        log_info("campaigns", format!("Campaign {} is {}", id, updated.status.as_str()));
        Ok(updated)
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn decode(record: &Value) -> CampaignResult<Campaign> {
    Campaign::deserialize(record).map_err(|e| StorageError::from(e).into())
}

fn decode_logged(record: &Value) -> Option<Campaign> {
    match decode(record) {
        Ok(campaign) => Some(campaign),
        Err(e) => {
            log_warning(
                "campaigns",
                format!("Skipping unreadable campaign {}: {}", record_id(record).unwrap_or("?"), e),
            );
            None
        }
    }
}

fn encode(campaign: &Campaign) -> CampaignResult<Value> {
    serde_json::to_value(campaign).map_err(|e| StorageError::from(e).into())
}

/// Sort by creation time, newest first; ties keep their stored order.
pub fn sort_newest_first(campaigns: &mut [Campaign]) {
    campaigns.sort_by_key(|c| Reverse(c.created_at_millis()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn campaign(id: &str, created_at: Option<&str>, status: CampaignStatus) -> Campaign {
        Campaign {
            id: id.into(),
            title: format!("Campaign {}", id),
            name: format!("Campaign {}", id),
            status,
            created_at: created_at.map(String::from),
            ..Default::default()
        }
    }

    async fn seeded(campaigns: Vec<Campaign>) -> (Arc<MemoryStore>, CampaignRepository) {
        let store = Arc::new(MemoryStore::new());
        save_json(store.as_ref(), CAMPAIGNS_KEY, &campaigns).await.unwrap();
        let repo = CampaignRepository::new(store.clone());
        (store, repo)
    }

    #[tokio::test]
    async fn test_list_sorts_newest_first_missing_as_epoch() {
        let (_, repo) = seeded(vec![
            campaign("old", Some("2024-01-01T00:00:00.000Z"), CampaignStatus::Active),
            campaign("none", None, CampaignStatus::Active),
            campaign("new", Some("2025-01-01T00:00:00.000Z"), CampaignStatus::Active),
        ])
        .await;

        let ids: Vec<String> = repo.list().await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["new", "old", "none"]);
    }

    #[tokio::test]
    async fn test_list_on_corrupt_storage_is_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(CAMPAIGNS_KEY, "not json").await.unwrap();
        let repo = CampaignRepository::new(store);
        assert!(repo.list().await.is_empty());
        assert!(repo.get("x").await.is_err());
    }

    #[tokio::test]
    async fn test_rename_overwrites_name_only() {
        let (_, repo) = seeded(vec![
            campaign("a", None, CampaignStatus::Active),
            campaign("b", None, CampaignStatus::Active),
        ])
        .await;

        let renamed = repo.rename("b", "Winter Launch").await.unwrap();
        assert_eq!(renamed.name, "Winter Launch");
        assert_eq!(renamed.title, "Campaign b");
        assert_eq!(repo.get("a").await.unwrap().name, "Campaign a");
    }

    #[tokio::test]
    async fn test_end_is_monotonic() {
        let (_, repo) = seeded(vec![
            campaign("a", None, CampaignStatus::Active),
            campaign("d", None, CampaignStatus::Draft),
        ])
        .await;

        assert_eq!(repo.end("a").await.unwrap().status, CampaignStatus::Completed);
        assert_eq!(repo.end("a").await.unwrap().status, CampaignStatus::Completed);
        assert_eq!(repo.end("d").await.unwrap().status, CampaignStatus::Completed);
    }

    #[tokio::test]
    async fn test_missing_campaign_is_not_found() {
        let (_, repo) = seeded(vec![]).await;
        assert!(matches!(repo.end("ghost").await, Err(CampaignError::NotFound(_))));
        assert!(matches!(repo.rename("ghost", "x").await, Err(CampaignError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mutation_keeps_foreign_fields() {
        let store = Arc::new(MemoryStore::new());
        let raw = json!([{"id": "legacy", "name": "Old", "status": "Active", "niche": "Food", "budget": 1200}]);
        store.set(CAMPAIGNS_KEY, &raw.to_string()).await.unwrap();
        let repo = CampaignRepository::new(store.clone());

        repo.end("legacy").await.unwrap();

        let stored: serde_json::Value =
            serde_json::from_str(&store.get(CAMPAIGNS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(stored[0]["status"], "Completed");
        assert_eq!(stored[0]["niche"], "Food");
        assert_eq!(stored[0]["budget"], 1200);
    }

    #[tokio::test]
    async fn test_prepend_puts_campaign_first() {
        let (_, repo) = seeded(vec![campaign("a", None, CampaignStatus::Active)]).await;
        repo.prepend(campaign("b", None, CampaignStatus::Active)).await.unwrap();
        let ids: Vec<String> = repo.load_all().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_unreadable_record_does_not_hide_the_rest() {
        let store = Arc::new(MemoryStore::new());
        let raw = json!([
            {"id": "a", "title": "Good", "status": "Active", "createdAt": "2024-01-01T00:00:00.000Z"},
            {"id": "b", "title": "Legacy", "status": "Active", "influencers": 3}
        ]);
        store.set(CAMPAIGNS_KEY, &raw.to_string()).await.unwrap();
        let repo = CampaignRepository::new(store.clone());

        let ids: Vec<String> = repo.list().await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(repo.get("a").await.unwrap().title, "Good");
        assert!(matches!(repo.get("b").await, Err(CampaignError::Storage(_))));

        repo.rename("a", "Renamed").await.unwrap();
        repo.prepend(campaign("c", None, CampaignStatus::Active)).await.unwrap();

        let stored: Value =
            serde_json::from_str(&store.get(CAMPAIGNS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(stored[0]["id"], "c");
        assert_eq!(stored[1]["name"], "Renamed");
        assert_eq!(stored[2], raw[1]);
    }
}
