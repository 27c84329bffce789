//! # Influmatch - brand/influencer matching backend
//!
//! Brands browse an influencer catalog, keep wishlists organised in folders,
//! and create campaigns through a four-step wizard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│   Search    │     │  Wishlist   │  (memory only)
//! └─────────────┘     └─────────────┘     └─────────────┘
//!
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Wizard step │────▶│  Assembler  │────▶│  Campaigns  │──▶ KeyValueStore
//! │  1 / 2 / 3  │     │ (review +   │     │ (list/detail│    (memory/file)
//! └─────────────┘     │  submit)    │     │  rename/end)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use influmatch::{DraftAssembler, MemoryStore, WizardStep};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let drafts = DraftAssembler::new(Arc::new(MemoryStore::new()));
//!     drafts.save_value(WizardStep::Basics, json!({"title": "Summer Promo"})).await.unwrap();
//!     let campaign = drafts.submit().await.unwrap();
//!     println!("Created {}", campaign.id);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Influencer and campaign records
//! - [`catalog`] - Read-only influencer list
//! - [`search`] - Filter/search engine
//! - [`wishlist`] - Wishlist folders
//! - [`storage`] - Key-value storage backends
//! - [`campaign`] - Draft wizard and campaign list
//! - [`navigation`] - Client routing contract
//! - [`session`] - Login/logout observer
//! - [`config`] - Runtime configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Browsing
pub mod catalog;
pub mod search;
pub mod wishlist;

// Persistence
pub mod storage;

// Campaigns
pub mod campaign;

// Collaborators
pub mod navigation;
pub mod session;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{CampaignError, DraftError, FieldError, ServerError, StorageError};

// =============================================================================
// Re-exports - Models & Catalog
// =============================================================================

pub use catalog::{Catalog, CATALOG};
pub use models::{Campaign, CampaignStatus, DurationMode, Influencer, ValueRange};

// =============================================================================
// Re-exports - Search & Wishlist
// =============================================================================

pub use search::{filter_influencers, Bounds, FilterCriteria, RecentSearches};
pub use wishlist::{Folder, SharedWishlist, WishlistStore, ALL_FOLDER};

// =============================================================================
// Re-exports - Storage & Campaigns
// =============================================================================

pub use campaign::{CampaignDraft, CampaignRepository, DraftAssembler, WizardStep};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

// =============================================================================
// Re-exports - Collaborators & Config
// =============================================================================

pub use config::Config;
pub use navigation::{HistoryNavigator, Navigator, Route, RouteParams, Screen, UserType};
pub use session::{SessionEvent, SessionObserver};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
