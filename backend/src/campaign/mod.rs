//! Campaign creation and management.
//!
//! - [`draft`] - Wizard steps, partial records and validation
//! - [`assembler`] - Autosave, review and submission over storage
//! - [`repository`] - The persisted campaign list

pub mod assembler;
pub mod draft;
pub mod repository;

pub use assembler::DraftAssembler;
pub use draft::{
    BasicsDraft, BudgetDraft, CampaignDraft, DetailsDraft, StepForm, WizardStep, BASICS_KEY,
    BUDGET_KEY, DETAILS_KEY, DRAFT_KEYS,
};
pub use repository::{sort_newest_first, CampaignRepository, CAMPAIGNS_KEY};
