//! REST API request and response types.
//!
//! JSON is camelCase throughout, matching what the mobile client stores.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::campaign::WizardStep;
use crate::error::{FieldError, ServerError};
use crate::models::{Campaign, Influencer};
use crate::navigation::Route;
use crate::search::{Bounds, FilterCriteria};
use crate::wishlist::Folder;

// =============================================================================
// Catalog
// =============================================================================

/// Query string of `GET /api/influencers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Free-text query against name and category.
    pub q: Option<String>,
    /// Selected category chip.
    pub chip: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub rate_min: Option<u64>,
    pub rate_max: Option<u64>,
    pub audience_min: Option<u64>,
    pub audience_max: Option<u64>,
    /// Comma-separated platform names.
    pub platforms: Option<String>,
}

impl SearchParams {
    /// Filter object equivalent to these params. A range is set when either
    /// of its bounds is given; a missing minimum is zero.
    pub fn criteria(&self) -> FilterCriteria {
        let range = |min: Option<u64>, max: Option<u64>| {
            (min.is_some() || max.is_some()).then(|| Bounds::new(min.unwrap_or(0), max))
        };
        let platforms = self.platforms.as_deref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });

        FilterCriteria {
            location: self.location.clone(),
            category: self.category.clone(),
            rate_range: range(self.rate_min, self.rate_max),
            audience_range: range(self.audience_min, self.audience_max),
            platforms: platforms.filter(|p| !p.is_empty()),
        }
    }
}

/// An influencer card as sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerCard {
    #[serde(flatten)]
    pub influencer: Influencer,
    pub rate_amount: Option<u64>,
    pub tags: Vec<String>,
    pub wished: bool,
}

impl InfluencerCard {
    pub fn new(influencer: &Influencer, wished: bool) -> Self {
        Self {
            rate_amount: influencer.rate_amount(),
            tags: influencer.tags().into_iter().map(String::from).collect(),
            influencer: influencer.clone(),
            wished,
        }
    }
}

/// Response of `GET /api/influencers`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub total: usize,
    pub influencers: Vec<InfluencerCard>,
    pub criteria: FilterCriteria,
}

/// Body of `POST /api/searches`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSearchRequest {
    pub query: String,
}

// =============================================================================
// Wishlist
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToFolderRequest {
    pub influencer_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFolderRequest {
    pub new_name: String,
}

// =============================================================================
// Drafts & Campaigns
// =============================================================================

/// Response of draft step endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    pub step: WizardStep,
    pub data: Value,
    /// Where the client should go next.
    pub next: Route,
}

/// Response of `POST /api/drafts/submit`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub campaign: Campaign,
    pub next: Route,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCampaignRequest {
    pub name: String,
}

// =============================================================================
// Errors
// =============================================================================

/// Create an error body.
pub fn error_response(error: &str, field_errors: &[FieldError]) -> Value {
    json!({
        "status": "error",
        "error": error,
        "fieldErrors": field_errors,
    })
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ServerError::Validation(errors) => error_response(&self.to_string(), errors),
            _ => error_response(&self.to_string(), &[]),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_build_ranges() {
        let params = SearchParams {
            rate_max: Some(2000),
            audience_min: Some(10_000),
            platforms: Some("Instagram, TikTok,".into()),
            ..Default::default()
        };
        let criteria = params.criteria();
        assert_eq!(criteria.rate_range, Some(Bounds::new(0, Some(2000))));
        assert_eq!(criteria.audience_range, Some(Bounds::new(10_000, None)));
        assert_eq!(criteria.platforms, Some(vec!["Instagram".to_string(), "TikTok".to_string()]));
    }

    #[test]
    fn test_empty_params_are_unset_criteria() {
        assert_eq!(SearchParams::default().criteria(), FilterCriteria::default());
    }

    #[test]
    fn test_validation_error_status_and_body() {
        let err =
            ServerError::Validation(vec![FieldError::new("title", "Campaign title is required")]);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = error_response(&err.to_string(), &[FieldError::new("title", "required")]);
        assert_eq!(body["status"], "error");
        assert_eq!(body["fieldErrors"][0]["field"], "title");
    }

    #[test]
    fn test_card_flattens_influencer() {
        let catalog = crate::catalog::Catalog::builtin();
        let card = InfluencerCard::new(&catalog.all()[0], true);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["name"], "John Doe");
        assert_eq!(json["rateAmount"], 2000);
        assert_eq!(json["tags"][1], "Lifestyle");
        assert_eq!(json["wished"], true);
    }
}
