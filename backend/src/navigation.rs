//! Navigation contract with the client router.
//!
//! The backend never renders screens; it only tells the client where to go
//! next ("navigate to screen X with params Y") and reads the params the
//! current route was opened with.

use serde::{Deserialize, Serialize};

/// Screens a client can be sent to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    RegisterBrandProfile,
    RegisterInfluencerProfile,
    Explore,
    Wishlists,
    Campaigns,
    CampaignDetail,
    CampaignBasics,
    CampaignDetails,
    CampaignBudget,
    CampaignReview,
    Profile,
}

/// Which side of the marketplace the user registered as.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Brand,
    Influencer,
}

/// Parameters carried by a route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    /// Screen a nested stack should open on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Screen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
}

/// A screen together with its params.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub screen: Screen,
    #[serde(default)]
    pub params: RouteParams,
}

impl Route {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            params: RouteParams::default(),
        }
    }

    pub fn with_params(screen: Screen, params: RouteParams) -> Self {
        Self { screen, params }
    }

    /// Route to a campaign's detail screen.
    pub fn campaign_detail(id: impl Into<String>) -> Self {
        Self::with_params(
            Screen::CampaignDetail,
            RouteParams {
                campaign_id: Some(id.into()),
                ..Default::default()
            },
        )
    }
}

/// The router collaborator.
pub trait Navigator {
    fn navigate(&mut self, screen: Screen, params: RouteParams);

    /// The route currently shown, if any.
    fn current(&self) -> Option<&Route>;
}

/// Stack navigator that remembers every route pushed.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    stack: Vec<Route>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the current route. The root route is never popped.
    pub fn back(&mut self) -> Option<Route> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    pub fn history(&self) -> &[Route] {
        &self.stack
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&mut self, screen: Screen, params: RouteParams) {
        self.stack.push(Route::with_params(screen, params));
    }

    fn current(&self) -> Option<&Route> {
        self.stack.last()
    }
}
