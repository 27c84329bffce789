//! Login/logout notifications from the identity provider.
//!
//! Transitions are recorded in the activity log. Nothing else depends on
//! the session state.

use serde::{Deserialize, Serialize};

use crate::api::logs::log_info;

/// Notification sent by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SessionEvent {
    LoggedIn {
        #[serde(default)]
        user: Option<String>,
    },
    LoggedOut,
}

/// Last known session state.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionObserver {
    logged_in: bool,
    user: Option<String>,
}

impl SessionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `event`. Returns whether the login state changed.
    pub fn observe(&mut self, event: SessionEvent) -> bool {
        let was_logged_in = self.logged_in;
        match event {
            SessionEvent::LoggedIn { user } => {
                self.logged_in = true;
                self.user = user;
            }
            SessionEvent::LoggedOut => {
                self.logged_in = false;
                self.user = None;
            }
        }
        let status = if self.logged_in { "Logged in" } else { "Logged out" };
        log_info("session", format!("Auth status: {}", status));
        was_logged_in != self.logged_in
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
