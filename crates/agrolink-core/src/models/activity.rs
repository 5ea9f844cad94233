//! User activity audit model.
//!
//! Append-only; consumed by the profile and trust services as a
//! fire-and-forget sink. A failed append must never fail the primary
//! operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Login,
    Logout,
    ProfileUpdate,
    Search,
    BadgeRecompute,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::Login => "login",
            ActivityAction::Logout => "logout",
            ActivityAction::ProfileUpdate => "profile_update",
            ActivityAction::Search => "search",
            ActivityAction::BadgeRecompute => "badge_recompute",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "login" => Some(ActivityAction::Login),
            "logout" => Some(ActivityAction::Logout),
            "profile_update" => Some(ActivityAction::ProfileUpdate),
            "search" => Some(ActivityAction::Search),
            "badge_recompute" => Some(ActivityAction::BadgeRecompute),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivity {
    pub id: Uuid,
    /// `None` for events recorded before authentication.
    pub user_id: Option<Uuid>,
    pub action: ActivityAction,
    pub description: String,
    pub metadata: serde_json::Value,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivity {
    pub user_id: Option<Uuid>,
    pub action: ActivityAction,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}
