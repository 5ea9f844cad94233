//! Trust badge domain model and tier engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reputation tier, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeLevel {
    NewUser,
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl BadgeLevel {
    /// Derive the tier from transaction stats.
    ///
    /// Thresholds are evaluated highest-first; the first match wins.
    /// An absent rating compares as 0.0 and therefore never promotes
    /// past `NewUser`. The function does not enforce monotonic
    /// progression — corrected (lower) stats legitimately demote.
    pub fn from_stats(transaction_count: u32, average_rating: Option<f64>) -> Self {
        let rating = average_rating.unwrap_or(0.0);
        if transaction_count >= 100 && rating >= 4.8 {
            BadgeLevel::Diamond
        } else if transaction_count >= 50 && rating >= 4.7 {
            BadgeLevel::Gold
        } else if transaction_count >= 20 && rating >= 4.3 {
            BadgeLevel::Silver
        } else if transaction_count >= 5 && rating >= 4.0 {
            BadgeLevel::Bronze
        } else {
            BadgeLevel::NewUser
        }
    }

    /// The tier above this one; identity at `Diamond`.
    pub fn next(self) -> Self {
        match self {
            BadgeLevel::NewUser => BadgeLevel::Bronze,
            BadgeLevel::Bronze => BadgeLevel::Silver,
            BadgeLevel::Silver => BadgeLevel::Gold,
            BadgeLevel::Gold => BadgeLevel::Diamond,
            BadgeLevel::Diamond => BadgeLevel::Diamond,
        }
    }

    /// Transaction count associated with a tier for progression
    /// messaging ("N more transactions to reach X").
    pub fn required_transactions(self) -> u32 {
        match self {
            BadgeLevel::NewUser => 5,
            BadgeLevel::Bronze => 20,
            BadgeLevel::Silver => 50,
            BadgeLevel::Gold => 100,
            BadgeLevel::Diamond => 200,
        }
    }

    /// Transactions still needed to reach this tier from
    /// `current_count`; zero once the count is already there.
    pub fn transactions_needed(self, current_count: u32) -> u32 {
        self.required_transactions().saturating_sub(current_count)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BadgeLevel::NewUser => "New User",
            BadgeLevel::Bronze => "Bronze",
            BadgeLevel::Silver => "Silver",
            BadgeLevel::Gold => "Gold",
            BadgeLevel::Diamond => "Diamond",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeLevel::NewUser => "new_user",
            BadgeLevel::Bronze => "bronze",
            BadgeLevel::Silver => "silver",
            BadgeLevel::Gold => "gold",
            BadgeLevel::Diamond => "diamond",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new_user" => Some(BadgeLevel::NewUser),
            "bronze" => Some(BadgeLevel::Bronze),
            "silver" => Some(BadgeLevel::Silver),
            "gold" => Some(BadgeLevel::Gold),
            "diamond" => Some(BadgeLevel::Diamond),
            _ => None,
        }
    }
}

/// One-to-one with [`UserProfile`](super::user::UserProfile); created
/// alongside the user record and destroyed with it.
///
/// `badge_level` is persisted derived state. It is only updated by an
/// explicit recompute, so a stale tier can exist between a stats
/// change and the next recompute call — that window is part of the
/// contract (badge tier is advisory display data), not an oversight.
/// `BadgeLevel::from_stats` stays available for callers that want the
/// computed-at-read value instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustBadge {
    pub user_id: Uuid,
    pub phone_verified: bool,
    pub id_verified: bool,
    pub location_verified: bool,
    pub community_trusted: bool,
    pub transaction_count: u32,
    /// Average rating in [0, 5]; `None` until the first rating lands.
    pub average_rating: Option<f64>,
    pub badge_level: BadgeLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial transaction-stats update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBadgeStats {
    pub transaction_count: Option<u32>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub average_rating: Option<Option<f64>>,
}

/// Partial verification-flag update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVerifications {
    pub phone_verified: Option<bool>,
    pub id_verified: Option<bool>,
    pub location_verified: Option<bool>,
    pub community_trusted: Option<bool>,
}
