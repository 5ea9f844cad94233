//! Badge status view assembly.
//!
//! Pure projection of a [`TrustBadge`] record into the shape the
//! client renders: current/next tier, progression counters,
//! verification checklist, and the static tier-benefit copy.

use agrolink_core::models::badge::{BadgeLevel, TrustBadge};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Verifications {
    pub phone_verified: bool,
    pub id_verified: bool,
    pub location_verified: bool,
    pub community_trusted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionStats {
    pub total_transactions: u32,
    /// Reported as 0.0 while no rating exists.
    pub average_rating: f64,
    pub next_badge: BadgeLevel,
    pub transactions_needed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationStep {
    #[serde(rename = "type")]
    pub step_type: &'static str,
    pub status: StepStatus,
    pub description: &'static str,
    pub action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierBenefits {
    pub current: Vec<&'static str>,
    pub next_level: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeStatus {
    pub current_badge: BadgeLevel,
    pub badge_display: &'static str,
    pub verifications: Verifications,
    pub transaction_stats: TransactionStats,
    pub verification_steps: Vec<VerificationStep>,
    pub benefits: TierBenefits,
}

/// Benefit copy per tier: (current, next_level).
fn benefits(level: BadgeLevel) -> (&'static [&'static str], &'static [&'static str]) {
    const NEW_USER: &[&str] = &[
        "Basic marketplace access",
        "Direct messaging",
        "Price tracking",
    ];
    const BRONZE: &[&str] = &[
        "Featured listing eligibility",
        "Priority in search results",
        "Access to premium buyers",
    ];
    const SILVER: &[&str] = &[
        "Prominent placement in search",
        "Higher buyer trust",
        "Access to premium tools",
    ];
    const GOLD: &[&str] = &[
        "Diamond-level promotions",
        "Exclusive events",
        "Priority support",
    ];
    const DIAMOND: &[&str] = &["Diamond-level rewards and recognition"];
    const NONE: &[&str] = &[];

    match level {
        BadgeLevel::NewUser => (NEW_USER, BRONZE),
        BadgeLevel::Bronze => (BRONZE, SILVER),
        BadgeLevel::Silver => (SILVER, GOLD),
        BadgeLevel::Gold => (GOLD, DIAMOND),
        BadgeLevel::Diamond => (DIAMOND, NONE),
    }
}

fn step_status(completed: bool) -> StepStatus {
    if completed {
        StepStatus::Completed
    } else {
        StepStatus::Pending
    }
}

impl From<&TrustBadge> for BadgeStatus {
    fn from(badge: &TrustBadge) -> Self {
        let next_badge = badge.badge_level.next();
        let (current, next_level) = benefits(badge.badge_level);

        BadgeStatus {
            current_badge: badge.badge_level,
            badge_display: badge.badge_level.display_name(),
            verifications: Verifications {
                phone_verified: badge.phone_verified,
                id_verified: badge.id_verified,
                location_verified: badge.location_verified,
                community_trusted: badge.community_trusted,
            },
            transaction_stats: TransactionStats {
                total_transactions: badge.transaction_count,
                average_rating: badge.average_rating.unwrap_or(0.0),
                next_badge,
                transactions_needed: next_badge.transactions_needed(badge.transaction_count),
            },
            verification_steps: vec![
                VerificationStep {
                    step_type: "id_verification",
                    status: step_status(badge.id_verified),
                    description: "Upload government ID for verification",
                    action: "Upload ID",
                },
                VerificationStep {
                    step_type: "location_verification",
                    status: step_status(badge.location_verified),
                    description: "Verify your farm/business location",
                    action: "Verify Location",
                },
            ],
            benefits: TierBenefits {
                current: current.to_vec(),
                next_level: next_level.to_vec(),
            },
        }
    }
}
