//! Profile completion scoring.

use crate::models::user::{RoleDetails, UserProfile};

/// Score how completely a profile is filled out, 0–100.
///
/// Deterministic and side-effect free; recomputed on every read and
/// never persisted, so it cannot go stale the way the badge tier can.
///
/// Points are additive and each condition is independent:
/// base 10 (email + phone, always present on a valid profile),
/// first/last name 10 each, location 20, location text 10, photo 10,
/// plus a role-specific bucket — farmer: farm size 20 + bio 10;
/// buyer: bio 30; cooperative: business name 20 + bio 20. The
/// cooperative arithmetic can reach 110, so the total is clamped
/// to 100.
pub fn profile_completion(profile: &UserProfile) -> u8 {
    let mut score: u32 = 10;

    if filled(&profile.first_name) {
        score += 10;
    }
    if filled(&profile.last_name) {
        score += 10;
    }
    if profile.location.is_some() {
        score += 20;
    }
    if filled(&profile.location_text) {
        score += 10;
    }

    score += match &profile.details {
        RoleDetails::Farmer { farm_size } => {
            let mut bucket = 0;
            if farm_size.is_some() {
                bucket += 20;
            }
            if filled(&profile.bio) {
                bucket += 10;
            }
            bucket
        }
        RoleDetails::Buyer { .. } => {
            if filled(&profile.bio) {
                30
            } else {
                0
            }
        }
        RoleDetails::Cooperative { business_name } => {
            let mut bucket = 0;
            if filled(business_name) {
                bucket += 20;
            }
            if filled(&profile.bio) {
                bucket += 20;
            }
            bucket
        }
    };

    if filled(&profile.profile_photo) {
        score += 10;
    }

    score.min(100) as u8
}

/// Empty string and absent value are treated identically.
fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}
