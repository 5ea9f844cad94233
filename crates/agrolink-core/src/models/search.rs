//! Search query and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::models::user::{Role, UserProfile};
use crate::repository::Pagination;

/// Compiled, validated search against the user record store.
///
/// Filters are conjunctive; the name filter itself matches first OR
/// last name, case-insensitively. When `origin` is set, only records
/// with a stored location within `radius_km` qualify and results come
/// back ordered by ascending distance. Without an origin the order is
/// `created_at` ascending.
#[derive(Debug, Clone)]
pub struct ProfileQuery {
    /// The caller, excluded from results unconditionally.
    pub exclude_id: Uuid,
    pub role: Option<Role>,
    pub name_contains: Option<String>,
    pub origin: Option<Coordinates>,
    pub radius_km: f64,
    pub pagination: Pagination,
}

/// A matching profile with its distance annotation.
#[derive(Debug, Clone)]
pub struct ProfileHit {
    pub profile: UserProfile,
    /// Present only when the query had an origin and the record has a
    /// stored location.
    pub distance_km: Option<f64>,
}

/// Per-query view of a matching user, decorated with derived fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub full_name: String,
    pub role: Role,
    pub location_text: Option<String>,
    pub profile_photo: Option<String>,
    /// Freshly computed on every read; never persisted.
    pub profile_completion: u8,
    pub days_since_joined: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl SearchResult {
    /// Decorate a hit with derived display fields.
    pub fn from_hit(hit: &ProfileHit, now: DateTime<Utc>) -> Self {
        let profile = &hit.profile;
        Self {
            id: profile.id,
            full_name: profile.full_name(),
            role: profile.role(),
            location_text: profile.location_text.clone(),
            profile_photo: profile.profile_photo.clone(),
            profile_completion: crate::completion::profile_completion(profile),
            days_since_joined: (now - profile.created_at).num_days(),
            distance_km: hit.distance_km,
        }
    }
}
