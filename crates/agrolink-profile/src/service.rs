//! Profile and trust badge orchestration.

use agrolink_core::error::{AgrolinkError, AgrolinkResult, FieldError};
use agrolink_core::geo::Coordinates;
use agrolink_core::models::activity::{ActivityAction, CreateActivity, UserActivity};
use agrolink_core::models::badge::{BadgeLevel, TrustBadge, UpdateBadgeStats};
use agrolink_core::models::user::{Role, UpdateProfile, UserProfile};
use agrolink_core::profile_completion;
use agrolink_core::repository::{
    ActivityRepository, BadgeRepository, PaginatedResult, Pagination, UserRepository,
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::config::ProfileConfig;
use crate::status::BadgeStatus;

/// Partial profile update as received from the client.
///
/// Coordinates arrive as raw strings and are only parsed after the
/// role-conditional checks, so a single response can carry every
/// offending field.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location_lat: Option<String>,
    pub location_lng: Option<String>,
    pub location_text: Option<String>,
    pub farm_size: Option<f64>,
    pub business_name: Option<String>,
    pub bio: Option<String>,
    /// URL of an already-hosted photo; upload itself happens outside
    /// this service.
    pub profile_photo: Option<String>,
}

/// A profile together with its freshly computed completion score.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub profile_completion: u8,
}

/// Profile, badge, and search service.
///
/// Generic over repository implementations so that the service layer
/// has no dependency on the database crate. Request-scoped and
/// stateless; every method is a single bounded read or a single
/// read-modify-write against the store.
pub struct ProfileService<U: UserRepository, B: BadgeRepository, A: ActivityRepository> {
    pub(crate) users: U,
    pub(crate) badges: B,
    pub(crate) activity: A,
    pub(crate) config: ProfileConfig,
}

impl<U: UserRepository, B: BadgeRepository, A: ActivityRepository> ProfileService<U, B, A> {
    pub fn new(users: U, badges: B, activity: A, config: ProfileConfig) -> Self {
        Self {
            users,
            badges,
            activity,
            config,
        }
    }

    /// Append an audit event, swallowing failures — the audit sink
    /// must never fail the primary operation.
    pub(crate) async fn record_activity(&self, input: CreateActivity) {
        if let Err(error) = self.activity.append(input).await {
            warn!(%error, "failed to record user activity");
        }
    }

    /// Apply a partial profile update for `user_id`.
    ///
    /// Role-conditional rules are enforced here as hard validation
    /// errors: `farm_size` is farmer-only, `business_name` is for
    /// buyers and cooperatives. All offending fields are reported in
    /// one response.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
        ip_address: Option<String>,
    ) -> AgrolinkResult<ProfileView> {
        let profile = self.users.get_by_id(user_id).await?;

        let mut errors = Vec::new();
        match profile.role() {
            Role::Farmer => {
                if input.business_name.is_some() {
                    errors.push(FieldError::new(
                        "business_name",
                        "this field is only for buyers and cooperatives",
                    ));
                }
            }
            Role::Buyer | Role::Cooperative => {
                if input.farm_size.is_some() {
                    errors.push(FieldError::new("farm_size", "this field is only for farmers"));
                }
            }
        }

        if let Some(bio) = &input.bio
            && bio.chars().count() > self.config.max_bio_chars
        {
            errors.push(FieldError::new(
                "bio",
                format!("must be at most {} characters", self.config.max_bio_chars),
            ));
        }

        // Coordinates are applied only when both halves are present;
        // a lone latitude or longitude is ignored.
        let location = match (&input.location_lat, &input.location_lng) {
            (Some(lat), Some(lng)) => {
                let lat = lat.trim().parse::<f64>();
                let lng = lng.trim().parse::<f64>();
                if lat.is_err() {
                    errors.push(FieldError::new("location_lat", "invalid coordinate"));
                }
                if lng.is_err() {
                    errors.push(FieldError::new("location_lng", "invalid coordinate"));
                }
                match (lat, lng) {
                    // Point order is (longitude, latitude) — x then y.
                    (Ok(lat), Ok(lng)) => Some(Coordinates::new(lng, lat)),
                    _ => None,
                }
            }
            _ => None,
        };

        if !errors.is_empty() {
            return Err(AgrolinkError::Validation(errors));
        }

        let updated = self
            .users
            .update(
                user_id,
                UpdateProfile {
                    email: input.email,
                    first_name: input.first_name,
                    last_name: input.last_name,
                    location,
                    location_text: input.location_text,
                    farm_size: input.farm_size,
                    business_name: input.business_name,
                    bio: input.bio,
                    profile_photo: input.profile_photo,
                },
            )
            .await?;

        self.record_activity(CreateActivity {
            user_id: Some(user_id),
            action: ActivityAction::ProfileUpdate,
            description: "User profile updated".into(),
            metadata: Some(json!({
                "user_id": user_id.to_string(),
                "email": updated.email,
                "role": updated.role().as_str(),
            })),
            ip_address,
        })
        .await;

        Ok(ProfileView {
            profile_completion: profile_completion(&updated),
            profile: updated,
        })
    }

    /// A user's profile with its completion score, recomputed on
    /// every read.
    pub async fn profile(&self, user_id: Uuid) -> AgrolinkResult<ProfileView> {
        let profile = self.users.get_by_id(user_id).await?;
        Ok(ProfileView {
            profile_completion: profile_completion(&profile),
            profile,
        })
    }

    /// Recompute and persist the badge tier from the currently stored
    /// transaction stats.
    ///
    /// Idempotent for unchanged stats. Reports `NotFound` when the
    /// badge row is missing — creation is wired to user creation, but
    /// the engine defends against the invariant being broken.
    pub async fn recompute_badge(&self, user_id: Uuid) -> AgrolinkResult<TrustBadge> {
        let badge = self.badges.get_by_user(user_id).await?;
        let level = BadgeLevel::from_stats(badge.transaction_count, badge.average_rating);
        let updated = self.badges.set_level(user_id, level).await?;

        self.record_activity(CreateActivity {
            user_id: Some(user_id),
            action: ActivityAction::BadgeRecompute,
            description: "Trust badge recomputed".into(),
            metadata: Some(json!({
                "badge_level": level.as_str(),
                "transaction_count": updated.transaction_count,
            })),
            ip_address: None,
        })
        .await;

        Ok(updated)
    }

    /// Persist new transaction stats and recompute the tier in the
    /// same call, so the staleness window closes immediately after a
    /// stats change that goes through this path.
    pub async fn update_transaction_stats(
        &self,
        user_id: Uuid,
        transaction_count: Option<u32>,
        average_rating: Option<Option<f64>>,
    ) -> AgrolinkResult<TrustBadge> {
        if let Some(Some(rating)) = average_rating
            && !(0.0..=5.0).contains(&rating)
        {
            return Err(AgrolinkError::validation(
                "average_rating",
                "must be between 0 and 5",
            ));
        }

        let badge = self
            .badges
            .update_stats(
                user_id,
                UpdateBadgeStats {
                    transaction_count,
                    average_rating,
                },
            )
            .await?;

        let level = BadgeLevel::from_stats(badge.transaction_count, badge.average_rating);
        self.badges.set_level(user_id, level).await
    }

    /// Full badge status view for the given user.
    pub async fn badge_status(&self, user_id: Uuid) -> AgrolinkResult<BadgeStatus> {
        let badge = self.badges.get_by_user(user_id).await?;
        Ok(BadgeStatus::from(&badge))
    }

    /// The user's own audit trail, newest first, optionally filtered
    /// by action kind.
    pub async fn list_activity(
        &self,
        user_id: Uuid,
        action: Option<ActivityAction>,
        page: u32,
    ) -> AgrolinkResult<PaginatedResult<UserActivity>> {
        let limit = u64::from(self.config.activity_page_size);
        let offset = u64::from(page.max(1) - 1) * limit;
        self.activity
            .list_for_user(user_id, action, Pagination { offset, limit })
            .await
    }
}
