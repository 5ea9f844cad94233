//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in the
//! database crate; services stay generic over these traits.

use uuid::Uuid;

use crate::error::AgrolinkResult;
use crate::models::{
    activity::{ActivityAction, CreateActivity, UserActivity},
    badge::{BadgeLevel, TrustBadge, UpdateBadgeStats, UpdateVerifications},
    search::{ProfileHit, ProfileQuery},
    user::{CreateProfile, UpdateProfile, UserProfile},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> PaginatedResult<T> {
    /// Whether further pages exist past this window.
    pub fn has_more(&self) -> bool {
        self.offset + (self.items.len() as u64) < self.total
    }
}


pub trait UserRepository: Send + Sync {
    /// Create the user record together with its trust badge — badge
    /// lifecycle is tied to the user record.
    fn create(&self, input: CreateProfile) -> impl Future<Output = AgrolinkResult<UserProfile>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgrolinkResult<UserProfile>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProfile,
    ) -> impl Future<Output = AgrolinkResult<UserProfile>> + Send;
    /// Hard delete; removes the badge record as well.
    fn delete(&self, id: Uuid) -> impl Future<Output = AgrolinkResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AgrolinkResult<PaginatedResult<UserProfile>>> + Send;
    /// Filtered scan with optional geo radius restriction and
    /// distance annotation (ascending-distance order when an origin
    /// is present).
    fn search(
        &self,
        query: ProfileQuery,
    ) -> impl Future<Output = AgrolinkResult<PaginatedResult<ProfileHit>>> + Send;
}

pub trait BadgeRepository: Send + Sync {
    fn get_by_user(&self, user_id: Uuid)
    -> impl Future<Output = AgrolinkResult<TrustBadge>> + Send;
    /// Persist a recomputed tier (read-modify-write,
    /// last-writer-wins).
    fn set_level(
        &self,
        user_id: Uuid,
        level: BadgeLevel,
    ) -> impl Future<Output = AgrolinkResult<TrustBadge>> + Send;
    fn update_stats(
        &self,
        user_id: Uuid,
        input: UpdateBadgeStats,
    ) -> impl Future<Output = AgrolinkResult<TrustBadge>> + Send;
    fn set_verifications(
        &self,
        user_id: Uuid,
        input: UpdateVerifications,
    ) -> impl Future<Output = AgrolinkResult<TrustBadge>> + Send;
}

pub trait ActivityRepository: Send + Sync {
    fn append(
        &self,
        input: CreateActivity,
    ) -> impl Future<Output = AgrolinkResult<UserActivity>> + Send;
    /// A user's own activity, newest first, optionally filtered by
    /// action kind.
    fn list_for_user(
        &self,
        user_id: Uuid,
        action: Option<ActivityAction>,
        pagination: Pagination,
    ) -> impl Future<Output = AgrolinkResult<PaginatedResult<UserActivity>>> + Send;
}
