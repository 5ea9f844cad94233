//! SurrealDB implementation of [`BadgeRepository`].
//!
//! Badge rows are keyed by `user_id` (unique index); they are created
//! by the user repository alongside the user record, so every lookup
//! here defends against the row being absent anyway and reports
//! `NotFound` rather than assuming the invariant.

use agrolink_core::error::AgrolinkResult;
use agrolink_core::models::badge::{
    BadgeLevel, TrustBadge, UpdateBadgeStats, UpdateVerifications,
};
use agrolink_core::repository::BadgeRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct BadgeRow {
    user_id: String,
    phone_verified: bool,
    id_verified: bool,
    location_verified: bool,
    community_trusted: bool,
    transaction_count: u32,
    average_rating: Option<f64>,
    badge_level: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BadgeRow {
    fn try_into_badge(self) -> Result<TrustBadge, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        let badge_level = BadgeLevel::parse(&self.badge_level)
            .ok_or_else(|| DbError::Migration(format!("unknown badge level: {}", self.badge_level)))?;
        Ok(TrustBadge {
            user_id,
            phone_verified: self.phone_verified,
            id_verified: self.id_verified,
            location_verified: self.location_verified,
            community_trusted: self.community_trusted,
            transaction_count: self.transaction_count,
            average_rating: self.average_rating,
            badge_level,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the trust badge repository.
#[derive(Clone)]
pub struct SurrealBadgeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBadgeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn first_badge(rows: Vec<BadgeRow>, user_id: Uuid) -> Result<TrustBadge, DbError> {
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "trust_badge".into(),
            id: user_id.to_string(),
        })?;
        row.try_into_badge()
    }
}

impl<C: Connection> BadgeRepository for SurrealBadgeRepository<C> {
    async fn get_by_user(&self, user_id: Uuid) -> AgrolinkResult<TrustBadge> {
        let mut result = self
            .db
            .query("SELECT * FROM trust_badge WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BadgeRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::first_badge(rows, user_id)?)
    }

    async fn set_level(&self, user_id: Uuid, level: BadgeLevel) -> AgrolinkResult<TrustBadge> {
        let result = self
            .db
            .query(
                "UPDATE trust_badge SET badge_level = $level, \
                 updated_at = time::now() \
                 WHERE user_id = $user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("level", level.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BadgeRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::first_badge(rows, user_id)?)
    }

    async fn update_stats(
        &self,
        user_id: Uuid,
        input: UpdateBadgeStats,
    ) -> AgrolinkResult<TrustBadge> {
        let mut sets = Vec::new();
        if input.transaction_count.is_some() {
            sets.push("transaction_count = $transaction_count");
        }
        match input.average_rating {
            Some(Some(_)) => sets.push("average_rating = $average_rating"),
            Some(None) => sets.push("average_rating = NONE"),
            None => {}
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE trust_badge SET {} WHERE user_id = $user_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("user_id", user_id.to_string()));

        if let Some(count) = input.transaction_count {
            builder = builder.bind(("transaction_count", count));
        }
        if let Some(Some(rating)) = input.average_rating {
            builder = builder.bind(("average_rating", rating));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BadgeRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::first_badge(rows, user_id)?)
    }

    async fn set_verifications(
        &self,
        user_id: Uuid,
        input: UpdateVerifications,
    ) -> AgrolinkResult<TrustBadge> {
        let mut sets = Vec::new();
        if input.phone_verified.is_some() {
            sets.push("phone_verified = $phone_verified");
        }
        if input.id_verified.is_some() {
            sets.push("id_verified = $id_verified");
        }
        if input.location_verified.is_some() {
            sets.push("location_verified = $location_verified");
        }
        if input.community_trusted.is_some() {
            sets.push("community_trusted = $community_trusted");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE trust_badge SET {} WHERE user_id = $user_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("user_id", user_id.to_string()));

        if let Some(v) = input.phone_verified {
            builder = builder.bind(("phone_verified", v));
        }
        if let Some(v) = input.id_verified {
            builder = builder.bind(("id_verified", v));
        }
        if let Some(v) = input.location_verified {
            builder = builder.bind(("location_verified", v));
        }
        if let Some(v) = input.community_trusted {
            builder = builder.bind(("community_trusted", v));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BadgeRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::first_badge(rows, user_id)?)
    }
}
