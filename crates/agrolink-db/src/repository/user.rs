//! SurrealDB implementation of [`UserRepository`].
//!
//! Geo radius search has no spatial index on this engine: the
//! attribute filters run in SurrealQL, then located candidates are
//! distance-filtered and sorted in-process with the haversine
//! formula. That is an O(n) scan over the filtered set, which is
//! acceptable for the bounded candidate volumes this index serves.

use std::cmp::Ordering;

use agrolink_core::error::AgrolinkResult;
use agrolink_core::geo::Coordinates;
use agrolink_core::models::search::{ProfileHit, ProfileQuery};
use agrolink_core::models::user::{
    CreateProfile, Role, RoleDetails, UpdateProfile, UserProfile, normalize_phone,
};
use agrolink_core::repository::{PaginatedResult, Pagination, UserRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    role: String,
    email: String,
    phone_number: String,
    first_name: Option<String>,
    last_name: Option<String>,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
    location_text: Option<String>,
    farm_size: Option<f64>,
    business_name: Option<String>,
    bio: Option<String>,
    profile_photo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    role: String,
    email: String,
    phone_number: String,
    first_name: Option<String>,
    last_name: Option<String>,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
    location_text: Option<String>,
    farm_size: Option<f64>,
    business_name: Option<String>,
    bio: Option<String>,
    profile_photo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    Role::parse(s).ok_or_else(|| DbError::Migration(format!("unknown user role: {s}")))
}

/// Assemble the role sum type from the flat stored columns. Columns
/// that are illegal for the stored role are dropped, not errors —
/// the update boundary prevents them from being written in the first
/// place.
fn build_details(role: Role, farm_size: Option<f64>, business_name: Option<String>) -> RoleDetails {
    match role {
        Role::Farmer => RoleDetails::Farmer { farm_size },
        Role::Buyer => RoleDetails::Buyer { business_name },
        Role::Cooperative => RoleDetails::Cooperative { business_name },
    }
}

fn build_location(lat: Option<f64>, lng: Option<f64>) -> Option<Coordinates> {
    match (lng, lat) {
        (Some(lng), Some(lat)) => Some(Coordinates::new(lng, lat)),
        _ => None,
    }
}

impl UserRow {
    fn into_profile(self, id: Uuid) -> Result<UserProfile, DbError> {
        let role = parse_role(&self.role)?;
        Ok(UserProfile {
            id,
            email: self.email,
            phone_number: self.phone_number,
            first_name: self.first_name,
            last_name: self.last_name,
            location: build_location(self.location_lat, self.location_lng),
            location_text: self.location_text,
            bio: self.bio,
            profile_photo: self.profile_photo,
            details: build_details(role, self.farm_size, self.business_name),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_profile(self) -> Result<UserProfile, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let role = parse_role(&self.role)?;
        Ok(UserProfile {
            id,
            email: self.email,
            phone_number: self.phone_number,
            first_name: self.first_name,
            last_name: self.last_name,
            location: build_location(self.location_lat, self.location_lng),
            location_text: self.location_text,
            bio: self.bio,
            profile_photo: self.profile_photo,
            details: build_details(role, self.farm_size, self.business_name),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Shared WHERE clause for search queries. `$exclude`, and
    /// optionally `$role` / `$name`, must be bound by the caller.
    fn search_conditions(query: &ProfileQuery) -> Vec<&'static str> {
        let mut conds = vec!["meta::id(id) != $exclude"];
        if query.role.is_some() {
            conds.push("role = $role");
        }
        if query.name_contains.is_some() {
            conds.push(
                "(string::contains(string::lowercase(first_name ?? ''), $name) \
                 OR string::contains(string::lowercase(last_name ?? ''), $name))",
            );
        }
        if query.origin.is_some() {
            // Locationless records can never satisfy a radius bound.
            conds.push("location_lat != NONE AND location_lng != NONE");
        }
        conds
    }

    /// Origin-bounded search: fetch every filtered candidate with a
    /// location, then distance-filter, sort ascending, and window
    /// in-process.
    async fn search_by_distance(
        &self,
        query: ProfileQuery,
        origin: Coordinates,
    ) -> Result<PaginatedResult<ProfileHit>, DbError> {
        let sql = format!(
            "SELECT meta::id(id) AS record_id, * FROM user WHERE {} \
             ORDER BY created_at ASC",
            Self::search_conditions(&query).join(" AND "),
        );

        let mut builder = self
            .db
            .query(&sql)
            .bind(("exclude", query.exclude_id.to_string()));
        if let Some(role) = query.role {
            builder = builder.bind(("role", role.as_str()));
        }
        if let Some(name) = &query.name_contains {
            builder = builder.bind(("name", name.to_lowercase()));
        }

        let mut result = builder.await?;
        let rows: Vec<UserRowWithId> = result.take(0)?;

        let mut hits = Vec::new();
        for row in rows {
            let profile = row.try_into_profile()?;
            let Some(location) = profile.location else {
                continue;
            };
            let distance = origin.distance_km(&location);
            if distance <= query.radius_km {
                hits.push(ProfileHit {
                    profile,
                    distance_km: Some(distance),
                });
            }
        }

        // Haversine output is finite, so the comparison is total;
        // the sort is stable, preserving created_at order for ties.
        hits.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });

        let total = hits.len() as u64;
        let items = hits
            .into_iter()
            .skip(query.pagination.offset as usize)
            .take(query.pagination.limit as usize)
            .collect();

        Ok(PaginatedResult {
            items,
            total,
            offset: query.pagination.offset,
            limit: query.pagination.limit,
        })
    }

    /// Attribute-only search: filter, count, and window in SurrealQL.
    async fn search_by_attributes(
        &self,
        query: ProfileQuery,
    ) -> Result<PaginatedResult<ProfileHit>, DbError> {
        let where_clause = Self::search_conditions(&query).join(" AND ");

        let count_sql =
            format!("SELECT count() AS total FROM user WHERE {where_clause} GROUP ALL");
        let mut count_builder = self
            .db
            .query(&count_sql)
            .bind(("exclude", query.exclude_id.to_string()));
        if let Some(role) = query.role {
            count_builder = count_builder.bind(("role", role.as_str()));
        }
        if let Some(name) = &query.name_contains {
            count_builder = count_builder.bind(("name", name.to_lowercase()));
        }
        let mut count_result = count_builder.await?;
        let count_rows: Vec<CountRow> = count_result.take(0)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let sql = format!(
            "SELECT meta::id(id) AS record_id, * FROM user WHERE {where_clause} \
             ORDER BY created_at ASC LIMIT $limit START $offset",
        );
        let mut builder = self
            .db
            .query(&sql)
            .bind(("exclude", query.exclude_id.to_string()))
            .bind(("limit", query.pagination.limit))
            .bind(("offset", query.pagination.offset));
        if let Some(role) = query.role {
            builder = builder.bind(("role", role.as_str()));
        }
        if let Some(name) = &query.name_contains {
            builder = builder.bind(("name", name.to_lowercase()));
        }

        let mut result = builder.await?;
        let rows: Vec<UserRowWithId> = result.take(0)?;

        let items = rows
            .into_iter()
            .map(|row| {
                Ok(ProfileHit {
                    profile: row.try_into_profile()?,
                    distance_km: None,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: query.pagination.offset,
            limit: query.pagination.limit,
        })
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateProfile) -> AgrolinkResult<UserProfile> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let badge_id = Uuid::new_v4().to_string();
        let phone_number = normalize_phone(&input.phone_number);

        // The badge row is created in the same request — the Rust
        // analogue of the original post-create hook that ties badge
        // lifecycle to the user record.
        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 role = $role, \
                 email = $email, \
                 phone_number = $phone_number, \
                 first_name = $first_name, \
                 last_name = $last_name",
            )
            .query(
                "CREATE type::record('trust_badge', $badge_id) SET \
                 user_id = $id, \
                 badge_level = 'new_user'",
            )
            .bind(("id", id_str.clone()))
            .bind(("badge_id", badge_id))
            .bind(("role", input.role.as_str()))
            .bind(("email", input.email))
            .bind(("phone_number", phone_number))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AgrolinkResult<UserProfile> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateProfile) -> AgrolinkResult<UserProfile> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.first_name.is_some() {
            sets.push("first_name = $first_name");
        }
        if input.last_name.is_some() {
            sets.push("last_name = $last_name");
        }
        if input.location.is_some() {
            sets.push("location_lat = $location_lat");
            sets.push("location_lng = $location_lng");
        }
        if input.location_text.is_some() {
            sets.push("location_text = $location_text");
        }
        if input.farm_size.is_some() {
            sets.push("farm_size = $farm_size");
        }
        if input.business_name.is_some() {
            sets.push("business_name = $business_name");
        }
        if input.bio.is_some() {
            sets.push("bio = $bio");
        }
        if input.profile_photo.is_some() {
            sets.push("profile_photo = $profile_photo");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(first_name) = input.first_name {
            builder = builder.bind(("first_name", first_name));
        }
        if let Some(last_name) = input.last_name {
            builder = builder.bind(("last_name", last_name));
        }
        if let Some(location) = input.location {
            builder = builder
                .bind(("location_lat", location.latitude))
                .bind(("location_lng", location.longitude));
        }
        if let Some(location_text) = input.location_text {
            builder = builder.bind(("location_text", location_text));
        }
        if let Some(farm_size) = input.farm_size {
            builder = builder.bind(("farm_size", farm_size));
        }
        if let Some(business_name) = input.business_name {
            builder = builder.bind(("business_name", business_name));
        }
        if let Some(bio) = input.bio {
            builder = builder.bind(("bio", bio));
        }
        if let Some(profile_photo) = input.profile_photo {
            builder = builder.bind(("profile_photo", profile_photo));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn delete(&self, id: Uuid) -> AgrolinkResult<()> {
        // Badge lifecycle is tied to the user record.
        self.db
            .query("DELETE type::record('user', $id)")
            .query("DELETE trust_badge WHERE user_id = $id")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> AgrolinkResult<PaginatedResult<UserProfile>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM user \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_profile())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn search(&self, query: ProfileQuery) -> AgrolinkResult<PaginatedResult<ProfileHit>> {
        let result = match query.origin {
            Some(origin) => self.search_by_distance(query, origin).await?,
            None => self.search_by_attributes(query).await?,
        };
        Ok(result)
    }
}
