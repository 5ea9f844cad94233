//! SurrealDB implementation of [`ActivityRepository`].

use agrolink_core::error::AgrolinkResult;
use agrolink_core::models::activity::{ActivityAction, CreateActivity, UserActivity};
use agrolink_core::repository::{ActivityRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ActivityRow {
    user_id: Option<String>,
    action: String,
    description: String,
    metadata: serde_json::Value,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ActivityRowWithId {
    record_id: String,
    user_id: Option<String>,
    action: String,
    description: String,
    metadata: serde_json::Value,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_action(s: &str) -> Result<ActivityAction, DbError> {
    ActivityAction::parse(s)
        .ok_or_else(|| DbError::Migration(format!("unknown activity action: {s}")))
}

fn parse_user_id(user_id: Option<String>) -> Result<Option<Uuid>, DbError> {
    user_id
        .map(|s| {
            Uuid::parse_str(&s).map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))
        })
        .transpose()
}

impl ActivityRow {
    fn into_activity(self, id: Uuid) -> Result<UserActivity, DbError> {
        Ok(UserActivity {
            id,
            user_id: parse_user_id(self.user_id)?,
            action: parse_action(&self.action)?,
            description: self.description,
            metadata: self.metadata,
            ip_address: self.ip_address,
            created_at: self.created_at,
        })
    }
}

impl ActivityRowWithId {
    fn try_into_activity(self) -> Result<UserActivity, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(UserActivity {
            id,
            user_id: parse_user_id(self.user_id)?,
            action: parse_action(&self.action)?,
            description: self.description,
            metadata: self.metadata,
            ip_address: self.ip_address,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the activity repository.
///
/// The table is append-only (schema forbids update/delete); this
/// repository only ever inserts and reads.
#[derive(Clone)]
pub struct SurrealActivityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealActivityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ActivityRepository for SurrealActivityRepository<C> {
    async fn append(&self, input: CreateActivity) -> AgrolinkResult<UserActivity> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('user_activity', $id) SET \
                 user_id = $user_id, \
                 action = $action, \
                 description = $description, \
                 metadata = $metadata, \
                 ip_address = $ip_address",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.map(|u| u.to_string())))
            .bind(("action", input.action.as_str()))
            .bind(("description", input.description))
            .bind(("metadata", metadata))
            .bind(("ip_address", input.ip_address))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ActivityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_activity".into(),
            id: id_str,
        })?;

        Ok(row.into_activity(id)?)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        action: Option<ActivityAction>,
        pagination: Pagination,
    ) -> AgrolinkResult<PaginatedResult<UserActivity>> {
        let mut conds = vec!["user_id = $user_id"];
        if action.is_some() {
            conds.push("action = $action");
        }
        let where_clause = conds.join(" AND ");

        let count_sql =
            format!("SELECT count() AS total FROM user_activity WHERE {where_clause} GROUP ALL");
        let mut count_builder = self
            .db
            .query(&count_sql)
            .bind(("user_id", user_id.to_string()));
        if let Some(action) = action {
            count_builder = count_builder.bind(("action", action.as_str()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        // Most recent first.
        let sql = format!(
            "SELECT meta::id(id) AS record_id, * FROM user_activity \
             WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT $limit START $offset",
        );
        let mut builder = self
            .db
            .query(&sql)
            .bind(("user_id", user_id.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(action) = action {
            builder = builder.bind(("action", action.as_str()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ActivityRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_activity())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
