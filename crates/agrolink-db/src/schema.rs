//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Coordinates are stored as a
//! pair of floats (`location_lat`, `location_lng`); there is no
//! native geographic type in play, so radius queries are resolved
//! in-process by the user repository.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['farmer', 'buyer', 'cooperative'];
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD phone_number ON TABLE user TYPE string;
DEFINE FIELD first_name ON TABLE user TYPE option<string>;
DEFINE FIELD last_name ON TABLE user TYPE option<string>;
DEFINE FIELD location_lat ON TABLE user TYPE option<float>;
DEFINE FIELD location_lng ON TABLE user TYPE option<float>;
DEFINE FIELD location_text ON TABLE user TYPE option<string>;
DEFINE FIELD farm_size ON TABLE user TYPE option<float>;
DEFINE FIELD business_name ON TABLE user TYPE option<string>;
DEFINE FIELD bio ON TABLE user TYPE option<string>;
DEFINE FIELD profile_photo ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_phone ON TABLE user COLUMNS phone_number UNIQUE;
DEFINE INDEX idx_user_role ON TABLE user COLUMNS role;

-- =======================================================================
-- Trust badges (one-to-one with user)
-- =======================================================================
DEFINE TABLE trust_badge SCHEMAFULL;
DEFINE FIELD user_id ON TABLE trust_badge TYPE string;
DEFINE FIELD phone_verified ON TABLE trust_badge TYPE bool \
    DEFAULT true;
DEFINE FIELD id_verified ON TABLE trust_badge TYPE bool DEFAULT false;
DEFINE FIELD location_verified ON TABLE trust_badge TYPE bool \
    DEFAULT false;
DEFINE FIELD community_trusted ON TABLE trust_badge TYPE bool \
    DEFAULT false;
DEFINE FIELD transaction_count ON TABLE trust_badge TYPE int \
    DEFAULT 0;
DEFINE FIELD average_rating ON TABLE trust_badge TYPE option<float> \
    ASSERT $value = NONE OR ($value >= 0 AND $value <= 5);
DEFINE FIELD badge_level ON TABLE trust_badge TYPE string \
    ASSERT $value IN ['new_user', 'bronze', 'silver', 'gold', \
    'diamond'];
DEFINE FIELD created_at ON TABLE trust_badge TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE trust_badge TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_trust_badge_user ON TABLE trust_badge \
    COLUMNS user_id UNIQUE;

-- =======================================================================
-- User activity (append-only)
-- =======================================================================
DEFINE TABLE user_activity SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD user_id ON TABLE user_activity TYPE option<string>;
DEFINE FIELD action ON TABLE user_activity TYPE string \
    ASSERT $value IN ['login', 'logout', 'profile_update', 'search', \
    'badge_recompute'];
DEFINE FIELD description ON TABLE user_activity TYPE string;
DEFINE FIELD metadata ON TABLE user_activity TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD ip_address ON TABLE user_activity TYPE option<string>;
DEFINE FIELD created_at ON TABLE user_activity TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_activity_user_time ON TABLE user_activity \
    COLUMNS user_id, created_at;
";

// -----------------------------------------------------------------------
// Migration runner
// -----------------------------------------------------------------------

/// Apply any pending schema migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
