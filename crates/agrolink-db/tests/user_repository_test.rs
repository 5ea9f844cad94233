//! Integration tests for the user repository using in-memory
//! SurrealDB.

use agrolink_core::error::AgrolinkError;
use agrolink_core::geo::Coordinates;
use agrolink_core::models::user::{CreateProfile, Role, RoleDetails, UpdateProfile};
use agrolink_core::repository::{BadgeRepository, Pagination, UserRepository};
use agrolink_db::repository::{SurrealBadgeRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrolink_db::run_migrations(&db).await.unwrap();
    db
}

fn farmer_input(email: &str, phone: &str) -> CreateProfile {
    CreateProfile {
        role: Role::Farmer,
        email: email.into(),
        phone_number: phone.into(),
        first_name: Some("John".into()),
        last_name: Some("Farmer".into()),
    }
}

#[tokio::test]
async fn create_and_get_profile() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let created = repo
        .create(farmer_input("farmer@test.com", "+2348012345678"))
        .await
        .unwrap();

    assert_eq!(created.role(), Role::Farmer);
    assert_eq!(created.first_name.as_deref(), Some("John"));
    assert_eq!(created.location, None);
    assert_eq!(created.details, RoleDetails::Farmer { farm_size: None });

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_normalizes_local_phone_numbers() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let created = repo
        .create(farmer_input("farmer@test.com", "08012345678"))
        .await
        .unwrap();

    assert_eq!(created.phone_number, "+2348012345678");
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_id(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AgrolinkError::NotFound { .. }));
}

#[tokio::test]
async fn update_applies_partial_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let created = repo
        .create(farmer_input("farmer@test.com", "+2348012345678"))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateProfile {
                location: Some(Coordinates::new(3.3792, 6.5244)),
                location_text: Some("Lagos, Nigeria".into()),
                farm_size: Some(5.5),
                bio: Some("I grow organic vegetables".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let location = updated.location.unwrap();
    assert!((location.latitude - 6.5244).abs() < 1e-9);
    assert!((location.longitude - 3.3792).abs() < 1e-9);
    assert_eq!(updated.location_text.as_deref(), Some("Lagos, Nigeria"));
    assert_eq!(updated.bio.as_deref(), Some("I grow organic vegetables"));
    assert_eq!(updated.details, RoleDetails::Farmer { farm_size: Some(5.5) });
    // Untouched fields survive.
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.first_name.as_deref(), Some("John"));
}

#[tokio::test]
async fn delete_removes_user_and_badge() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db.clone());
    let badges = SurrealBadgeRepository::new(db);

    let created = repo
        .create(farmer_input("farmer@test.com", "+2348012345678"))
        .await
        .unwrap();

    // Badge exists while the user does.
    badges.get_by_user(created.id).await.unwrap();

    repo.delete(created.id).await.unwrap();

    let err = repo.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, AgrolinkError::NotFound { .. }));
    let err = badges.get_by_user(created.id).await.unwrap_err();
    assert!(matches!(err, AgrolinkError::NotFound { .. }));
}

#[tokio::test]
async fn list_pages_through_users() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..3 {
        repo.create(farmer_input(
            &format!("farmer{i}@test.com"),
            &format!("+234801234567{i}"),
        ))
        .await
        .unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 3);
    assert!(page.has_more());

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
    assert!(!rest.has_more());
}
