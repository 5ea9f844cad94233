//! Integration tests for the profile service against in-memory
//! SurrealDB repositories.

use agrolink_core::AgrolinkError;
use agrolink_core::models::activity::ActivityAction;
use agrolink_core::models::badge::BadgeLevel;
use agrolink_core::models::user::{CreateProfile, Role};
use agrolink_core::repository::UserRepository;
use agrolink_db::repository::{
    SurrealActivityRepository, SurrealBadgeRepository, SurrealUserRepository,
};
use agrolink_profile::{ProfileConfig, ProfileService, UpdateProfileInput};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = ProfileService<
    SurrealUserRepository<Db>,
    SurrealBadgeRepository<Db>,
    SurrealActivityRepository<Db>,
>;

async fn setup() -> (Service, SurrealUserRepository<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrolink_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let service = ProfileService::new(
        users.clone(),
        SurrealBadgeRepository::new(db.clone()),
        SurrealActivityRepository::new(db),
        ProfileConfig::default(),
    );
    (service, users)
}

async fn create_user(users: &SurrealUserRepository<Db>, role: Role, email: &str, phone: &str) -> Uuid {
    let user = users
        .create(CreateProfile {
            role,
            email: email.into(),
            phone_number: phone.into(),
            first_name: Some("Ada".into()),
            last_name: Some("Okafor".into()),
        })
        .await
        .unwrap();
    user.id
}

fn field_names(err: &AgrolinkError) -> Vec<&str> {
    match err {
        AgrolinkError::Validation(errors) => errors.iter().map(|e| e.field.as_str()).collect(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn update_profile_applies_fields_and_scores_completion() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let view = service
        .update_profile(
            user_id,
            UpdateProfileInput {
                location_lat: Some("6.5244".into()),
                location_lng: Some("3.3792".into()),
                location_text: Some("Ikorodu, Lagos".into()),
                bio: Some("Maize and cassava farmer".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    // base 10 + names 20 + coordinates 20 + location text 10 + bio 10
    assert_eq!(view.profile_completion, 70);
    let location = view.profile.location.unwrap();
    assert!((location.latitude - 6.5244).abs() < 1e-9);
    assert!((location.longitude - 3.3792).abs() < 1e-9);
    assert_eq!(view.profile.location_text.as_deref(), Some("Ikorodu, Lagos"));
}

#[tokio::test]
async fn update_profile_rejects_malformed_coordinates() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let err = service
        .update_profile(
            user_id,
            UpdateProfileInput {
                location_lat: Some("not-a-number".into()),
                location_lng: Some("3.3792".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(field_names(&err), ["location_lat"]);
}

#[tokio::test]
async fn update_profile_ignores_a_lone_latitude() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let view = service
        .update_profile(
            user_id,
            UpdateProfileInput {
                location_lat: Some("6.5244".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert!(view.profile.location.is_none());
}

#[tokio::test]
async fn farm_size_is_rejected_for_buyers() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Buyer, "bola@test.com", "+2348022222222").await;

    let err = service
        .update_profile(
            user_id,
            UpdateProfileInput {
                farm_size: Some(3.5),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(field_names(&err), ["farm_size"]);
}

#[tokio::test]
async fn business_name_is_rejected_for_farmers() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let err = service
        .update_profile(
            user_id,
            UpdateProfileInput {
                business_name: Some("Okafor Farms Ltd".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(field_names(&err), ["business_name"]);
}

#[tokio::test]
async fn all_offending_fields_are_reported_together() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let err = service
        .update_profile(
            user_id,
            UpdateProfileInput {
                business_name: Some("Okafor Farms Ltd".into()),
                location_lat: Some("north".into()),
                location_lng: Some("east".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(
        field_names(&err),
        ["business_name", "location_lat", "location_lng"]
    );
}

#[tokio::test]
async fn overlong_bio_is_rejected() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let err = service
        .update_profile(
            user_id,
            UpdateProfileInput {
                bio: Some("x".repeat(501)),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(field_names(&err), ["bio"]);
}

#[tokio::test]
async fn update_for_unknown_user_is_not_found() {
    let (service, _users) = setup().await;

    let err = service
        .update_profile(Uuid::new_v4(), UpdateProfileInput::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AgrolinkError::NotFound { .. }));
}

#[tokio::test]
async fn update_profile_records_an_audit_event() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    service
        .update_profile(
            user_id,
            UpdateProfileInput {
                bio: Some("Maize farmer".into()),
                ..Default::default()
            },
            Some("41.58.0.1".into()),
        )
        .await
        .unwrap();

    let page = service
        .list_activity(user_id, Some(ActivityAction::ProfileUpdate), 1)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].ip_address.as_deref(), Some("41.58.0.1"));
}

#[tokio::test]
async fn transaction_stats_update_promotes_and_demotes() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let badge = service
        .update_transaction_stats(user_id, Some(5), Some(Some(4.0)))
        .await
        .unwrap();
    assert_eq!(badge.badge_level, BadgeLevel::Bronze);

    // Corrected stats legitimately demote.
    let badge = service
        .update_transaction_stats(user_id, None, Some(Some(3.9)))
        .await
        .unwrap();
    assert_eq!(badge.badge_level, BadgeLevel::NewUser);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let err = service
        .update_transaction_stats(user_id, None, Some(Some(5.5)))
        .await
        .unwrap_err();
    assert_eq!(field_names(&err), ["average_rating"]);
}

#[tokio::test]
async fn recompute_badge_is_idempotent() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let first = service.recompute_badge(user_id).await.unwrap();
    let second = service.recompute_badge(user_id).await.unwrap();
    assert_eq!(first.badge_level, BadgeLevel::NewUser);
    assert_eq!(second.badge_level, BadgeLevel::NewUser);
}

#[tokio::test]
async fn recompute_badge_for_unknown_user_is_not_found() {
    let (service, _users) = setup().await;

    let err = service.recompute_badge(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AgrolinkError::NotFound { .. }));
}

#[tokio::test]
async fn badge_status_for_a_new_user() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    let status = service.badge_status(user_id).await.unwrap();
    assert_eq!(status.current_badge, BadgeLevel::NewUser);
    assert_eq!(status.badge_display, "New User");
    assert_eq!(status.transaction_stats.next_badge, BadgeLevel::Bronze);
    assert_eq!(status.transaction_stats.transactions_needed, 20);
    assert_eq!(status.transaction_stats.average_rating, 0.0);
    assert!(status.verifications.phone_verified);
    assert_eq!(status.verification_steps.len(), 2);
    assert!(!status.benefits.current.is_empty());
    assert!(!status.benefits.next_level.is_empty());
}

#[tokio::test]
async fn badge_status_at_diamond_has_no_next_tier() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    service
        .update_transaction_stats(user_id, Some(150), Some(Some(4.9)))
        .await
        .unwrap();

    let status = service.badge_status(user_id).await.unwrap();
    assert_eq!(status.current_badge, BadgeLevel::Diamond);
    assert_eq!(status.transaction_stats.next_badge, BadgeLevel::Diamond);
    assert_eq!(status.transaction_stats.transactions_needed, 50);
    assert!(status.benefits.next_level.is_empty());
}

#[tokio::test]
async fn list_activity_pages_from_one() {
    let (service, users) = setup().await;
    let user_id = create_user(&users, Role::Farmer, "ada@test.com", "+2348011111111").await;

    service
        .update_profile(
            user_id,
            UpdateProfileInput {
                bio: Some("First".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    // Page 0 is treated as page 1.
    let page = service.list_activity(user_id, None, 0).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.offset, 0);
}
