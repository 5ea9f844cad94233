//! Integration tests for the activity log repository using in-memory
//! SurrealDB.

use std::time::Duration;

use agrolink_core::models::activity::{ActivityAction, CreateActivity};
use agrolink_core::repository::{ActivityRepository, Pagination};
use agrolink_db::repository::SurrealActivityRepository;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> SurrealActivityRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agrolink_db::run_migrations(&db).await.unwrap();
    SurrealActivityRepository::new(db)
}

fn event(user_id: Option<Uuid>, action: ActivityAction, description: &str) -> CreateActivity {
    CreateActivity {
        user_id,
        action,
        description: description.into(),
        metadata: None,
        ip_address: None,
    }
}

#[tokio::test]
async fn append_returns_the_stored_event() {
    let repo = setup().await;
    let user_id = Uuid::new_v4();

    let activity = repo
        .append(CreateActivity {
            user_id: Some(user_id),
            action: ActivityAction::Login,
            description: "signed in".into(),
            metadata: Some(json!({"device": "android"})),
            ip_address: Some("41.58.0.1".into()),
        })
        .await
        .unwrap();

    assert_eq!(activity.user_id, Some(user_id));
    assert_eq!(activity.action, ActivityAction::Login);
    assert_eq!(activity.description, "signed in");
    assert_eq!(activity.metadata, json!({"device": "android"}));
    assert_eq!(activity.ip_address.as_deref(), Some("41.58.0.1"));
}

#[tokio::test]
async fn list_for_user_is_newest_first() {
    let repo = setup().await;
    let user_id = Uuid::new_v4();

    for description in ["first", "second", "third"] {
        repo.append(event(Some(user_id), ActivityAction::ProfileUpdate, description))
            .await
            .unwrap();
        // created_at has finite resolution; space the appends out so
        // the ordering assertion is meaningful.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let page = repo
        .list_for_user(user_id, None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    let descriptions: Vec<&str> = page.items.iter().map(|a| a.description.as_str()).collect();
    assert_eq!(descriptions, ["third", "second", "first"]);
}

#[tokio::test]
async fn list_for_user_filters_by_action() {
    let repo = setup().await;
    let user_id = Uuid::new_v4();

    repo.append(event(Some(user_id), ActivityAction::Login, "in"))
        .await
        .unwrap();
    repo.append(event(Some(user_id), ActivityAction::Search, "looked around"))
        .await
        .unwrap();
    repo.append(event(Some(user_id), ActivityAction::Logout, "out"))
        .await
        .unwrap();

    let page = repo
        .list_for_user(user_id, Some(ActivityAction::Search), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].description, "looked around");
}

#[tokio::test]
async fn list_for_user_excludes_other_users_and_anonymous_events() {
    let repo = setup().await;
    let user_id = Uuid::new_v4();

    repo.append(event(Some(user_id), ActivityAction::Login, "mine"))
        .await
        .unwrap();
    repo.append(event(Some(Uuid::new_v4()), ActivityAction::Login, "theirs"))
        .await
        .unwrap();
    repo.append(event(None, ActivityAction::Login, "anonymous"))
        .await
        .unwrap();

    let page = repo
        .list_for_user(user_id, None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].description, "mine");
}

#[tokio::test]
async fn list_for_user_paginates() {
    let repo = setup().await;
    let user_id = Uuid::new_v4();

    for i in 0..5 {
        repo.append(event(
            Some(user_id),
            ActivityAction::Search,
            &format!("search {i}"),
        ))
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let page = repo
        .list_for_user(user_id, None, Pagination { offset: 2, limit: 2 })
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].description, "search 2");
    assert_eq!(page.items[1].description, "search 1");
    assert!(page.has_more());
}
