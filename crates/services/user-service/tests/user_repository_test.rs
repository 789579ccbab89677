//! Repository tests against an in-memory SQLite database.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};

use common::{AppError, DatabaseConfig, LogConfig};
use domain::{NewUser, PasswordHash, UserId, UserRecord, UserRole, UserStatus};
use user_service_lib::config::UserServiceConfig;
use user_service_lib::infra::Database;
use user_service_lib::repository::entities::user;
use user_service_lib::repository::{UserRepository, UserStore};
use user_service_lib::service::{UserManager, UserService};

async fn setup() -> (Database, UserStore) {
    let db = Database::connect_and_prepare(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    let store = UserStore::new(db.get_connection());
    (db, store)
}

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: PasswordHash::from_hash("$2a$10$hash"),
        employee_number: Some("E-1001".to_string()),
    }
}

#[tokio::test]
async fn test_create_assigns_id_and_keeps_fields() {
    let (_db, store) = setup().await;
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let record = UserRecord::new_at(new_user("Alice", "a@x.com"), created_at);
    assert_eq!(record.id(), None);

    let saved = store.create(record).await.unwrap();

    assert_eq!(saved.id(), Some(UserId::new(1)));
    assert_eq!(saved.name(), "Alice");
    assert_eq!(saved.email(), "a@x.com");
    assert_eq!(saved.password_hash().as_str(), "$2a$10$hash");
    assert_eq!(saved.employee_number(), Some("E-1001"));
    assert_eq!(saved.status(), UserStatus::Pending);
    assert_eq!(saved.role(), UserRole::Researcher);
    assert_eq!(saved.created_at(), created_at);
}

#[tokio::test]
async fn test_ids_are_unique() {
    let (_db, store) = setup().await;

    let first = store.create(UserRecord::new(new_user("A", "a@x.com"))).await.unwrap();
    let second = store.create(UserRecord::new(new_user("B", "b@x.com"))).await.unwrap();

    assert!(first.id().is_some());
    assert!(second.id().is_some());
    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn test_duplicate_email_is_constraint_violation() {
    let (_db, store) = setup().await;
    store.create(UserRecord::new(new_user("Alice", "a@x.com"))).await.unwrap();

    let result = store.create(UserRecord::new(new_user("Other", "a@x.com"))).await;

    assert!(matches!(result, Err(AppError::ConstraintViolation(ref f)) if f == "email"));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_persisted_record() {
    let (_db, store) = setup().await;
    let saved = store.create(UserRecord::new(new_user("Alice", "a@x.com"))).await.unwrap();

    let result = store.create(saved).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_employee_number_is_optional_and_not_unique() {
    let (_db, store) = setup().await;
    let mut no_number = new_user("A", "a@x.com");
    no_number.employee_number = None;

    let a = store.create(UserRecord::new(no_number)).await.unwrap();
    store.create(UserRecord::new(new_user("B", "b@x.com"))).await.unwrap();
    store.create(UserRecord::new(new_user("C", "c@x.com"))).await.unwrap();

    assert_eq!(a.employee_number(), None);
    assert_eq!(store.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_find_by_email_and_id() {
    let (_db, store) = setup().await;
    let saved = store.create(UserRecord::new(new_user("Alice", "a@x.com"))).await.unwrap();
    let id = saved.id().unwrap();

    let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
    let by_id = store.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(by_email, saved);
    assert_eq!(by_id, saved);
    assert!(store.find_by_email("nobody@x.com").await.unwrap().is_none());
    assert!(store.find_by_id(UserId::new(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_status_keeps_id_email_created_at() {
    let (_db, store) = setup().await;
    let saved = store.create(UserRecord::new(new_user("Alice", "a@x.com"))).await.unwrap();
    let (id, created_at) = (saved.id(), saved.created_at());

    let mut changed = saved.clone();
    changed.set_status(UserStatus::Approved);
    let updated = store.update(changed).await.unwrap();

    assert_eq!(updated.status(), UserStatus::Approved);
    assert_eq!(updated.id(), id);
    assert_eq!(updated.email(), "a@x.com");
    assert_eq!(updated.created_at(), created_at);

    let reloaded = store.find_by_id(id.unwrap()).await.unwrap().unwrap();
    assert_eq!(reloaded, updated);
}

#[tokio::test]
async fn test_update_email_collision_is_constraint_violation() {
    let (_db, store) = setup().await;
    store.create(UserRecord::new(new_user("A", "a@x.com"))).await.unwrap();
    let mut b = store.create(UserRecord::new(new_user("B", "b@x.com"))).await.unwrap();

    b.set_email("a@x.com");
    let result = store.update(b).await;

    assert!(result.unwrap_err().is_constraint_violation());
}

#[tokio::test]
async fn test_update_requires_persisted_record() {
    let (_db, store) = setup().await;

    let result = store.update(UserRecord::new(new_user("A", "a@x.com"))).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let (_db, store) = setup().await;
    let mut ghost = UserRecord::new(new_user("Ghost", "g@x.com"));
    ghost.assign_id(UserId::new(42)).unwrap();

    let result = store.update(ghost).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_list_by_status() {
    let (_db, store) = setup().await;
    store.create(UserRecord::new(new_user("A", "a@x.com"))).await.unwrap();
    let mut b = store.create(UserRecord::new(new_user("B", "b@x.com"))).await.unwrap();
    store.create(UserRecord::new(new_user("C", "c@x.com"))).await.unwrap();

    b.set_status(UserStatus::Approved);
    store.update(b).await.unwrap();

    let pending: Vec<String> = store
        .list_by_status(UserStatus::Pending)
        .await
        .unwrap()
        .iter()
        .map(|u| u.email().to_string())
        .collect();
    let approved = store.list_by_status(UserStatus::Approved).await.unwrap();

    assert_eq!(pending, vec!["a@x.com", "c@x.com"]);
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].email(), "b@x.com");
}

#[tokio::test]
async fn test_unknown_stored_status_is_rejected() {
    let (db, store) = setup().await;
    store.create(UserRecord::new(new_user("A", "a@x.com"))).await.unwrap();

    let backend = db.connection().get_database_backend();
    db.connection()
        .execute(Statement::from_string(
            backend,
            "UPDATE users SET status = 'REJECTED'".to_string(),
        ))
        .await
        .unwrap();

    let result = store.find_by_email("a@x.com").await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_unknown_stored_role_spelling_is_rejected() {
    let (db, store) = setup().await;
    store.create(UserRecord::new(new_user("A", "a@x.com"))).await.unwrap();

    let backend = db.connection().get_database_backend();
    db.connection()
        .execute(Statement::from_string(
            backend,
            "UPDATE users SET role = 'admin'".to_string(),
        ))
        .await
        .unwrap();

    let result = store.find_by_email("a@x.com").await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_ids_beyond_32_bits_round_trip() {
    let (db, store) = setup().await;
    let big_id: i64 = 3_000_000_000;

    user::ActiveModel {
        id: Set(big_id),
        name: Set("Big".to_string()),
        email: Set("big@x.com".to_string()),
        password_hash: Set("hash".to_string()),
        employee_number: Set(None),
        status: Set("PENDING".to_string()),
        role: Set("RESEARCHER".to_string()),
        created_at: Set(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
    .insert(db.connection())
    .await
    .unwrap();

    let by_email = store.find_by_email("big@x.com").await.unwrap().unwrap();
    assert_eq!(by_email.id(), Some(UserId::new(big_id)));

    let by_id = store.find_by_id(UserId::new(big_id)).await.unwrap().unwrap();
    assert_eq!(by_id.email(), "big@x.com");

    let next = store.create(UserRecord::new(new_user("Next", "next@x.com"))).await.unwrap();
    assert!(next.id().unwrap().value() > big_id);
}

#[tokio::test]
async fn test_build_service_leaves_schema_alone() {
    let config = UserServiceConfig {
        database: DatabaseConfig::in_memory(),
        log: LogConfig::default(),
    };
    let service = user_service_lib::build_service(&config).await.unwrap();

    let result = service.list_pending().await;

    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let (db, _store) = setup().await;

    db.ensure_schema().await.unwrap();
    db.ping().await.unwrap();
}

#[tokio::test]
async fn test_registration_and_approval_flow() {
    let (db, _store) = setup().await;
    let service = UserManager::new(Arc::new(UserStore::new(db.get_connection())));

    let alice = service.register(new_user("Alice", "a@x.com")).await.unwrap();
    assert_eq!(alice.id(), Some(UserId::new(1)));

    let duplicate = service.register(new_user("Mallory", "a@x.com")).await;
    assert!(duplicate.unwrap_err().is_constraint_violation());

    assert_eq!(service.list_pending().await.unwrap().len(), 1);

    let approved = service.approve("a@x.com").await.unwrap();
    assert_eq!(approved.status(), UserStatus::Approved);
    assert_eq!(approved.id(), alice.id());
    assert_eq!(approved.created_at(), alice.created_at());
    assert!(service.list_pending().await.unwrap().is_empty());

    let admin = service.assign_role("a@x.com", UserRole::Admin).await.unwrap();
    assert!(admin.role().is_admin());
    assert_eq!(admin.status(), UserStatus::Approved);
}
