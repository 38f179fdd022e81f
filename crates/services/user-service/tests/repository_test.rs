//! Repository tests against an in-memory SQLite database.

use sea_orm::{Database, DatabaseConnection, TransactionTrait};
use sea_orm_migration::MigratorTrait;

use common::AppError;
use domain::{CreateUser, UpdateUser};
use user_service_lib::infra::Migrator;
use user_service_lib::repository::entities::{UserActiveModel, UserEntity};
use user_service_lib::repository::{
    is_unique_violation, BaseRepository, CrudRepository, UserRepository, UserStore,
};

type RawUsers<'c> = BaseRepository<'c, DatabaseConnection, UserEntity, UserActiveModel, CreateUser, UpdateUser>;

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

#[tokio::test]
async fn alice_lifecycle() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);

    let alice = repo
        .create(CreateUser::new("Alice", "a@example.com"))
        .await
        .unwrap();
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.email, "a@example.com");
    assert!(alice.id > 0);

    let err = repo
        .create(CreateUser::new("Other Alice", "a@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail(ref email) if email == "a@example.com"));

    let all = repo.get_all().await.unwrap();
    assert_eq!(all.iter().filter(|u| u.email == "a@example.com").count(), 1);

    let renamed = repo
        .update(alice.id, UpdateUser::name("Alicia"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Alicia");
    assert_eq!(renamed.email, "a@example.com");

    assert!(repo.delete(alice.id).await.unwrap());
    assert!(repo.get(alice.id).await.unwrap().is_none());
}

#[tokio::test]
async fn create_assigns_distinct_ids_and_timestamps() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);
    let before = chrono::Utc::now() - chrono::Duration::seconds(1);

    let first = repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();
    let second = repo.create(CreateUser::new("Bob", "bob@example.com")).await.unwrap();

    assert_ne!(first.id, second.id);
    assert!(first.created_at >= before);
    assert!(first.updated_at >= first.created_at);

    let fetched = repo.get(second.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, second.id);
    assert_eq!(fetched.name, "Bob");
    assert_eq!(fetched.email, "bob@example.com");
}

#[tokio::test]
async fn get_all_counts_created_users() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);

    assert!(repo.get_all().await.unwrap().is_empty());

    for i in 0..5 {
        repo.create(CreateUser::new(format!("User {i}"), format!("user{i}@example.com")))
            .await
            .unwrap();
    }

    assert_eq!(repo.get_all().await.unwrap().len(), 5);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);
    let created = repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();
    let stored = repo.get(created.id).await.unwrap().unwrap();

    let updated = repo
        .update(created.id, UpdateUser::email("ann@example.org"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.name, stored.name);
    assert_eq!(updated.created_at, stored.created_at);
    assert_eq!(updated.email, "ann@example.org");
    assert!(updated.updated_at >= stored.updated_at);
}

#[tokio::test]
async fn missing_ids_are_absent_not_errors() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);
    repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();

    assert!(repo.get(999).await.unwrap().is_none());
    assert!(repo.update(999, UpdateUser::name("Ghost")).await.unwrap().is_none());
    assert!(!repo.delete(999).await.unwrap());
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_succeeds_exactly_once() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);
    let user = repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();

    assert!(repo.delete(user.id).await.unwrap());
    assert!(!repo.delete(user.id).await.unwrap());
    assert!(repo.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn email_change_to_taken_address_is_duplicate() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);
    repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();
    let bob = repo.create(CreateUser::new("Bob", "bob@example.com")).await.unwrap();

    let err = repo
        .update(bob.id, UpdateUser::email("ann@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());

    // Re-setting one's own email is not a conflict
    let same = repo
        .update(bob.id, UpdateUser::email("bob@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(same.email, "bob@example.com");
}

#[tokio::test]
async fn email_update_on_missing_user_is_absent() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);
    repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();

    let result = repo
        .update(999, UpdateUser::email("ann@example.com"))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_by_email_finds_exact_match() {
    let db = create_test_db().await;
    let repo = UserStore::new(&db);
    let ann = repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();

    assert_eq!(repo.get_by_email("ann@example.com").await.unwrap().unwrap().id, ann.id);
    assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn storage_constraint_rejects_duplicates_the_base_lets_through() {
    let db = create_test_db().await;
    let raw: RawUsers<'_> = BaseRepository::new(&db);

    raw.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();
    let err = raw
        .create(CreateUser::new("Ann Again", "ann@example.com"))
        .await
        .unwrap_err();

    match err {
        AppError::Database(db_err) => assert!(is_unique_violation(&db_err)),
        other => panic!("expected a database error, got {other:?}"),
    }
    assert_eq!(raw.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn repository_runs_inside_caller_transaction() {
    let db = create_test_db().await;

    let txn = db.begin().await.unwrap();
    {
        let repo = UserStore::new(&txn);
        repo.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }
    txn.rollback().await.unwrap();

    assert!(UserStore::new(&db).get_all().await.unwrap().is_empty());
}
