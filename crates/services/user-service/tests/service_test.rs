//! User service tests against an in-memory SQLite database.

use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use common::AppError;
use domain::{CreateUser, UpdateUser};
use user_service_lib::infra::Migrator;
use user_service_lib::repository::{CrudRepository, UserStore};
use user_service_lib::service::{ScopedUserService, UserManager, UserService};

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
async fn manager_from_session_builds_its_repository() {
    let db = create_test_db().await;
    let service = UserManager::from_session(&db);

    assert!(service.session().is_some());

    let user = service
        .create_user(CreateUser::new("Alice", "a@example.com"))
        .await
        .unwrap();
    assert_eq!(service.get_user(user.id).await.unwrap().unwrap().name, "Alice");
    assert_eq!(
        service.get_user_by_email("a@example.com").await.unwrap().unwrap().id,
        user.id
    );
}

#[tokio::test]
async fn manager_with_existing_repository_keeps_session() {
    let db = create_test_db().await;
    let repo = Arc::new(UserStore::new(&db));
    let service = UserManager::with_session(repo.clone(), &db);

    service
        .create_user(CreateUser::new("Alice", "a@example.com"))
        .await
        .unwrap();

    // Both handles see the same store
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
    assert!(service.session().is_some());
}

#[tokio::test]
async fn scoped_service_alice_scenario() {
    let db = create_test_db().await;
    let service = ScopedUserService::new(db);

    let alice = service
        .create_user(CreateUser::new("Alice", "a@example.com"))
        .await
        .unwrap();

    let err = service
        .create_user(CreateUser::new("Alice", "a@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());
    assert_eq!(service.get_all_users().await.unwrap().len(), 1);

    let renamed = service
        .update_user(alice.id, UpdateUser::name("Alicia"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Alicia");
    assert_eq!(renamed.email, "a@example.com");

    assert!(service.delete_user(alice.id).await.unwrap());
    assert!(service.get_user(alice.id).await.unwrap().is_none());
    assert!(!service.delete_user(alice.id).await.unwrap());
}

#[tokio::test]
async fn failed_operation_is_rolled_back() {
    let db = create_test_db().await;
    let service = ScopedUserService::new(db);

    let result: Result<(), AppError> = service
        .transaction(|ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.create(CreateUser::new("Ann", "ann@example.com")).await?;
                Err(AppError::internal("abort after insert"))
            })
        })
        .await;

    assert!(result.is_err());
    assert!(service.get_all_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn successful_transaction_commits_every_write() {
    let db = create_test_db().await;
    let service = ScopedUserService::new(db);

    let ids = service
        .transaction(|ctx| {
            Box::pin(async move {
                let users = ctx.users();
                let ann = users.create(CreateUser::new("Ann", "ann@example.com")).await?;
                let bob = users.create(CreateUser::new("Bob", "bob@example.com")).await?;
                Ok((ann.id, bob.id))
            })
        })
        .await
        .unwrap();

    assert!(service.get_user(ids.0).await.unwrap().is_some());
    assert!(service.get_user(ids.1).await.unwrap().is_some());
}

#[tokio::test]
async fn duplicate_inside_transaction_discards_earlier_writes() {
    let db = create_test_db().await;
    let service = ScopedUserService::new(db);

    let err = service
        .transaction(|ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.create(CreateUser::new("Ann", "ann@example.com")).await?;
                users.create(CreateUser::new("Ann", "ann@example.com")).await
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateEmail(_)));
    assert!(service.get_user_by_email("ann@example.com").await.unwrap().is_none());
}
