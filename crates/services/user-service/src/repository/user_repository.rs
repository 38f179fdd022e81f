//! User repository with application-level email uniqueness.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use common::{AppError, AppResult};
use domain::{CreateUser, UpdateUser, User, UserId};

use super::base::{is_unique_violation, BaseRepository, CrudRepository};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};

#[cfg(any(test, feature = "test-utils"))]
use mockall::mock;

/// User repository trait for dependency injection.
///
/// Extends the generic CRUD contract with a lookup by the unique email.
/// Implementations must reject a `create` (and an email-changing `update`)
/// that would duplicate an existing email with `AppError::DuplicateEmail`.
#[async_trait]
pub trait UserRepository:
    CrudRepository<Id = UserId, Entity = User, Create = CreateUser, Update = UpdateUser>
{
    /// Find user by email address
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[cfg(any(test, feature = "test-utils"))]
mock! {
    pub UserRepository {}

    #[async_trait]
    impl CrudRepository for UserRepository {
        type Id = UserId;
        type Entity = User;
        type Create = CreateUser;
        type Update = UpdateUser;

        async fn get(&self, id: UserId) -> AppResult<Option<User>>;
        async fn get_all(&self) -> AppResult<Vec<User>>;
        async fn create(&self, payload: CreateUser) -> AppResult<User>;
        async fn update(&self, id: UserId, payload: UpdateUser) -> AppResult<Option<User>>;
        async fn delete(&self, id: UserId) -> AppResult<bool>;
    }

    #[async_trait]
    impl UserRepository for UserRepository {
        async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    }
}

type UserBase<'c, C> = BaseRepository<'c, C, UserEntity, ActiveModel, CreateUser, UpdateUser>;

/// SeaORM-backed user repository.
///
/// Runs on a borrowed connection, so the duplicate check and the insert
/// share whatever transaction the caller opened.
pub struct UserStore<'c, C> {
    base: UserBase<'c, C>,
}

impl<'c, C> UserStore<'c, C>
where
    C: ConnectionTrait,
{
    /// Create new repository instance over `conn`
    pub fn new(conn: &'c C) -> Self {
        Self {
            base: BaseRepository::new(conn),
        }
    }

    /// Fail with `DuplicateEmail` when `email` belongs to a user other than `owner`
    async fn ensure_email_free(&self, email: &str, owner: UserId) -> AppResult<()> {
        let taken = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Id.ne(owner))
            .one(self.base.connection())
            .await?;

        if taken.is_some() {
            tracing::debug!(email, "email already registered");
            return Err(AppError::duplicate_email(email));
        }
        Ok(())
    }
}

/// Translate a storage unique-constraint violation into the duplicate-email error
fn duplicate_on_conflict(err: AppError, email: &str) -> AppError {
    match err {
        AppError::Database(db_err) if is_unique_violation(&db_err) => {
            tracing::debug!(email, "unique constraint rejected email");
            AppError::duplicate_email(email)
        }
        other => other,
    }
}

#[async_trait]
impl<'c, C> CrudRepository for UserStore<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    type Id = UserId;
    type Entity = User;
    type Create = CreateUser;
    type Update = UpdateUser;

    async fn get(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.base.get(id).await?.map(User::from))
    }

    async fn get_all(&self) -> AppResult<Vec<User>> {
        let models = self.base.get_all().await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, payload: CreateUser) -> AppResult<User> {
        if self.get_by_email(&payload.email).await?.is_some() {
            tracing::debug!(email = %payload.email, "email already registered");
            return Err(AppError::duplicate_email(payload.email));
        }

        let email = payload.email.clone();
        let model = self
            .base
            .create(payload)
            .await
            .map_err(|e| duplicate_on_conflict(e, &email))?;

        tracing::info!(user_id = model.id, "user created");
        Ok(User::from(model))
    }

    async fn update(&self, id: UserId, payload: UpdateUser) -> AppResult<Option<User>> {
        let new_email = payload.email.clone();
        if let Some(email) = new_email.as_deref() {
            // A missing user is absent, not a conflict
            if self.base.get(id).await?.is_none() {
                return Ok(None);
            }
            self.ensure_email_free(email, id).await?;
        }

        let updated = self.base.update(id, payload).await.map_err(|e| match &new_email {
            Some(email) => duplicate_on_conflict(e, email),
            None => e,
        })?;

        Ok(updated.map(User::from))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let deleted = self.base.delete(id).await?;
        if deleted {
            tracing::info!(user_id = id, "user deleted");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl<'c, C> UserRepository for UserStore<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let found = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.base.connection())
            .await?;

        Ok(found.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Migrator;
    use sea_orm::{Database, DbErr};
    use sea_orm_migration::MigratorTrait;

    #[tokio::test]
    async fn unique_violation_becomes_duplicate_email() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let raw: UserBase<'_, _> = BaseRepository::new(&db);

        raw.create(CreateUser::new("Ann", "ann@example.com")).await.unwrap();
        let err = raw
            .create(CreateUser::new("Ann", "ann@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let translated = duplicate_on_conflict(err, "ann@example.com");
        assert!(matches!(translated, AppError::DuplicateEmail(ref email) if email == "ann@example.com"));
    }

    #[test]
    fn other_errors_pass_through_unchanged() {
        let err = duplicate_on_conflict(
            AppError::Database(DbErr::Custom("connection reset".into())),
            "ann@example.com",
        );
        assert!(matches!(err, AppError::Database(DbErr::Custom(ref msg)) if msg == "connection reset"));

        let err = duplicate_on_conflict(AppError::NotFound, "ann@example.com");
        assert!(matches!(err, AppError::NotFound));
    }
}
