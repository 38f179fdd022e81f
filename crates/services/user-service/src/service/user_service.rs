//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use common::AppResult;
use domain::{CreateUser, UpdateUser, User, UserId};

use crate::repository::{UserRepository, UserStore};

/// User service trait for dependency injection.
///
/// Mirrors the repository surface. Absence is reported as `None`/`false`;
/// duplicate-email and persistence errors pass through untouched so the
/// caller decides how to present them.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// List every user
    async fn get_all_users(&self) -> AppResult<Vec<User>>;

    /// Get user by ID
    async fn get_user(&self, id: UserId) -> AppResult<Option<User>>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user, rejecting an already registered email
    async fn create_user(&self, payload: CreateUser) -> AppResult<User>;

    /// Apply the fields set in `payload`
    async fn update_user(&self, id: UserId, payload: UpdateUser) -> AppResult<Option<User>>;

    /// Delete user, reporting whether it existed
    async fn delete_user(&self, id: UserId) -> AppResult<bool>;
}

/// Repository-backed implementation of UserService.
///
/// Holds one repository for its whole lifetime. Built either around an
/// existing repository (`new`, `with_session`) or around a borrowed
/// connection (`from_session`), in which case it builds a `UserStore`.
pub struct UserManager<'r> {
    repo: Arc<dyn UserRepository + 'r>,
    session: Option<&'r DatabaseConnection>,
}

impl<'r> UserManager<'r> {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository + 'r>) -> Self {
        Self {
            repo,
            session: None,
        }
    }

    /// Wrap an existing repository, keeping the connection it runs on
    pub fn with_session(
        repo: Arc<dyn UserRepository + 'r>,
        session: &'r DatabaseConnection,
    ) -> Self {
        Self {
            repo,
            session: Some(session),
        }
    }

    /// Build the user repository over `session`
    pub fn from_session(session: &'r DatabaseConnection) -> Self {
        Self {
            repo: Arc::new(UserStore::new(session)),
            session: Some(session),
        }
    }

    /// Connection handed in at construction, if any
    pub fn session(&self) -> Option<&'r DatabaseConnection> {
        self.session
    }
}

#[async_trait]
impl<'r> UserService for UserManager<'r> {
    async fn get_all_users(&self) -> AppResult<Vec<User>> {
        self.repo.get_all().await
    }

    async fn get_user(&self, id: UserId) -> AppResult<Option<User>> {
        self.repo.get(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.get_by_email(email).await
    }

    async fn create_user(&self, payload: CreateUser) -> AppResult<User> {
        self.repo.create(payload).await
    }

    async fn update_user(&self, id: UserId, payload: UpdateUser) -> AppResult<Option<User>> {
        self.repo.update(id, payload).await
    }

    async fn delete_user(&self, id: UserId) -> AppResult<bool> {
        self.repo.delete(id).await
    }
}
