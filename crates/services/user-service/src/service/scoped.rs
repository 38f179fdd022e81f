//! Per-call scoped user service.
//!
//! Every operation acquires its own transaction, builds a repository on it,
//! runs, and releases the transaction exactly once: commit on success,
//! rollback on failure.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use common::AppResult;
use domain::{CreateUser, UpdateUser, User, UserId};

use super::UserService;
use crate::repository::{CrudRepository, UserRepository, UserStore};

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> UserStore<'a, DatabaseTransaction> {
        UserStore::new(self.txn)
    }
}

/// UserService that holds no session between calls.
#[derive(Clone)]
pub struct ScopedUserService {
    db: DatabaseConnection,
}

impl ScopedUserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure succeeds and rolled
    /// back when it fails.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let txn = self.db.begin().await?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UserService for ScopedUserService {
    async fn get_all_users(&self) -> AppResult<Vec<User>> {
        self.transaction(|ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.get_all().await
            })
        })
        .await
    }

    async fn get_user(&self, id: UserId) -> AppResult<Option<User>> {
        self.transaction(move |ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.get(id).await
            })
        })
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_owned();
        self.transaction(move |ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.get_by_email(&email).await
            })
        })
        .await
    }

    async fn create_user(&self, payload: CreateUser) -> AppResult<User> {
        tracing::debug!(email = %payload.email, "creating user");
        self.transaction(move |ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.create(payload).await
            })
        })
        .await
    }

    async fn update_user(&self, id: UserId, payload: UpdateUser) -> AppResult<Option<User>> {
        self.transaction(move |ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.update(id, payload).await
            })
        })
        .await
    }

    async fn delete_user(&self, id: UserId) -> AppResult<bool> {
        self.transaction(move |ctx| {
            Box::pin(async move {
                let users = ctx.users();
                users.delete(id).await
            })
        })
        .await
    }
}
