//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, IntoActiveModel, Set};

use domain::{CreateUser, UpdateUser, User};

use crate::repository::ApplyPatch;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Storage-assigned timestamps: `created_at` once on insert,
/// `updated_at` on every save.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Only the caller-supplied attributes are set; id and timestamps stay
/// `NotSet` so storage assigns them.
impl IntoActiveModel<ActiveModel> for CreateUser {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            name: Set(self.name),
            email: Set(self.email),
            ..Default::default()
        }
    }
}

impl ApplyPatch<ActiveModel> for UpdateUser {
    fn apply_to(self, active: &mut ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(email) = self.email {
            active.email = Set(email);
        }
    }
}
