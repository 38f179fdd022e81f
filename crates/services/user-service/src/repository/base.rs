//! Base repository contract and its SeaORM implementation.
//!
//! `CrudRepository` describes the uniform CRUD surface over one entity type
//! and its create/update payloads. `BaseRepository` implements it for any
//! SeaORM entity on top of a borrowed connection: either the pooled
//! `DatabaseConnection` or an open `DatabaseTransaction`. The repository never
//! begins, commits, or closes that connection; its owner does.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use common::AppResult;

/// Primary key value type of a SeaORM entity
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Partial update applied onto an active model.
///
/// Implementations must only `Set` the attributes present in the payload.
pub trait ApplyPatch<A> {
    fn apply_to(self, active: &mut A);
}

/// Uniform CRUD contract over one entity type.
///
/// Absence is never an error: `get`/`update` return `None` and `delete`
/// returns `false`. Persistence failures propagate unchanged.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Id: Send + 'static;
    type Entity: Send;
    type Create: Send + 'static;
    type Update: Send + 'static;

    /// Find entity by identifier
    async fn get(&self, id: Self::Id) -> AppResult<Option<Self::Entity>>;

    /// Find all entities (no ordering guarantee)
    async fn get_all(&self) -> AppResult<Vec<Self::Entity>>;

    /// Insert a new entity and return it with storage-assigned attributes
    async fn create(&self, payload: Self::Create) -> AppResult<Self::Entity>;

    /// Apply the attributes set in `payload` and return the refreshed entity
    async fn update(&self, id: Self::Id, payload: Self::Update)
        -> AppResult<Option<Self::Entity>>;

    /// Remove entity by identifier, reporting whether it existed
    async fn delete(&self, id: Self::Id) -> AppResult<bool>;
}

/// Generic SeaORM repository.
///
/// `E`/`A` are the entity and its active model, `Cr`/`Up` the create and
/// update payloads.
pub struct BaseRepository<'c, C, E, A, Cr, Up> {
    conn: &'c C,
    _marker: PhantomData<fn() -> (E, A, Cr, Up)>,
}

impl<'c, C, E, A, Cr, Up> BaseRepository<'c, C, E, A, Cr, Up>
where
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            _marker: PhantomData,
        }
    }

    /// Connection this repository runs on
    pub fn connection(&self) -> &'c C {
        self.conn
    }
}

#[async_trait]
impl<'c, C, E, A, Cr, Up> CrudRepository for BaseRepository<'c, C, E, A, Cr, Up>
where
    C: ConnectionTrait + Send + Sync,
    E: EntityTrait + Send + Sync,
    E::Model: IntoActiveModel<A> + Send + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    PrimaryKeyOf<E>: Send + 'static,
    Cr: IntoActiveModel<A> + Send + 'static,
    Up: ApplyPatch<A> + Send + 'static,
{
    type Id = PrimaryKeyOf<E>;
    type Entity = E::Model;
    type Create = Cr;
    type Update = Up;

    async fn get(&self, id: Self::Id) -> AppResult<Option<Self::Entity>> {
        let found = E::find_by_id(id).one(self.conn).await?;
        Ok(found)
    }

    async fn get_all(&self) -> AppResult<Vec<Self::Entity>> {
        let all = E::find().all(self.conn).await?;
        Ok(all)
    }

    async fn create(&self, payload: Self::Create) -> AppResult<Self::Entity> {
        let active: A = payload.into_active_model();
        let model = active.insert(self.conn).await?;
        Ok(model)
    }

    async fn update(
        &self,
        id: Self::Id,
        payload: Self::Update,
    ) -> AppResult<Option<Self::Entity>> {
        let Some(model) = E::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        let mut active: A = model.into_active_model();
        payload.apply_to(&mut active);

        let updated = active.update(self.conn).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: Self::Id) -> AppResult<bool> {
        let Some(model) = E::find_by_id(id).one(self.conn).await? else {
            return Ok(false);
        };

        let active: A = model.into_active_model();
        active.delete(self.conn).await?;
        Ok(true)
    }
}

/// True when the storage layer rejected a write on a unique constraint
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
