use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder,
    entity::prelude::*,
};

use crate::transform::IncludeSet;

pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge operation fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// CRUD access to one catalog table, yielding domain structs.
///
/// Every method accepts any [`ConnectionTrait`], so the same calls run on the
/// pool or inside a `DatabaseTransaction`.
///
/// Missing rows surface as `DbErr::RecordNotFound("<Resource> not found")`,
/// which the error layer turns into a 404 with that message.
#[async_trait]
pub trait CatalogResource: Sized + Send + Sync
where
    Self::EntityType: EntityTrait + Sync,
    Self::ActiveModelType: ActiveModelTrait + ActiveModelBehavior + Send + Sync,
    <Self::EntityType as EntityTrait>::Model: Sync + IntoActiveModel<Self::ActiveModelType>,
    <<Self::EntityType as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + std::fmt::Debug;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>;
    type CreateModel: Into<Self::ActiveModelType> + Send;
    type UpdateModel: Send + Sync + MergeIntoActiveModel<Self::ActiveModelType>;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;

    fn not_found() -> DbErr {
        DbErr::RecordNotFound(format!("{} not found", Self::RESOURCE_NAME_SINGULAR))
    }

    /// Every row, in primary key order.
    async fn get_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let models = Self::EntityType::find()
            .order_by_asc(Self::ID_COLUMN)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Self::from).collect())
    }

    async fn find_one<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Self>, DbErr> {
        let model = Self::EntityType::find_by_id(id).one(db).await?;
        Ok(model.map(Self::from))
    }

    async fn get_one<C: ConnectionTrait>(db: &C, id: i32) -> Result<Self, DbErr> {
        Self::find_one(db, id).await?.ok_or_else(Self::not_found)
    }

    async fn create<C: ConnectionTrait>(
        db: &C,
        create_model: Self::CreateModel,
    ) -> Result<Self, DbErr> {
        let active_model: Self::ActiveModelType = create_model.into();
        let model = active_model.insert(db).await?;
        Ok(Self::from(model))
    }

    async fn update<C: ConnectionTrait>(
        db: &C,
        id: i32,
        update_model: Self::UpdateModel,
    ) -> Result<Self, DbErr> {
        let model = Self::EntityType::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(Self::not_found)?;
        let existing: Self::ActiveModelType = model.into_active_model();
        let updated_model = update_model.merge_into_activemodel(existing)?;
        let updated = updated_model.update(db).await?;
        Ok(Self::from(updated))
    }

    async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<i32, DbErr> {
        let res = Self::EntityType::delete_by_id(id).exec(db).await?;
        match res.rows_affected {
            0 => Err(Self::not_found()),
            _ => Ok(id),
        }
    }
}

/// Attach the relations an include set asks for, and nothing else.
///
/// Implementations recurse with [`IncludeSet::scoped`] so a nested path such
/// as `author.ratings` loads the author and then that author's ratings.
#[async_trait]
pub trait LoadRelations: Sized + Send {
    async fn load_relations(
        db: &DatabaseConnection,
        items: &mut [Self],
        includes: &IncludeSet,
    ) -> Result<(), DbErr>;

    async fn load_one(
        db: &DatabaseConnection,
        item: &mut Self,
        includes: &IncludeSet,
    ) -> Result<(), DbErr> {
        Self::load_relations(db, std::slice::from_mut(item), includes).await
    }
}
