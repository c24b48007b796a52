//! Schema for the catalog, derived from the entity definitions.

use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entities::{author, book, bundle, bundle_book, rating};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCatalogTables)]
    }
}

pub struct CreateCatalogTables;

impl MigrationName for CreateCatalogTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_catalog_tables"
    }
}

async fn create_table<E>(manager: &SchemaManager<'_>, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCatalogTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Referenced tables first.
        create_table(manager, &schema, author::Entity).await?;
        create_table(manager, &schema, book::Entity).await?;
        create_table(manager, &schema, rating::Entity).await?;
        create_table(manager, &schema, bundle::Entity).await?;
        create_table(manager, &schema, bundle_book::Entity).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(bundle_book::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(bundle::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(rating::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(book::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(author::Entity).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
