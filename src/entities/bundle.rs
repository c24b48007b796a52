use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait,
    entity::prelude::*,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::book::{self, Book, TITLE_MAX};
use super::bundle_book;
use crate::core::{CatalogResource, LoadRelations, MergeIntoActiveModel};
use crate::join_fields::JoinField;
use crate::transform::IncludeSet;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bundles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bundle_book::Entity")]
    BundleBooks,
}

impl Related<super::bundle_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BundleBooks.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        super::bundle_book::Relation::Book.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::bundle_book::Relation::Bundle.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub books: JoinField<Vec<Book>>,
}

impl From<Model> for Bundle {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
            books: JoinField::NotLoaded,
        }
    }
}

impl Bundle {
    /// Adds `book_id` to the bundle; attaching a book twice is a no-op.
    ///
    /// The link insert and the bundle's `updated_at` touch commit together.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound` when either the bundle or the book is missing.
    pub async fn attach_book(
        db: &DatabaseConnection,
        id: i32,
        book_id: i32,
    ) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        let bundle = Self::attach_book_in(&txn, id, book_id).await?;
        txn.commit().await?;
        Ok(bundle)
    }

    /// # Errors
    ///
    /// `DbErr::RecordNotFound` when either the bundle or the book is missing.
    pub async fn attach_book_in(
        db: &impl ConnectionTrait,
        id: i32,
        book_id: i32,
    ) -> Result<Self, DbErr> {
        let bundle = Self::get_one(db, id).await?;
        Book::get_one(db, book_id).await?;

        let existing = bundle_book::Entity::find_by_id((bundle.id, book_id))
            .one(db)
            .await?;
        if existing.is_none() {
            bundle_book::ActiveModel {
                bundle_id: Set(bundle.id),
                book_id: Set(book_id),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await?;
            tracing::debug!(bundle_id = bundle.id, book_id, "book added to bundle");
            return Self::update(db, bundle.id, BundleTouch).await;
        }
        Ok(bundle)
    }

    /// Removes `book_id` from the bundle.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound` when the bundle or the book is missing.
    pub async fn detach_book(db: &DatabaseConnection, id: i32, book_id: i32) -> Result<(), DbErr> {
        let bundle = Self::get_one(db, id).await?;
        Book::get_one(db, book_id).await?;

        let result = bundle_book::Entity::delete_by_id((bundle.id, book_id))
            .exec(db)
            .await?;
        tracing::debug!(
            bundle_id = bundle.id,
            book_id,
            removed = result.rows_affected,
            "book removed from bundle"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BundleCreate {
    #[schema(example = "Science Fiction Classics")]
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Validatable for BundleCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::required("title", self.title.as_deref()));
        if let Some(title) = &self.title {
            errors.check(validators::max_length("title", title, TITLE_MAX));
        }
        errors.result()
    }
}

impl From<BundleCreate> for ActiveModel {
    fn from(create: BundleCreate) -> Self {
        let now = Utc::now();
        ActiveModel {
            title: Set(create.title.unwrap_or_default()),
            description: Set(create.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

/// Bundles change only through their books; updating one just refreshes
/// `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct BundleTouch;

impl MergeIntoActiveModel<ActiveModel> for BundleTouch {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

#[async_trait]
impl CatalogResource for Bundle {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = BundleCreate;
    type UpdateModel = BundleTouch;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Bundle";
}

#[async_trait]
impl LoadRelations for Bundle {
    async fn load_relations(
        db: &DatabaseConnection,
        bundles: &mut [Self],
        includes: &IncludeSet,
    ) -> Result<(), DbErr> {
        if bundles.is_empty() || !includes.requests("books") {
            return Ok(());
        }
        let ids: Vec<i32> = bundles.iter().map(|bundle| bundle.id).collect();

        let links = bundle_book::Entity::find()
            .filter(bundle_book::Column::BundleId.is_in(ids))
            .order_by_asc(bundle_book::Column::CreatedAt)
            .order_by_asc(bundle_book::Column::BookId)
            .all(db)
            .await?;
        let mut book_ids: Vec<i32> = links.iter().map(|link| link.book_id).collect();
        book_ids.sort_unstable();
        book_ids.dedup();

        let mut books: Vec<Book> = book::Entity::find()
            .filter(book::Column::Id.is_in(book_ids))
            .all(db)
            .await?
            .into_iter()
            .map(Book::from)
            .collect();
        Book::load_relations(db, &mut books, &includes.scoped("books")).await?;
        let by_id: HashMap<i32, Book> = books.into_iter().map(|book| (book.id, book)).collect();

        let mut grouped: HashMap<i32, Vec<Book>> = HashMap::new();
        for link in links {
            if let Some(book) = by_id.get(&link.book_id) {
                grouped
                    .entry(link.bundle_id)
                    .or_default()
                    .push(book.clone());
            }
        }
        for bundle in bundles.iter_mut() {
            bundle
                .books
                .set(grouped.remove(&bundle.id).unwrap_or_default());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_requires_title() {
        let errors = BundleCreate::default().validate().unwrap_err();
        assert_eq!(
            errors.messages("title"),
            vec!["The title field is required."]
        );
        assert_eq!(errors.len(), 1);
    }
}
