use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, QueryFilter, TransactionTrait, entity::prelude::*,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::author::{self, Author};
use super::rating::Rating;
use crate::core::{CatalogResource, LoadRelations, MergeIntoActiveModel};
use crate::join_fields::JoinField;
use crate::rateable::{self, Rateable};
use crate::transform::IncludeSet;
use crate::validation::{Validatable, ValidationErrors, validators};

pub const TITLE_MAX: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub author_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::bundle_book::Entity")]
    BundleBooks,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::bundle_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BundleBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub author_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// `Loaded(None)` only if the author row vanished underneath the book.
    pub author: JoinField<Option<Author>>,
    pub ratings: JoinField<Vec<Rating>>,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            author_id: model.author_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            author: JoinField::NotLoaded,
            ratings: JoinField::NotLoaded,
        }
    }
}

impl Rateable for Book {
    const RATEABLE_TYPE: &'static str = "book";

    fn rateable_id(&self) -> i32 {
        self.id
    }
}

impl Book {
    /// Deletes the book together with its ratings and bundle memberships, in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound("Book not found")` for an unknown id.
    pub async fn delete_with_ratings(db: &DatabaseConnection, id: i32) -> Result<i32, DbErr> {
        let txn = db.begin().await?;
        let deleted = Self::delete_with_ratings_in(&txn, id).await?;
        txn.commit().await?;
        Ok(deleted)
    }

    /// # Errors
    ///
    /// `DbErr::RecordNotFound("Book not found")` for an unknown id.
    pub async fn delete_with_ratings_in(db: &impl ConnectionTrait, id: i32) -> Result<i32, DbErr> {
        let book = Self::get_one(db, id).await?;
        rateable::delete_ratings::<Self>(db, &[book.id]).await?;
        super::bundle_book::Entity::delete_many()
            .filter(super::bundle_book::Column::BookId.eq(book.id))
            .exec(db)
            .await?;
        Self::delete(db, book.id).await
    }
}

/// `"The selected author id is invalid."` unless the author exists.
///
/// # Errors
///
/// Propagates database failures.
pub async fn check_author(
    db: &DatabaseConnection,
    author_id: Option<i32>,
    errors: &mut ValidationErrors,
) -> Result<(), DbErr> {
    let Some(author_id) = author_id else {
        return Ok(());
    };
    if author::Entity::find_by_id(author_id)
        .one(db)
        .await?
        .is_none()
    {
        errors.add(validators::invalid_selection("author_id"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookCreate {
    #[schema(example = "The Hitchhiker's Guide to the Galaxy")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = 1)]
    pub author_id: Option<i32>,
}

impl Validatable for BookCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::required("title", self.title.as_deref()));
        if let Some(title) = &self.title {
            errors.check(validators::max_length("title", title, TITLE_MAX));
        }
        errors.check(validators::required(
            "description",
            self.description.as_deref(),
        ));
        errors.check(validators::present("author_id", self.author_id.as_ref()));
        errors.result()
    }
}

impl From<BookCreate> for ActiveModel {
    fn from(create: BookCreate) -> Self {
        let now = Utc::now();
        ActiveModel {
            title: Set(create.title.unwrap_or_default()),
            description: Set(create.description),
            author_id: Set(create.author_id.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookUpdate {
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    pub author_id: Option<i32>,
}

impl Validatable for BookUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            errors.check(validators::required("title", Some(title.as_str())));
            errors.check(validators::max_length("title", title, TITLE_MAX));
        }
        errors.result()
    }
}

impl MergeIntoActiveModel<ActiveModel> for BookUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(title) = self.title {
            existing.title = Set(title);
        }
        if let Some(description) = self.description {
            existing.description = Set(description);
        }
        if let Some(author_id) = self.author_id {
            existing.author_id = Set(author_id);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

#[async_trait]
impl CatalogResource for Book {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = BookCreate;
    type UpdateModel = BookUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Book";
}

#[async_trait]
impl LoadRelations for Book {
    async fn load_relations(
        db: &DatabaseConnection,
        books: &mut [Self],
        includes: &IncludeSet,
    ) -> Result<(), DbErr> {
        if books.is_empty() {
            return Ok(());
        }

        if includes.requests("author") {
            let mut author_ids: Vec<i32> = books.iter().map(|book| book.author_id).collect();
            author_ids.sort_unstable();
            author_ids.dedup();

            let mut authors: Vec<Author> = author::Entity::find()
                .filter(author::Column::Id.is_in(author_ids))
                .all(db)
                .await?
                .into_iter()
                .map(Author::from)
                .collect();
            Author::load_relations(db, &mut authors, &includes.scoped("author")).await?;

            let by_id: HashMap<i32, Author> = authors
                .into_iter()
                .map(|author| (author.id, author))
                .collect();
            for book in books.iter_mut() {
                book.author.set(by_id.get(&book.author_id).cloned());
            }
        }

        if includes.requests("ratings") {
            let ids: Vec<i32> = books.iter().map(|book| book.id).collect();
            let mut ratings = rateable::ratings_for::<Self>(db, &ids).await?;
            for book in books.iter_mut() {
                book.ratings
                    .set(ratings.remove(&book.id).unwrap_or_default());
            }
        }

        Ok(())
    }
}
