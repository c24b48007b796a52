use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait,
    entity::prelude::*,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::book::{self, Book};
use super::rating::Rating;
use crate::core::{CatalogResource, LoadRelations, MergeIntoActiveModel};
use crate::join_fields::JoinField;
use crate::rateable::{self, Rateable, RatingSummary};
use crate::transform::IncludeSet;
use crate::validation::{Validatable, ValidationErrors, validators};

pub const GENDERS: &[&str] = &["male", "female"];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub gender: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub biography: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Books,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub biography: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Aggregate over every rating; filled in by [`LoadRelations`].
    pub rating: RatingSummary,
    pub books: JoinField<Vec<Book>>,
    pub ratings: JoinField<Vec<Rating>>,
}

impl From<Model> for Author {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            gender: model.gender,
            biography: model.biography,
            created_at: model.created_at,
            updated_at: model.updated_at,
            rating: RatingSummary::default(),
            books: JoinField::NotLoaded,
            ratings: JoinField::NotLoaded,
        }
    }
}

impl Rateable for Author {
    const RATEABLE_TYPE: &'static str = "author";

    fn rateable_id(&self) -> i32 {
        self.id
    }
}

impl Author {
    /// Deletes the author, their books and every rating on either, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound("Author not found")` for an unknown id. Nothing
    /// is removed when any step fails.
    pub async fn delete_cascade(db: &DatabaseConnection, id: i32) -> Result<i32, DbErr> {
        let txn = db.begin().await?;
        let deleted = Self::delete_cascade_in(&txn, id).await?;
        txn.commit().await?;
        Ok(deleted)
    }

    /// The cascade of [`Author::delete_cascade`] on a caller-owned connection.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound("Author not found")` for an unknown id.
    pub async fn delete_cascade_in(db: &impl ConnectionTrait, id: i32) -> Result<i32, DbErr> {
        let author = Self::get_one(db, id).await?;
        let book_ids: Vec<i32> = book::Entity::find()
            .filter(book::Column::AuthorId.eq(author.id))
            .all(db)
            .await?
            .into_iter()
            .map(|book| book.id)
            .collect();

        rateable::delete_ratings::<Book>(db, &book_ids).await?;
        rateable::delete_ratings::<Self>(db, &[author.id]).await?;
        super::bundle_book::Entity::delete_many()
            .filter(super::bundle_book::Column::BookId.is_in(book_ids.iter().copied()))
            .exec(db)
            .await?;
        book::Entity::delete_many()
            .filter(book::Column::AuthorId.eq(author.id))
            .exec(db)
            .await?;
        tracing::debug!(
            author_id = author.id,
            books = book_ids.len(),
            "author deleted"
        );
        Self::delete(db, author.id).await
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuthorCreate {
    #[schema(example = "Frank Herbert")]
    pub name: Option<String>,
    #[schema(example = "male")]
    pub gender: Option<String>,
    pub biography: Option<String>,
}

impl Validatable for AuthorCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::required("name", self.name.as_deref()));
        if let Some(name) = &self.name {
            errors.check(validators::max_length("name", name, 255));
        }
        errors.check(validators::required("gender", self.gender.as_deref()));
        if let Some(gender) = self.gender.as_deref().filter(|g| !g.trim().is_empty()) {
            errors.check(validators::one_of("gender", gender, GENDERS));
        }
        errors.result()
    }
}

impl From<AuthorCreate> for ActiveModel {
    fn from(create: AuthorCreate) -> Self {
        let now = Utc::now();
        ActiveModel {
            name: Set(create.name.unwrap_or_default()),
            gender: Set(create.gender.unwrap_or_default().to_ascii_lowercase()),
            biography: Set(create.biography),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

/// Partial update; absent fields are left untouched and `"biography": null`
/// clears the biography.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuthorUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub biography: Option<Option<String>>,
}

impl Validatable for AuthorUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.check(validators::required("name", Some(name.as_str())));
            errors.check(validators::max_length("name", name, 255));
        }
        if let Some(gender) = &self.gender {
            errors.check(validators::one_of("gender", gender, GENDERS));
        }
        errors.result()
    }
}

impl MergeIntoActiveModel<ActiveModel> for AuthorUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(gender) = self.gender {
            existing.gender = Set(gender.to_ascii_lowercase());
        }
        if let Some(biography) = self.biography {
            existing.biography = Set(biography);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

#[async_trait]
impl CatalogResource for Author {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = AuthorCreate;
    type UpdateModel = AuthorUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "Author";
}

/// The rating summary is always computed; `ratings` and `books` are only
/// attached when requested.
#[async_trait]
impl LoadRelations for Author {
    async fn load_relations(
        db: &DatabaseConnection,
        authors: &mut [Self],
        includes: &IncludeSet,
    ) -> Result<(), DbErr> {
        if authors.is_empty() {
            return Ok(());
        }
        let ids: Vec<i32> = authors.iter().map(|author| author.id).collect();

        let mut ratings = rateable::ratings_for::<Self>(db, &ids).await?;
        let attach_ratings = includes.requests("ratings");
        for author in authors.iter_mut() {
            let own = ratings.remove(&author.id).unwrap_or_default();
            author.rating = RatingSummary::from_ratings(&own);
            if attach_ratings {
                author.ratings.set(own);
            }
        }

        if includes.requests("books") {
            let mut books: Vec<Book> = book::Entity::find()
                .filter(book::Column::AuthorId.is_in(ids))
                .order_by_asc(book::Column::Id)
                .all(db)
                .await?
                .into_iter()
                .map(Book::from)
                .collect();
            Book::load_relations(db, &mut books, &includes.scoped("books")).await?;

            let mut by_author: HashMap<i32, Vec<Book>> = HashMap::new();
            for book in books {
                by_author.entry(book.author_id).or_default().push(book);
            }
            for author in authors.iter_mut() {
                author
                    .books
                    .set(by_author.remove(&author.id).unwrap_or_default());
            }
        }

        Ok(())
    }
}
