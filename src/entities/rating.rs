use chrono::Utc;
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::validation::{Validatable, ValidationErrors, validators};

/// A 1..=5 score attached to any rateable kind through
/// (`rateable_type`, `rateable_id`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub value: i32,
    pub rateable_type: String,
    pub rateable_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rating {
    pub id: i32,
    pub value: i32,
    pub rateable_type: String,
    pub rateable_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl From<Model> for Rating {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            value: model.value,
            rateable_type: model.rateable_type,
            rateable_id: model.rateable_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RatingCreate {
    #[schema(example = 4, minimum = 1, maximum = 5)]
    pub value: Option<i64>,
}

impl Validatable for RatingCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match self.value {
            Some(value) => errors.check(validators::between("value", value, 1, 5)),
            None => errors.check(validators::present::<i64>("value", None)),
        }
        errors.result()
    }
}

impl RatingCreate {
    /// Builds the row for `owner`. Call after [`Validatable::validate`].
    pub(crate) fn into_active_model(self, rateable_type: &str, rateable_id: i32) -> ActiveModel {
        let now = Utc::now();
        ActiveModel {
            value: Set(self
                .value
                .and_then(|value| i32::try_from(value).ok())
                .unwrap_or_default()),
            rateable_type: Set(rateable_type.to_owned()),
            rateable_id: Set(rateable_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}
