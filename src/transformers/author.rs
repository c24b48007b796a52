use serde_json::{Value, json};

use super::{BookTransformer, RatingTransformer};
use crate::entities::{Author, timestamp};
use crate::transform::{AttributeMap, Resource, TransformError, Transformer};

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorTransformer;

impl Transformer for AuthorTransformer {
    type Entity = Author;

    fn transform(&self, author: &Author) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        attributes.insert("id".into(), author.id.into());
        attributes.insert("name".into(), author.name.clone().into());
        attributes.insert("gender".into(), author.gender.clone().into());
        attributes.insert(
            "biography".into(),
            author.biography.clone().map_or(Value::Null, Value::from),
        );
        attributes.insert(
            "rating".into(),
            json!({
                "average": author.rating.average,
                "max": author.rating.max,
                "percent": author.rating.percent,
                "count": author.rating.count,
            }),
        );
        attributes.insert("created".into(), timestamp(&author.created_at).into());
        attributes.insert("updated".into(), timestamp(&author.updated_at).into());
        attributes
    }

    fn available_includes(&self) -> &'static [&'static str] {
        &["books", "ratings"]
    }

    fn include<'a>(
        &self,
        relation: &str,
        author: &'a Author,
    ) -> Result<Resource<'a>, TransformError> {
        match relation {
            "books" => Ok(Resource::collection(
                author.books.require("books")?,
                BookTransformer,
            )),
            "ratings" => Ok(Resource::collection(
                author.ratings.require("ratings")?,
                RatingTransformer,
            )),
            other => Err(TransformError::undeclared(self.name(), other)),
        }
    }
}
