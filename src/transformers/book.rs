use serde_json::Value;

use super::{AuthorTransformer, RatingTransformer};
use crate::entities::{Book, timestamp};
use crate::transform::{AttributeMap, Resource, TransformError, Transformer};

#[derive(Debug, Clone, Copy, Default)]
pub struct BookTransformer;

impl Transformer for BookTransformer {
    type Entity = Book;

    fn transform(&self, book: &Book) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        attributes.insert("id".into(), book.id.into());
        attributes.insert("title".into(), book.title.clone().into());
        attributes.insert(
            "description".into(),
            book.description.clone().map_or(Value::Null, Value::from),
        );
        attributes.insert("created".into(), timestamp(&book.created_at).into());
        attributes.insert("updated".into(), timestamp(&book.updated_at).into());
        attributes
    }

    fn available_includes(&self) -> &'static [&'static str] {
        &["author", "ratings"]
    }

    fn include<'a>(&self, relation: &str, book: &'a Book) -> Result<Resource<'a>, TransformError> {
        match relation {
            "author" => Ok(Resource::item(
                book.author.require("author")?.as_ref(),
                AuthorTransformer,
            )),
            "ratings" => Ok(Resource::collection(
                book.ratings.require("ratings")?,
                RatingTransformer,
            )),
            other => Err(TransformError::undeclared(self.name(), other)),
        }
    }
}
