use serde_json::Value;

use super::BookTransformer;
use crate::entities::{Bundle, timestamp};
use crate::transform::{AttributeMap, Resource, TransformError, Transformer};

#[derive(Debug, Clone, Copy, Default)]
pub struct BundleTransformer;

impl Transformer for BundleTransformer {
    type Entity = Bundle;

    fn transform(&self, bundle: &Bundle) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        attributes.insert("id".into(), bundle.id.into());
        attributes.insert("title".into(), bundle.title.clone().into());
        attributes.insert(
            "description".into(),
            bundle.description.clone().map_or(Value::Null, Value::from),
        );
        attributes.insert("created".into(), timestamp(&bundle.created_at).into());
        attributes.insert("updated".into(), timestamp(&bundle.updated_at).into());
        attributes
    }

    fn available_includes(&self) -> &'static [&'static str] {
        &["books"]
    }

    fn include<'a>(
        &self,
        relation: &str,
        bundle: &'a Bundle,
    ) -> Result<Resource<'a>, TransformError> {
        match relation {
            "books" => Ok(Resource::collection(
                bundle.books.require("books")?,
                BookTransformer,
            )),
            other => Err(TransformError::undeclared(self.name(), other)),
        }
    }
}
