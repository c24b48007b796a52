use serde_json::json;

use crate::entities::{Rating, timestamp};
use crate::rateable::owner_path;
use crate::transform::{AttributeMap, Transformer};

#[derive(Debug, Clone, Copy, Default)]
pub struct RatingTransformer;

impl Transformer for RatingTransformer {
    type Entity = Rating;

    fn transform(&self, rating: &Rating) -> AttributeMap {
        let owner = owner_path(&rating.rateable_type, rating.rateable_id);
        let mut attributes = AttributeMap::new();
        attributes.insert("id".into(), rating.id.into());
        attributes.insert("value".into(), rating.value.into());
        attributes.insert("type".into(), rating.rateable_type.clone().into());
        attributes.insert(
            "links".into(),
            json!([{ "rel": rating.rateable_type, "href": owner }]),
        );
        attributes.insert("created".into(), timestamp(&rating.created_at).into());
        attributes.insert("updated".into(), timestamp(&rating.updated_at).into());
        attributes
    }
}
