//! Envelope strategies.
//!
//! A serializer only decides the final shape of a representation; it never
//! sees entities or transformers. One strategy is chosen per process so that
//! every response shares the same envelope.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use super::transformer::AttributeMap;

/// A fully built nested include, handed to [`Serializer::relationship`].
#[derive(Debug, Clone, PartialEq)]
pub enum Relationship {
    Item(Option<AttributeMap>),
    Collection(Vec<AttributeMap>),
}

impl Relationship {
    /// The relationship embedded directly as an object, array or `null`.
    #[must_use]
    pub fn into_inline(self) -> Value {
        match self {
            Self::Item(Some(attributes)) => Value::Object(attributes),
            Self::Item(None) => Value::Null,
            Self::Collection(items) => Value::Array(items.into_iter().map(Value::Object).collect()),
        }
    }
}

pub trait Serializer: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Root envelope for a single item.
    fn item(&self, key: &str, data: AttributeMap) -> Value;

    /// Root envelope for an ordered collection.
    fn collection(&self, key: &str, data: Vec<AttributeMap>) -> Value;

    /// Root envelope for an item resource with no entity.
    fn null(&self, key: &str) -> Value;

    /// How a nested include is embedded inside its parent's attributes.
    fn relationship(&self, relationship: Relationship) -> Value {
        relationship.into_inline()
    }
}

fn envelope(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_owned(), value);
    Value::Object(map)
}

fn objects(data: Vec<AttributeMap>) -> Value {
    Value::Array(data.into_iter().map(Value::Object).collect())
}

/// Flat data envelope: `{"data": {...}}`, `{"data": [...]}`, `{"data": null}`,
/// with relationships embedded inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataArraySerializer;

impl Serializer for DataArraySerializer {
    fn name(&self) -> &'static str {
        "data"
    }

    fn item(&self, key: &str, data: AttributeMap) -> Value {
        envelope(key, Value::Object(data))
    }

    fn collection(&self, key: &str, data: Vec<AttributeMap>) -> Value {
        envelope(key, objects(data))
    }

    fn null(&self, key: &str) -> Value {
        envelope(key, Value::Null)
    }
}

/// Data envelope at every level: relationships are wrapped as
/// `{"data": ...}` as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedDataSerializer;

impl Serializer for NestedDataSerializer {
    fn name(&self) -> &'static str {
        "nested"
    }

    fn item(&self, key: &str, data: AttributeMap) -> Value {
        envelope(key, Value::Object(data))
    }

    fn collection(&self, key: &str, data: Vec<AttributeMap>) -> Value {
        envelope(key, objects(data))
    }

    fn null(&self, key: &str) -> Value {
        envelope(key, Value::Null)
    }

    fn relationship(&self, relationship: Relationship) -> Value {
        envelope(super::resource::DEFAULT_KEY, relationship.into_inline())
    }
}

/// Bare items, keyed collections, and `{}` for a missing item.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArraySerializer;

impl Serializer for ArraySerializer {
    fn name(&self) -> &'static str {
        "array"
    }

    fn item(&self, _key: &str, data: AttributeMap) -> Value {
        Value::Object(data)
    }

    fn collection(&self, key: &str, data: Vec<AttributeMap>) -> Value {
        envelope(key, objects(data))
    }

    fn null(&self, _key: &str) -> Value {
        Value::Object(Map::new())
    }
}

/// Process-wide serializer selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SerializerKind {
    #[default]
    Data,
    Nested,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown serializer `{0}` (expected one of: data, nested, array)")]
pub struct UnknownSerializer(pub String);

impl SerializerKind {
    #[must_use]
    pub fn build(self) -> Arc<dyn Serializer> {
        match self {
            Self::Data => Arc::new(DataArraySerializer),
            Self::Nested => Arc::new(NestedDataSerializer),
            Self::Array => Arc::new(ArraySerializer),
        }
    }
}

impl FromStr for SerializerKind {
    type Err = UnknownSerializer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "data" | "data_array" => Ok(Self::Data),
            "nested" => Ok(Self::Nested),
            "array" => Ok(Self::Array),
            _ => Err(UnknownSerializer(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> AttributeMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test attributes must be an object"),
        }
    }

    #[test]
    fn test_data_array_item() {
        let value = DataArraySerializer.item("data", attrs(json!({"id": 1})));
        assert_eq!(value, json!({"data": {"id": 1}}));
    }

    #[test]
    fn test_data_array_collection_keeps_order() {
        let value = DataArraySerializer.collection(
            "data",
            vec![attrs(json!({"id": 2})), attrs(json!({"id": 1}))],
        );
        assert_eq!(value, json!({"data": [{"id": 2}, {"id": 1}]}));
    }

    #[test]
    fn test_data_array_null_is_pinned() {
        assert_eq!(DataArraySerializer.null("data"), json!({"data": null}));
    }

    #[test]
    fn test_data_array_relationships_are_inline() {
        let item = Relationship::Item(Some(attrs(json!({"name": "F. Herbert"}))));
        assert_eq!(DataArraySerializer.relationship(item), json!({"name": "F. Herbert"}));
        assert_eq!(
            DataArraySerializer.relationship(Relationship::Item(None)),
            Value::Null
        );
        assert_eq!(
            DataArraySerializer.relationship(Relationship::Collection(vec![])),
            json!([])
        );
    }

    #[test]
    fn test_nested_wraps_relationships() {
        let ratings = Relationship::Collection(vec![attrs(json!({"value": 5}))]);
        assert_eq!(
            NestedDataSerializer.relationship(ratings),
            json!({"data": [{"value": 5}]})
        );
        assert_eq!(
            NestedDataSerializer.relationship(Relationship::Item(None)),
            json!({"data": null})
        );
    }

    #[test]
    fn test_array_serializer_shapes() {
        assert_eq!(ArraySerializer.item("data", attrs(json!({"id": 1}))), json!({"id": 1}));
        assert_eq!(ArraySerializer.collection("books", vec![]), json!({"books": []}));
        assert_eq!(ArraySerializer.null("data"), json!({}));
    }

    #[test]
    fn test_serializer_kind_from_str() {
        assert_eq!("data".parse::<SerializerKind>(), Ok(SerializerKind::Data));
        assert_eq!(" Nested ".parse::<SerializerKind>(), Ok(SerializerKind::Nested));
        assert_eq!("array".parse::<SerializerKind>(), Ok(SerializerKind::Array));
        assert!("jsonapi".parse::<SerializerKind>().is_err());
    }

    #[test]
    fn test_serializer_kind_builds_matching_strategy() {
        assert_eq!(SerializerKind::default().build().name(), "data");
        assert_eq!(SerializerKind::Nested.build().name(), "nested");
        assert_eq!(SerializerKind::Array.build().name(), "array");
    }
}
