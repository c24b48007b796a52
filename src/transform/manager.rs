use std::sync::Arc;

use serde_json::Value;

use super::error::TransformError;
use super::includes::IncludeSet;
use super::resource::{Node, Resource, Shape};
use super::serializer::{DataArraySerializer, Relationship, Serializer};
use super::transformer::{AttributeMap, Transformer};

/// Single entry point for turning entities into a representation.
///
/// A manager owns the serializer chosen for the process and the include set
/// of exactly one request. Build a fresh manager per request (the HTTP layer
/// does so in its extractor) so concurrent requests never share include state.
#[derive(Debug, Clone)]
pub struct ResponseManager {
    serializer: Arc<dyn Serializer>,
    includes: IncludeSet,
}

impl Default for ResponseManager {
    fn default() -> Self {
        Self::new(Arc::new(DataArraySerializer))
    }
}

impl ResponseManager {
    #[must_use]
    pub fn new(serializer: Arc<dyn Serializer>) -> Self {
        Self {
            serializer,
            includes: IncludeSet::default(),
        }
    }

    #[must_use]
    pub fn with_includes(mut self, includes: IncludeSet) -> Self {
        self.includes = includes;
        self
    }

    /// Replace the active include set from a raw include string.
    pub fn parse_includes(&mut self, raw: &str) {
        self.includes = IncludeSet::parse(raw);
        tracing::debug!(includes = %self.includes, "parsed includes");
    }

    #[must_use]
    pub fn includes(&self) -> &IncludeSet {
        &self.includes
    }

    /// Transform a single entity.
    ///
    /// # Errors
    ///
    /// Fails with a [`TransformError`] when a transformer, relation or
    /// serializer is misconfigured.
    pub fn item<T: Transformer>(
        &self,
        entity: &T::Entity,
        transformer: T,
    ) -> Result<Value, TransformError> {
        self.create_data(Resource::item(Some(entity), transformer))
    }

    /// The null representation for an absent entity.
    ///
    /// # Errors
    ///
    /// Fails when the serializer's null envelope is not an object.
    pub fn null<T: Transformer>(&self, transformer: T) -> Result<Value, TransformError> {
        self.create_data(Resource::null(transformer))
    }

    /// Transform an ordered sequence of entities.
    ///
    /// # Errors
    ///
    /// Fails with a [`TransformError`] when a transformer, relation or
    /// serializer is misconfigured.
    pub fn collection<'a, T, I>(&self, entities: I, transformer: T) -> Result<Value, TransformError>
    where
        T: Transformer,
        T::Entity: 'a,
        I: IntoIterator<Item = &'a T::Entity>,
    {
        self.create_data(Resource::collection(entities, transformer))
    }

    /// Walk a resource tree and hand the result to the serializer.
    ///
    /// # Errors
    ///
    /// Any [`TransformError`] aborts the whole representation.
    pub fn create_data(&self, resource: Resource<'_>) -> Result<Value, TransformError> {
        let key = resource.key().to_owned();
        let (value, kind) = match resource.shape {
            Shape::Item(None) => (self.serializer.null(&key), "null"),
            Shape::Item(Some(node)) => {
                let data = self.build(node.as_ref(), &self.includes)?;
                (self.serializer.item(&key, data), "item")
            }
            Shape::Collection(nodes) => {
                let data = nodes
                    .iter()
                    .map(|node| self.build(node.as_ref(), &self.includes))
                    .collect::<Result<Vec<_>, _>>()?;
                (self.serializer.collection(&key, data), "collection")
            }
        };

        if value.is_object() {
            Ok(value)
        } else {
            Err(TransformError::InconsistentEnvelope {
                serializer: self.serializer.name(),
                resource: kind,
            })
        }
    }

    fn build<'a>(
        &self,
        node: &dyn Node<'a>,
        includes: &IncludeSet,
    ) -> Result<AttributeMap, TransformError> {
        let mut attributes = node.attributes();
        if includes.is_empty() {
            return Ok(attributes);
        }

        let available = node.available_includes();
        let ignored = includes.unsupported(available);
        if !ignored.is_empty() {
            tracing::trace!(
                transformer = node.transformer_name(),
                ignored = ?ignored,
                "ignoring unsupported includes"
            );
        }

        for relation in includes.resolve(available) {
            let nested = node.include(relation)?;
            let embedded = self.embed(nested, &includes.scoped(relation))?;
            attributes.insert(relation.to_owned(), embedded);
        }
        Ok(attributes)
    }

    fn embed(&self, resource: Resource<'_>, includes: &IncludeSet) -> Result<Value, TransformError> {
        let relationship = match resource.shape {
            Shape::Item(None) => Relationship::Item(None),
            Shape::Item(Some(node)) => Relationship::Item(Some(self.build(node.as_ref(), includes)?)),
            Shape::Collection(nodes) => Relationship::Collection(
                nodes
                    .iter()
                    .map(|node| self.build(node.as_ref(), includes))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        Ok(self.serializer.relationship(relationship))
    }
}
