//! Resources bind entities to the transformer that shapes them.

use std::sync::Arc;

use super::error::TransformError;
use super::transformer::{AttributeMap, Transformer};

/// Envelope key used when neither the caller nor the transformer names one.
pub const DEFAULT_KEY: &str = "data";

/// An entity paired with its transformer, with the entity type erased so
/// relations of different kinds can be walked uniformly.
pub(crate) trait Node<'a> {
    fn attributes(&self) -> AttributeMap;
    fn available_includes(&self) -> &'static [&'static str];
    fn include(&self, relation: &str) -> Result<Resource<'a>, TransformError>;
    fn transformer_name(&self) -> &'static str;
}

struct Bound<'a, T: Transformer> {
    entity: &'a T::Entity,
    transformer: Arc<T>,
}

impl<'a, T: Transformer> Node<'a> for Bound<'a, T> {
    fn attributes(&self) -> AttributeMap {
        self.transformer.transform(self.entity)
    }

    fn available_includes(&self) -> &'static [&'static str] {
        self.transformer.available_includes()
    }

    fn include(&self, relation: &str) -> Result<Resource<'a>, TransformError> {
        self.transformer.include(relation, self.entity)
    }

    fn transformer_name(&self) -> &'static str {
        self.transformer.name()
    }
}

pub(crate) enum Shape<'a> {
    Item(Option<Box<dyn Node<'a> + 'a>>),
    Collection(Vec<Box<dyn Node<'a> + 'a>>),
}

/// A single entity ("item") or an ordered sequence ("collection") together
/// with the transformer that shapes it.
///
/// Resources are immutable once built and only live for one transformation.
pub struct Resource<'a> {
    pub(crate) shape: Shape<'a>,
    key_hint: Option<String>,
    default_key: Option<&'static str>,
}

impl<'a> Resource<'a> {
    /// An item resource. `None` is a valid "no resource" state and serializes
    /// to the serializer's null representation.
    pub fn item<T: Transformer>(entity: Option<&'a T::Entity>, transformer: T) -> Self {
        let default_key = transformer.resource_key();
        let node = entity.map(|entity| {
            Box::new(Bound {
                entity,
                transformer: Arc::new(transformer),
            }) as Box<dyn Node<'a> + 'a>
        });
        Self {
            shape: Shape::Item(node),
            key_hint: None,
            default_key,
        }
    }

    /// An item resource with no entity.
    pub fn null<T: Transformer>(transformer: T) -> Self {
        Self::item(None, transformer)
    }

    /// A collection resource. Input order is preserved; nothing is sorted or
    /// de-duplicated.
    pub fn collection<T, I>(entities: I, transformer: T) -> Self
    where
        T: Transformer,
        I: IntoIterator<Item = &'a T::Entity>,
    {
        let default_key = transformer.resource_key();
        let transformer = Arc::new(transformer);
        let nodes = entities
            .into_iter()
            .map(|entity| {
                Box::new(Bound {
                    entity,
                    transformer: Arc::clone(&transformer),
                }) as Box<dyn Node<'a> + 'a>
            })
            .collect();
        Self {
            shape: Shape::Collection(nodes),
            key_hint: None,
            default_key,
        }
    }

    /// Override the envelope key for this resource.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key_hint = Some(key.into());
        self
    }

    /// Resolved envelope key: explicit hint, then the transformer's default,
    /// then [`DEFAULT_KEY`].
    #[must_use]
    pub fn key(&self) -> &str {
        self.key_hint
            .as_deref()
            .or(self.default_key)
            .unwrap_or(DEFAULT_KEY)
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self.shape, Shape::Collection(_))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.shape, Shape::Item(None))
    }

    /// Number of entities carried (0 or 1 for items).
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.shape {
            Shape::Item(node) => usize::from(node.is_some()),
            Shape::Collection(nodes) => nodes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Resource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_collection() { "Collection" } else { "Item" };
        f.debug_struct(kind)
            .field("key", &self.key())
            .field("len", &self.len())
            .finish()
    }
}
