use serde_json::{Map, Value};

use super::error::TransformError;
use super::resource::Resource;

/// Flat, ordered attribute mapping produced by a [`Transformer`].
pub type AttributeMap = Map<String, Value>;

/// Maps exactly one entity kind onto its wire attributes.
///
/// Implementations must be pure: `transform` always yields the same key set
/// for every instance of the entity kind and never touches the database. Any
/// relation a transformer can expose has to be attached to the entity by the
/// repository before the transformation starts.
///
/// ```rust,ignore
/// struct AuthorTransformer;
///
/// impl Transformer for AuthorTransformer {
///     type Entity = Author;
///
///     fn transform(&self, author: &Author) -> AttributeMap {
///         let mut attributes = AttributeMap::new();
///         attributes.insert("name".into(), author.name.clone().into());
///         attributes
///     }
/// }
/// ```
pub trait Transformer: Send + Sync + 'static {
    type Entity;

    /// Flatten the entity into its attribute mapping.
    fn transform(&self, entity: &Self::Entity) -> AttributeMap;

    /// Relation names this transformer is able to expand.
    fn available_includes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Envelope key used when the caller gives no explicit hint.
    fn resource_key(&self) -> Option<&'static str> {
        None
    }

    /// Build the nested resource for one of [`Self::available_includes`].
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UndeclaredInclude`] for a name the transformer
    /// does not declare, and [`TransformError::RelationNotLoaded`] when the
    /// relation was never attached to the entity.
    fn include<'a>(
        &self,
        relation: &str,
        entity: &'a Self::Entity,
    ) -> Result<Resource<'a>, TransformError> {
        let _ = entity;
        Err(TransformError::undeclared(self.name(), relation))
    }

    /// Short name used in error reports.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}
