//! # Resource Transformation
//!
//! Converts domain entities into stable wire representations, decoupling the
//! shape of persisted rows from the API contract.
//!
//! - **[`Transformer`]**: per-kind mapping from an entity to its attributes,
//!   plus the relations it is able to expose.
//! - **[`Resource`]**: an item or collection bound to its transformer.
//! - **[`IncludeSet`]**: the relations a client asked to expand
//!   (`?include=author,author.ratings`).
//! - **[`Serializer`]**: the envelope strategy (`{"data": ...}` and friends).
//! - **[`ResponseManager`]**: walks a resource tree for one request.
//!
//! ```rust,ignore
//! let manager = ResponseManager::default().with_includes(IncludeSet::parse("author"));
//! let body = manager.item(&book, BookTransformer)?;
//! // {"data": {"id": 1, "title": "Dune", ..., "author": {"id": 1, "name": "Frank Herbert", ...}}}
//! ```
//!
//! The engine performs no I/O. Relations must be attached to the entities
//! before transformation; see [`crate::core::LoadRelations`].

pub mod error;
pub mod includes;
pub mod manager;
pub mod resource;
pub mod serializer;
pub mod transformer;

pub use error::TransformError;
pub use includes::IncludeSet;
pub use manager::ResponseManager;
pub use resource::{DEFAULT_KEY, Resource};
pub use serializer::{
    ArraySerializer, DataArraySerializer, NestedDataSerializer, Relationship, Serializer,
    SerializerKind, UnknownSerializer,
};
pub use transformer::{AttributeMap, Transformer};
