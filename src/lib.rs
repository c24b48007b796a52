//! # bookr
//!
//! A library catalog REST API whose responses are produced by a small
//! resource transformation layer:
//!
//! - [`transform`]: transformers, resources, include parsing, serializers and
//!   the response manager tying them together
//! - [`transformers`]: the concrete transformer for each catalog kind
//! - [`core`]: repository traits over Sea-ORM, including relation loading
//!   driven by the request's include set
//! - [`routes`]: the Axum router
//!
//! ```rust,ignore
//! let manager = ResponseManager::default().with_includes(IncludeSet::parse("author"));
//! let body = manager.item(&book, BookTransformer)?;
//! // {"data": {"id": 1, "title": "Emma", ..., "author": {...}}}
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod errors;
pub mod join_fields;
pub mod migration;
pub mod openapi;
pub mod rateable;
pub mod routes;
pub mod seed;
pub mod transform;
pub mod transformers;
pub mod validation;

pub use crate::core::{CatalogResource, LoadRelations, MergeIntoActiveModel};
pub use errors::ApiError;
pub use transform::{IncludeSet, ResponseManager, Resource, Serializer, TransformError, Transformer};
