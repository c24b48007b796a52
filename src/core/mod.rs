// Repository capability consumed by the HTTP handlers: CRUD over the catalog
// tables plus relation loading driven by the request's include set.

pub mod traits;

pub use traits::{CatalogResource, LoadRelations, MergeIntoActiveModel};
