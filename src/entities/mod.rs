//! Catalog tables and the domain structs handed to the transformers.
//!
//! Each module pairs a Sea-ORM entity with its API struct, the create/update
//! payloads and the repository impls for that kind.

pub mod author;
pub mod book;
pub mod bundle;
pub mod bundle_book;
pub mod rating;

pub use author::{Author, AuthorCreate, AuthorUpdate};
pub use book::{Book, BookCreate, BookUpdate};
pub use bundle::{Bundle, BundleCreate};
pub use rating::{Rating, RatingCreate};

use chrono::{DateTime, SecondsFormat, Utc};

/// Wire format for timestamps, e.g. `2024-03-01T12:00:00Z`.
#[must_use]
pub fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
