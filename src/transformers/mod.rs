//! One [`Transformer`](crate::transform::Transformer) per catalog kind.

mod author;
mod book;
mod bundle;
mod rating;

pub use author::AuthorTransformer;
pub use book::BookTransformer;
pub use bundle::BundleTransformer;
pub use rating::RatingTransformer;
