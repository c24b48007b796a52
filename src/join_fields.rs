//! Relation slots on domain entities.
//!
//! Repositories only attach the relations a request asked for, so every
//! relation on a domain struct is either loaded or explicitly absent. The
//! transformers refuse to expand a relation that was never loaded instead of
//! silently rendering it as empty.

use crate::transform::TransformError;

#[derive(Debug, Clone, Default)]
pub enum JoinField<T> {
    Loaded(T),
    #[default]
    NotLoaded,
}

impl<T> PartialEq for JoinField<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JoinField::Loaded(a), JoinField::Loaded(b)) => a == b,
            (JoinField::NotLoaded, JoinField::NotLoaded) => true,
            _ => false,
        }
    }
}

impl<T> JoinField<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            JoinField::Loaded(data) => Some(data),
            JoinField::NotLoaded => None,
        }
    }

    pub fn set(&mut self, data: T) {
        *self = JoinField::Loaded(data);
    }

    /// The loaded value, or a configuration error naming the relation.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::RelationNotLoaded`] when the repository did
    /// not attach the relation.
    pub fn require(&self, relation: &'static str) -> Result<&T, TransformError> {
        self.get()
            .ok_or(TransformError::RelationNotLoaded { relation })
    }
}
