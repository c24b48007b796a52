//! Configuration errors raised while building a representation.
//!
//! None of these are caused by client input: an unknown include name is
//! ignored long before it can reach a transformer. Each variant means a
//! transformer, serializer or repository is wired up wrong, so the whole
//! representation is abandoned rather than partially emitted.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// `include` was invoked for a relation the transformer never declared.
    #[error("transformer `{transformer}` does not declare the `{relation}` include")]
    UndeclaredInclude {
        transformer: &'static str,
        relation: String,
    },

    /// The relation was requested but the repository did not attach it to the entity.
    #[error("relation `{relation}` was requested but not loaded onto the entity")]
    RelationNotLoaded { relation: &'static str },

    /// The serializer returned something other than a JSON object as a root envelope.
    #[error("serializer `{serializer}` produced a non-object envelope for a {resource} resource")]
    InconsistentEnvelope {
        serializer: &'static str,
        resource: &'static str,
    },
}

impl TransformError {
    pub fn undeclared(transformer: &'static str, relation: impl Into<String>) -> Self {
        Self::UndeclaredInclude {
            transformer,
            relation: relation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undeclared_include_message() {
        let err = TransformError::undeclared("BookTransformer", "publisher");
        assert_eq!(
            err.to_string(),
            "transformer `BookTransformer` does not declare the `publisher` include"
        );
    }

    #[test]
    fn test_relation_not_loaded_message() {
        let err = TransformError::RelationNotLoaded { relation: "author" };
        assert!(err.to_string().contains("`author`"));
    }
}
