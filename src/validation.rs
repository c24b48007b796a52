//! Validation Support
//!
//! Request payloads implement [`Validatable`]; handlers call it before any
//! persistence work, so the transformation layer is never reached with
//! invalid input. Failures render as `422 Unprocessable Entity` with one
//! entry per field:
//!
//! ```json
//! {"title": ["The title field is required."], "author_id": ["The selected author id is invalid."]}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bookr::validation::{Validatable, ValidationErrors, validators};
//!
//! impl Validatable for BundleCreate {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::required("title", self.title.as_deref()));
//!         errors.result()
//!     }
//! }
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors.
///
/// Serializes as a map from field name to the list of its messages, fields
/// in the order they first failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the outcome of a single validator.
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.add(error);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages for one field.
    #[must_use]
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message.as_str())
            .collect()
    }

    /// Field names in first-failure order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            map.serialize_entry(field, &self.messages(field))?;
        }
        map.end()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by create/update payloads.
pub trait Validatable {
    /// # Errors
    ///
    /// Returns every failed rule, not just the first.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Rule helpers producing the messages clients see.
pub mod validators {
    use super::ValidationError;

    /// `author_id` reads as "author id" in messages.
    #[must_use]
    pub fn attribute(field: &str) -> String {
        field.replace('_', " ")
    }

    /// The value must be present and not blank.
    ///
    /// # Errors
    ///
    /// Fails for `None` and whitespace-only strings.
    pub fn required(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
        match value {
            Some(value) if !value.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::new(
                field,
                format!("The {} field is required.", attribute(field)),
            )),
        }
    }

    /// The value must be present.
    ///
    /// # Errors
    ///
    /// Fails for `None`.
    pub fn present<T>(field: &str, value: Option<&T>) -> Result<(), ValidationError> {
        match value {
            Some(_) => Ok(()),
            None => Err(ValidationError::new(
                field,
                format!("The {} field is required.", attribute(field)),
            )),
        }
    }

    /// The value must be at most `max` characters long.
    ///
    /// # Errors
    ///
    /// Fails when the value is longer than `max` characters.
    pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
        if value.chars().count() > max {
            return Err(ValidationError::new(
                field,
                format!(
                    "The {} may not be greater than {max} characters.",
                    attribute(field)
                ),
            ));
        }
        Ok(())
    }

    /// The value must lie within `min..=max`.
    ///
    /// # Errors
    ///
    /// Fails when the value is outside the range.
    pub fn between(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
        if value < min || value > max {
            return Err(ValidationError::new(
                field,
                format!("The {} must be between {min} and {max}.", attribute(field)),
            ));
        }
        Ok(())
    }

    /// The value must be one of `options`, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Fails when no option matches.
    pub fn one_of(field: &str, value: &str, options: &[&str]) -> Result<(), ValidationError> {
        if options.iter().any(|option| option.eq_ignore_ascii_case(value)) {
            return Ok(());
        }
        Err(invalid_selection(field))
    }

    /// A referenced record does not exist.
    #[must_use]
    pub fn invalid_selection(field: &str) -> ValidationError {
        ValidationError::new(field, format!("The selected {} is invalid.", attribute(field)))
    }
}
