//! # Error Handling
//!
//! Every handler returns `Result<_, ApiError>`. Errors render as
//!
//! ```json
//! {"error": {"message": "Book not found", "status": 404}}
//! ```
//!
//! except validation failures, which render as a `422` field map (see
//! [`crate::validation`]). Database and transformation details are logged
//! through `tracing` and never sent to clients. The detailed rendering, with
//! a `debug` object holding the error kind and internal details, travels as a
//! [`DebugBody`] response extension; the router swaps it in when the app
//! state has `debug` on (`APP_DEBUG=true`).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::{Value, json};
use std::fmt;

use crate::transform::TransformError;
use crate::validation::ValidationErrors;

/// Error body including internal details, carried on every error response.
#[derive(Debug, Clone)]
pub struct DebugBody(pub(crate) Value);

#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - Resource doesn't exist
    NotFound {
        /// Resource type (e.g., "Book", "Author")
        resource: String,
    },

    /// 400 Bad Request - Malformed input
    BadRequest { message: String },

    /// 422 Unprocessable Entity - Validation failed
    ValidationFailed { errors: ValidationErrors },

    /// 500 - Database error (details logged, not exposed)
    Database { internal: DbErr },

    /// 500 - Transformer/serializer misconfiguration (details logged, not exposed)
    Transform { internal: TransformError },

    /// Any other status with a user-facing message
    Custom {
        status: StatusCode,
        message: String,
        internal: Option<String>,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }

    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    pub fn custom(status: StatusCode, message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Custom {
            status,
            message: message.into(),
            internal,
        }
    }

    /// 404 for paths that look like a resource but cannot name one, e.g. `/books/abc`.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::custom(StatusCode::NOT_FOUND, "Not Found", None)
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Transform { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom { status, .. } => *status,
        }
    }

    /// Sanitized message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::BadRequest { message } | Self::Custom { message, .. } => message.clone(),
            Self::ValidationFailed { .. } => "Validation failed".to_string(),
            Self::Database { .. } | Self::Transform { .. } => self
                .status_code()
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::BadRequest { .. } => "bad_request",
            Self::ValidationFailed { .. } => "validation_failed",
            Self::Database { .. } => "database",
            Self::Transform { .. } => "transform",
            Self::Custom { .. } => "custom",
        }
    }

    fn internal_details(&self) -> Option<String> {
        match self {
            Self::Database { internal } => Some(internal.to_string()),
            Self::Transform { internal } => Some(internal.to_string()),
            Self::Custom { internal, .. } => internal.clone(),
            _ => None,
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Transform { internal } => {
                tracing::error!(error = %internal, "Transformation misconfigured");
            }
            Self::Custom {
                internal: Some(details),
                status,
                ..
            } => {
                tracing::error!(status = %status, details = %details, "Custom error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }

    /// Response body, with internal details only when `debug` is set.
    fn body(&self, debug: bool) -> Value {
        if let Self::ValidationFailed { errors } = self {
            return serde_json::to_value(errors).unwrap_or_else(|_| json!({}));
        }

        let mut error = json!({
            "message": self.user_message(),
            "status": self.status_code().as_u16(),
        });
        if debug {
            error["debug"] = json!({
                "kind": self.kind(),
                "details": self.internal_details(),
            });
        }
        json!({ "error": error })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        let mut response = (self.status_code(), Json(self.body(false))).into_response();
        response.extensions_mut().insert(DebugBody(self.body(true)));
        response
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// - `DbErr::RecordNotFound("Book not found")` → 404 "Book not found"
/// - everything else → 500, details logged
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound {
                    resource: resource.to_string(),
                }
            }
            _ => Self::Database { internal: err },
        }
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        Self::Transform { internal: err }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }
}
