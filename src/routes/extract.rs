use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Query, rejection::JsonRejection},
    http::{Uri, request::Parts},
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::AppState;
use crate::errors::ApiError;
use crate::transform::ResponseManager;

/// `?include=author,ratings.author`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncludeParams {
    /// Comma-separated relations to embed; dotted paths reach nested relations.
    #[param(example = "author,ratings")]
    pub include: Option<String>,
}

/// Each request gets its own manager: the process-wide serializer plus the
/// includes parsed from this request's query string. The query never rejects
/// a request.
impl FromRequestParts<AppState> for ResponseManager {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut manager = ResponseManager::new(Arc::clone(&state.serializer));
        if let Some(raw) = include_values(&parts.uri) {
            manager.parse_includes(&raw);
        }
        Ok(manager)
    }
}

/// Every `include` value in the query, joined with commas, so
/// `?include=author&include=ratings` reads as `author,ratings`.
fn include_values(uri: &Uri) -> Option<String> {
    let pairs = match Query::<Vec<(String, String)>>::try_from_uri(uri) {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable query string ignored");
            return None;
        }
    };
    let values: Vec<String> = pairs
        .into_iter()
        .filter(|(key, _)| key == "include")
        .map(|(_, value)| value)
        .collect();
    (!values.is_empty()).then(|| values.join(","))
}

/// Ids are matched as strings so `/books/abc` is a plain 404 rather than an
/// extractor rejection.
pub(crate) fn parse_id(raw: &str) -> Result<i32, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ApiError::route_not_found());
    }
    raw.parse().map_err(|_| ApiError::route_not_found())
}

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
