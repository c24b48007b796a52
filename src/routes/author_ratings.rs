use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use super::AppState;
use super::extract::{json_body, parse_id};
use crate::core::CatalogResource;
use crate::entities::{Author, RatingCreate};
use crate::errors::ApiError;
use crate::rateable;
use crate::transform::ResponseManager;
use crate::transformers::RatingTransformer;
use crate::validation::Validatable;

#[utoipa::path(
    post,
    path = "/authors/{id}/ratings",
    tag = "ratings",
    params(("id" = i32, Path, description = "Author id")),
    request_body = RatingCreate,
    responses(
        (status = 201, description = "Rating added to the author"),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    manager: ResponseManager,
    payload: Result<Json<RatingCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = parse_id(&id)?;
    let author = Author::get_one(&state.db, id).await?;
    let payload = json_body(payload)?;
    payload.validate()?;

    let rating = rateable::add_rating(&state.db, &author, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(manager.item(&rating, RatingTransformer)?),
    ))
}

#[utoipa::path(
    delete,
    path = "/authors/{id}/ratings/{rating_id}",
    tag = "ratings",
    params(
        ("id" = i32, Path, description = "Author id"),
        ("rating_id" = i32, Path, description = "Rating id")
    ),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 404, description = "Author or rating not found")
    )
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((id, rating_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let rating_id = parse_id(&rating_id)?;
    let author = Author::get_one(&state.db, id).await?;
    rateable::delete_rating(&state.db, &author, rating_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
