use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;

use super::AppState;
use super::extract::{IncludeParams, json_body, parse_id};
use crate::core::{CatalogResource, LoadRelations};
use crate::entities::{Author, AuthorCreate, AuthorUpdate};
use crate::errors::ApiError;
use crate::transform::ResponseManager;
use crate::transformers::AuthorTransformer;
use crate::validation::Validatable;

#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(IncludeParams),
    responses(
        (status = 200, description = "Every author with their rating summary")
    )
)]
pub async fn get_all_handler(
    State(state): State<AppState>,
    manager: ResponseManager,
) -> Result<Json<Value>, ApiError> {
    let mut authors = Author::get_all(&state.db).await?;
    Author::load_relations(&state.db, &mut authors, manager.includes()).await?;
    Ok(Json(manager.collection(&authors, AuthorTransformer)?))
}

#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author id"), IncludeParams),
    responses(
        (status = 200, description = "The requested author"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    manager: ResponseManager,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let mut author = Author::get_one(&state.db, id).await?;
    Author::load_one(&state.db, &mut author, manager.includes()).await?;
    Ok(Json(manager.item(&author, AuthorTransformer)?))
}

#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    params(IncludeParams),
    request_body = AuthorCreate,
    responses(
        (status = 201, description = "Author created"),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_one_handler(
    State(state): State<AppState>,
    manager: ResponseManager,
    payload: Result<Json<AuthorCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let mut author = Author::create(&state.db, payload).await?;
    tracing::info!(author_id = author.id, "author created");
    Author::load_one(&state.db, &mut author, manager.includes()).await?;
    let body = manager.item(&author, AuthorTransformer)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/authors/{}", author.id))],
        Json(body),
    ))
}

#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author id"), IncludeParams),
    request_body = AuthorUpdate,
    responses(
        (status = 200, description = "Author updated"),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    manager: ResponseManager,
    payload: Result<Json<AuthorUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    Author::get_one(&state.db, id).await?;
    let payload = json_body(payload)?;
    payload.validate()?;

    let mut author = Author::update(&state.db, id, payload).await?;
    Author::load_one(&state.db, &mut author, manager.includes()).await?;
    Ok(Json(manager.item(&author, AuthorTransformer)?))
}

#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 204, description = "Author, their books and all related ratings deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    Author::delete_cascade(&state.db, id).await?;
    tracing::info!(author_id = id, "author deleted");
    Ok(StatusCode::NO_CONTENT)
}
