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
use crate::entities::book::{self, Book, BookCreate, BookUpdate};
use crate::errors::ApiError;
use crate::transform::ResponseManager;
use crate::transformers::BookTransformer;
use crate::validation::Validatable;

#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(IncludeParams),
    responses(
        (status = 200, description = "Every book, in id order")
    )
)]
pub async fn get_all_handler(
    State(state): State<AppState>,
    manager: ResponseManager,
) -> Result<Json<Value>, ApiError> {
    let mut books = Book::get_all(&state.db).await?;
    Book::load_relations(&state.db, &mut books, manager.includes()).await?;
    Ok(Json(manager.collection(&books, BookTransformer)?))
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book id"), IncludeParams),
    responses(
        (status = 200, description = "The requested book"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    manager: ResponseManager,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let mut book = Book::get_one(&state.db, id).await?;
    Book::load_one(&state.db, &mut book, manager.includes()).await?;
    Ok(Json(manager.item(&book, BookTransformer)?))
}

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    params(IncludeParams),
    request_body = BookCreate,
    responses(
        (status = 201, description = "Book created"),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_one_handler(
    State(state): State<AppState>,
    manager: ResponseManager,
    payload: Result<Json<BookCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let mut errors = payload.validate().err().unwrap_or_default();
    book::check_author(&state.db, payload.author_id, &mut errors).await?;
    errors.result()?;

    let mut book = Book::create(&state.db, payload).await?;
    tracing::info!(book_id = book.id, "book created");
    Book::load_one(&state.db, &mut book, manager.includes()).await?;
    let body = manager.item(&book, BookTransformer)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/books/{}", book.id))],
        Json(body),
    ))
}

#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book id"), IncludeParams),
    request_body = BookUpdate,
    responses(
        (status = 200, description = "Book updated"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    manager: ResponseManager,
    payload: Result<Json<BookUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    Book::get_one(&state.db, id).await?;
    let payload = json_body(payload)?;
    let mut errors = payload.validate().err().unwrap_or_default();
    book::check_author(&state.db, payload.author_id, &mut errors).await?;
    errors.result()?;

    let mut book = Book::update(&state.db, id, payload).await?;
    Book::load_one(&state.db, &mut book, manager.includes()).await?;
    Ok(Json(manager.item(&book, BookTransformer)?))
}

#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    Book::delete_with_ratings(&state.db, id).await?;
    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
