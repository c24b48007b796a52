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
use crate::entities::{Bundle, BundleCreate};
use crate::errors::ApiError;
use crate::transform::ResponseManager;
use crate::transformers::BundleTransformer;
use crate::validation::Validatable;

#[utoipa::path(
    get,
    path = "/bundles",
    tag = "bundles",
    params(IncludeParams),
    responses(
        (status = 200, description = "Every bundle")
    )
)]
pub async fn get_all_handler(
    State(state): State<AppState>,
    manager: ResponseManager,
) -> Result<Json<Value>, ApiError> {
    let mut bundles = Bundle::get_all(&state.db).await?;
    Bundle::load_relations(&state.db, &mut bundles, manager.includes()).await?;
    Ok(Json(manager.collection(&bundles, BundleTransformer)?))
}

#[utoipa::path(
    get,
    path = "/bundles/{id}",
    tag = "bundles",
    params(("id" = i32, Path, description = "Bundle id"), IncludeParams),
    responses(
        (status = 200, description = "The requested bundle"),
        (status = 404, description = "Bundle not found")
    )
)]
pub async fn get_one_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    manager: ResponseManager,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let mut bundle = Bundle::get_one(&state.db, id).await?;
    Bundle::load_one(&state.db, &mut bundle, manager.includes()).await?;
    Ok(Json(manager.item(&bundle, BundleTransformer)?))
}

#[utoipa::path(
    post,
    path = "/bundles",
    tag = "bundles",
    request_body = BundleCreate,
    responses(
        (status = 201, description = "Bundle created"),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_one_handler(
    State(state): State<AppState>,
    manager: ResponseManager,
    payload: Result<Json<BundleCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let mut bundle = Bundle::create(&state.db, payload).await?;
    tracing::info!(bundle_id = bundle.id, "bundle created");
    Bundle::load_one(&state.db, &mut bundle, manager.includes()).await?;
    let body = manager.item(&bundle, BundleTransformer)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/bundles/{}", bundle.id))],
        Json(body),
    ))
}

#[utoipa::path(
    put,
    path = "/bundles/{id}/books/{book_id}",
    tag = "bundles",
    params(
        ("id" = i32, Path, description = "Bundle id"),
        ("book_id" = i32, Path, description = "Book id"),
        IncludeParams
    ),
    responses(
        (status = 200, description = "The bundle after adding the book"),
        (status = 404, description = "Bundle or book not found")
    )
)]
pub async fn add_book_handler(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(String, String)>,
    manager: ResponseManager,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let book_id = parse_id(&book_id)?;
    let mut bundle = Bundle::attach_book(&state.db, id, book_id).await?;
    Bundle::load_one(&state.db, &mut bundle, manager.includes()).await?;
    Ok(Json(manager.item(&bundle, BundleTransformer)?))
}

#[utoipa::path(
    delete,
    path = "/bundles/{id}/books/{book_id}",
    tag = "bundles",
    params(
        ("id" = i32, Path, description = "Bundle id"),
        ("book_id" = i32, Path, description = "Book id")
    ),
    responses(
        (status = 204, description = "Book removed from the bundle"),
        (status = 404, description = "Bundle or book not found")
    )
)]
pub async fn remove_book_handler(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let book_id = parse_id(&book_id)?;
    Bundle::detach_book(&state.db, id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
