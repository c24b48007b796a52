//! HTTP surface of the catalog.
//!
//! Handlers load entities through [`crate::core`], attach the requested
//! relations and hand the result to a per-request
//! [`ResponseManager`](crate::transform::ResponseManager).

pub mod author_ratings;
pub mod authors;
pub mod books;
pub mod bundles;
pub mod extract;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::errors::{ApiError, DebugBody};
use crate::openapi;
use crate::transform::{Serializer, SerializerKind};

pub use extract::IncludeParams;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub serializer: Arc<dyn Serializer>,
    /// Render internal error details into error bodies.
    pub debug: bool,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, serializer: SerializerKind) -> Self {
        Self {
            db,
            serializer: serializer.build(),
            debug: false,
        }
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(
            "/books",
            get(books::get_all_handler).post(books::create_one_handler),
        )
        .route(
            "/books/{id}",
            get(books::get_one_handler)
                .put(books::update_one_handler)
                .delete(books::delete_one_handler),
        )
        .route(
            "/authors",
            get(authors::get_all_handler).post(authors::create_one_handler),
        )
        .route(
            "/authors/{id}",
            get(authors::get_one_handler)
                .put(authors::update_one_handler)
                .delete(authors::delete_one_handler),
        )
        .route(
            "/authors/{id}/ratings",
            axum::routing::post(author_ratings::create_handler),
        )
        .route(
            "/authors/{id}/ratings/{rating_id}",
            axum::routing::delete(author_ratings::delete_handler),
        )
        .route(
            "/bundles",
            get(bundles::get_all_handler).post(bundles::create_one_handler),
        )
        .route("/bundles/{id}", get(bundles::get_one_handler))
        .route(
            "/bundles/{id}/books/{book_id}",
            axum::routing::put(bundles::add_book_handler).delete(bundles::remove_book_handler),
        )
        .route("/openapi.json", get(openapi::openapi_json))
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), error_details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Swaps the detailed body into error responses when `debug` is on.
async fn error_details(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let Some(DebugBody(body)) = response.extensions_mut().remove::<DebugBody>() else {
        return response;
    };
    if !state.debug {
        return response;
    }
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Json(body).into_response().into_body())
}

async fn fallback() -> ApiError {
    ApiError::route_not_found()
}
