use axum::Json;
use utoipa::OpenApi;

use crate::entities::{AuthorCreate, AuthorUpdate, BookCreate, BookUpdate, BundleCreate, RatingCreate};
use crate::routes::{author_ratings, authors, books, bundles};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "bookr",
        description = "Library catalog API. Every resource accepts `?include=` to embed relations."
    ),
    paths(
        books::get_all_handler,
        books::get_one_handler,
        books::create_one_handler,
        books::update_one_handler,
        books::delete_one_handler,
        authors::get_all_handler,
        authors::get_one_handler,
        authors::create_one_handler,
        authors::update_one_handler,
        authors::delete_one_handler,
        author_ratings::create_handler,
        author_ratings::delete_handler,
        bundles::get_all_handler,
        bundles::get_one_handler,
        bundles::create_one_handler,
        bundles::add_book_handler,
        bundles::remove_book_handler,
    ),
    components(schemas(BookCreate, BookUpdate, AuthorCreate, AuthorUpdate, RatingCreate, BundleCreate)),
    tags(
        (name = "books"),
        (name = "authors"),
        (name = "ratings"),
        (name = "bundles")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
