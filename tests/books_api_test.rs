use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{
    create_author, create_book, send, setup_debug_app, setup_test_app, setup_test_db,
};

#[tokio::test]
async fn test_index_reports_version() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(&app, "GET", "/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "bookr");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_list_books_empty() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(&app, "GET", "/books", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_list_books_in_id_order() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "H. G. Wells").await;
    let first = create_book(&app, author, "The War of the Worlds").await;
    let second = create_book(&app, author, "The Invisible Man").await;

    let response = send(&app, "GET", "/books", None).await;
    let data = response.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], first);
    assert_eq!(data[1]["id"], second);
    assert!(data[0].get("author").is_none());
}

#[tokio::test]
async fn test_show_book_attributes() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "H. G. Wells").await;
    let id = create_book(&app, author, "The Time Machine").await;

    let response = send(&app, "GET", &format!("/books/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let book = response.body["data"].as_object().unwrap();
    let keys: Vec<&str> = book.keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "title", "description", "created", "updated"]);
    assert_eq!(book["title"], "The Time Machine");
    assert_eq!(book["description"], "About The Time Machine");
}

#[tokio::test]
async fn test_show_book_with_author_include() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "H. G. Wells").await;
    let id = create_book(&app, author, "The Time Machine").await;

    let response = send(&app, "GET", &format!("/books/{id}?include=author"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["author"]["id"], author);
    assert_eq!(response.body["data"]["author"]["name"], "H. G. Wells");
    // Not requested, so not embedded one level down either.
    assert!(response.body["data"]["author"].get("books").is_none());
}

#[tokio::test]
async fn test_repeated_include_params_are_merged() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "H. G. Wells").await;
    let id = create_book(&app, author, "The Time Machine").await;

    let response = send(
        &app,
        "GET",
        &format!("/books/{id}?include=author&include=ratings"),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["author"]["id"], author);
    assert_eq!(response.body["data"]["ratings"], json!([]));

    let keys: Vec<&str> = response.body["data"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(&keys[keys.len() - 2..], ["author", "ratings"]);
}

#[tokio::test]
async fn test_nested_include_reaches_author_books() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "H. G. Wells").await;
    let id = create_book(&app, author, "The Time Machine").await;
    create_book(&app, author, "Kipps").await;

    let response = send(
        &app,
        "GET",
        &format!("/books/{id}?include=author.books"),
        None,
    )
    .await;
    let books = response.body["data"]["author"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[1]["title"], "Kipps");
}

#[tokio::test]
async fn test_unknown_include_is_ignored() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "H. G. Wells").await;
    let id = create_book(&app, author, "The Time Machine").await;

    let response = send(
        &app,
        "GET",
        &format!("/books/{id}?include=publisher,author,,author"),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].get("publisher").is_none());
    assert_eq!(response.body["data"]["author"]["id"], author);
}

#[tokio::test]
async fn test_show_missing_book() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(&app, "GET", "/books/99999", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({ "error": { "message": "Book not found", "status": 404 } })
    );
}

#[tokio::test]
async fn test_debug_app_adds_error_details() {
    let app = setup_debug_app(setup_test_db().await.unwrap());

    let response = send(&app, "GET", "/books/999", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["message"], "Book not found");
    assert_eq!(response.body["error"]["debug"]["kind"], "not_found");

    let unmatched = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(unmatched.status, StatusCode::NOT_FOUND);
    assert_eq!(unmatched.body["error"]["debug"]["kind"], "custom");
}

#[tokio::test]
async fn test_error_details_hidden_without_debug() {
    let app = setup_test_app(setup_test_db().await.unwrap());

    let response = send(&app, "GET", "/books/999", None).await;
    assert_eq!(
        response.body,
        json!({ "error": { "message": "Book not found", "status": 404 } })
    );
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(&app, "GET", "/books/this-is-invalid", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["message"], "Not Found");
}

#[tokio::test]
async fn test_create_book_sets_location() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "Jane Austen").await;

    let response = send(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "Persuasion",
            "description": "Second chances.",
            "author_id": author,
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["data"]["id"].as_i64().unwrap();
    assert_eq!(
        response.headers[header::LOCATION].to_str().unwrap(),
        format!("/books/{id}")
    );
    assert_eq!(response.body["data"]["title"], "Persuasion");
}

#[tokio::test]
async fn test_create_book_validation() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(&app, "POST", "/books", Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["title"], json!(["The title field is required."]));
    assert_eq!(
        response.body["description"],
        json!(["The description field is required."])
    );
    assert_eq!(
        response.body["author_id"],
        json!(["The author id field is required."])
    );
}

#[tokio::test]
async fn test_create_book_title_too_long_and_unknown_author() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "x".repeat(256),
            "description": "Too long",
            "author_id": 12345,
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body,
        json!({
            "title": ["The title may not be greater than 255 characters."],
            "author_id": ["The selected author id is invalid."],
        })
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let request = Request::builder()
        .method("POST")
        .uri("/books")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn test_update_book_partially() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "Jane Austen").await;
    let id = create_book(&app, author, "Emma").await;

    let response = send(
        &app,
        "PUT",
        &format!("/books/{id}"),
        Some(json!({ "title": "Emma (Annotated)" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "Emma (Annotated)");
    assert_eq!(response.body["data"]["description"], "About Emma");

    let cleared = send(
        &app,
        "PUT",
        &format!("/books/{id}"),
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(cleared.body["data"]["description"], json!(null));
}

#[tokio::test]
async fn test_update_missing_book_is_not_found_before_validation() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(&app, "PUT", "/books/424242", Some(json!({ "title": "" }))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["message"], "Book not found");
}

#[tokio::test]
async fn test_update_book_validation() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "Jane Austen").await;
    let id = create_book(&app, author, "Emma").await;

    let response = send(
        &app,
        "PUT",
        &format!("/books/{id}"),
        Some(json!({ "title": "", "author_id": 9876 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["title"], json!(["The title field is required."]));
    assert_eq!(
        response.body["author_id"],
        json!(["The selected author id is invalid."])
    );
}

#[tokio::test]
async fn test_delete_book() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "Jane Austen").await;
    let id = create_book(&app, author, "Emma").await;

    let response = send(&app, "DELETE", &format!("/books/{id}"), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.body, serde_json::Value::Null);

    let gone = send(&app, "GET", &format!("/books/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let again = send(&app, "DELETE", &format!("/books/{id}"), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_ratings_include_is_empty_list() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let author = create_author(&app, "Jane Austen").await;
    let id = create_book(&app, author, "Emma").await;

    let response = send(&app, "GET", &format!("/books/{id}?include=ratings"), None).await;
    assert_eq!(response.body["data"]["ratings"], json!([]));
}

#[tokio::test]
async fn test_unmatched_route() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let response = send(&app, "GET", "/publishers", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({ "error": { "message": "Not Found", "status": 404 } })
    );
}
