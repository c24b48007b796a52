#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use bookr::migration::Migrator;
use bookr::routes::{AppState, router};
use bookr::transform::SerializerKind;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    router(AppState::new(db, SerializerKind::Data))
}

pub fn setup_test_app_with(db: DatabaseConnection, serializer: SerializerKind) -> Router {
    router(AppState::new(db, serializer))
}

pub fn setup_debug_app(db: DatabaseConnection) -> Router {
    router(AppState::new(db, SerializerKind::Data).with_debug(true))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request; an empty response body comes back as `Value::Null`.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn create_author(app: &Router, name: &str) -> i64 {
    let response = send(
        app,
        "POST",
        "/authors",
        Some(serde_json::json!({ "name": name, "gender": "female", "biography": "Writes." })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["id"].as_i64().unwrap()
}

pub async fn create_book(app: &Router, author_id: i64, title: &str) -> i64 {
    let response = send(
        app,
        "POST",
        "/books",
        Some(serde_json::json!({
            "title": title,
            "description": format!("About {title}"),
            "author_id": author_id,
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["id"].as_i64().unwrap()
}

pub async fn rate_author(app: &Router, author_id: i64, value: i64) -> i64 {
    let response = send(
        app,
        "POST",
        &format!("/authors/{author_id}/ratings"),
        Some(serde_json::json!({ "value": value })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["id"].as_i64().unwrap()
}

pub async fn create_bundle(app: &Router, title: &str) -> i64 {
    let response = send(
        app,
        "POST",
        "/bundles",
        Some(serde_json::json!({ "title": title, "description": "A bundle" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["id"].as_i64().unwrap()
}
