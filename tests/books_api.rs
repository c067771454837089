use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shelf_app::modules::books::repo::InMemoryBookRepository;
use shelf_app::modules::books::validation::TITLE_TOO_LONG;
use shelf_kernel::settings::Settings;
use tower::ServiceExt;

const FIRST_ISBN: &str = "9780306406157";
const SECOND_ISBN: &str = "9781861972712";

fn app() -> Router {
    let registry = shelf_app::registry(Arc::new(InMemoryBookRepository::new()));
    shelf_app::router(&registry, &Settings::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn create(app: &Router, title: &str, isbn: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({ "title": title, "isbn": isbn })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body {body}");
    body["data"].clone()
}

#[tokio::test]
async fn create_returns_envelope_with_record() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "title": "Book 1", "isbn": FIRST_ISBN, "publisher": "ignored" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book created successfully");
    assert_eq!(body["data"]["title"], "Book 1");
    assert_eq!(body["data"]["isbn"], FIRST_ISBN);
    assert!(body["data"]["id"].as_i64().is_some());
    assert!(body["data"]["createdAt"].is_string());
    assert!(body["data"]["deletedAt"].is_null());
    assert!(body["data"].get("publisher").is_none());
}

#[tokio::test]
async fn duplicate_isbn_is_a_bad_request() {
    let app = app();
    create(&app, "Book 1", FIRST_ISBN).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "title": "Copy", "isbn": FIRST_ISBN })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
    assert_eq!(
        body["message"],
        format!("Book with isbn {FIRST_ISBN} already exists")
    );
}

#[tokio::test]
async fn invalid_payload_lists_violations() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "title": "x".repeat(51), "isbn": "not-an-isbn" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .any(|e| e["field"] == "title" && e["message"] == TITLE_TOO_LONG));
    assert!(errors.iter().any(|e| e["field"] == "isbn"));

    let (_, list) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(list["data"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let request = Request::post("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_list_query_uses_error_body() {
    let response = app()
        .oneshot(Request::get("/books?withDeleted=maybe").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["statusCode"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn missing_book_is_reported_as_bad_request() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/books/999", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book with id 999 not found");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/books/999",
        Some(json!({ "title": "Updated Book Title" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::DELETE, "/books/999", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book with id 999 not found");
}

#[tokio::test]
async fn patch_changes_title_and_ignores_isbn() {
    let app = app();
    let created = create(&app, "Book 1", FIRST_ISBN).await;
    let uri = format!("/books/{}", created["id"]);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "title": "Updated Book Title", "isbn": SECOND_ISBN })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");
    assert_eq!(body["data"]["title"], "Updated Book Title");
    assert_eq!(body["data"]["isbn"], FIRST_ISBN);

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["message"], "Book details fetched successfully");
    assert_eq!(fetched["data"], body["data"]);
}

#[tokio::test]
async fn deleted_book_leaves_default_listing() {
    let app = app();
    let first = create(&app, "Book 1", FIRST_ISBN).await;
    let second = create(&app, "Book 2", SECOND_ISBN).await;

    let (_, list) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(list["message"], "Books fetched successfully");
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    let uri = format!("/books/{}", first["id"]);
    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Book deleted successfully");
    assert_eq!(deleted["data"]["id"], first["id"]);
    assert_eq!(deleted["data"]["isbn"], FIRST_ISBN);
    assert!(deleted["data"]["deletedAt"].is_string());

    let (_, list) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(list["data"], json!([second]));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, everything) = send(&app, Method::GET, "/books?withDeleted=true", None).await;
    let everything = everything["data"].as_array().unwrap();
    assert_eq!(everything.len(), 2);
    assert!(everything
        .iter()
        .any(|book| book["id"] == first["id"] && book["deletedAt"].is_string()));
}

#[tokio::test]
async fn responses_carry_security_and_cors_headers() {
    let app = app();
    let request = Request::get("/books")
        .header(header::ORIGIN, "https://books.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_describes_books() {
    let (status, spec) = send(&app(), Method::GET, "/docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/books"]["post"].is_object());
    assert!(spec["paths"]["/books/{id}"]["patch"].is_object());
}
