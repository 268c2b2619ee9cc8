use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookstore_app::modules::{
    authors::AuthorStore,
    books::{BookStore, SqliteBookStore},
    register_all, register_stores,
};
use bookstore_app::{Author, AuthorId};
use bookstore_db::{Database, DbResult};
use bookstore_http::build_router;
use bookstore_kernel::{settings::Settings, ModuleRegistry};
use serde_json::{json, Value};
use tower::ServiceExt;

const ISBN: &str = "978-089-230342-0777";

async fn migrated(registry: &ModuleRegistry, db: &Database) {
    db.migrate(registry.collect_migrations()).await.unwrap();
}

async fn catalog() -> Router {
    let db = Database::open_in_memory().unwrap();
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, &db);
    migrated(&registry, &db).await;
    build_router(&registry, &Settings::default())
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

fn author_a() -> Value {
    json!({
        "name": "John Doe",
        "age": 40,
        "description": "Some description",
        "image": "author-image.jpeg"
    })
}

fn book_a(author_id: i64) -> Value {
    json!({
        "title": "Test Book A",
        "description": "A book description",
        "image": "book-image.jpeg",
        "author": { "id": author_id }
    })
}

async fn create_author(router: &Router) -> i64 {
    let (status, body) = send(router, Method::POST, "/v1/authors", Some(author_a())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn healthz_and_openapi_are_served() {
    let router = catalog().await;

    let (status, body) = send(&router, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));

    let (status, body) = send(&router, Method::GET, "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/books/{isbn}"]["put"].is_object());
}

#[tokio::test]
async fn request_id_is_propagated() {
    let router = catalog().await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/v1/authors")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn author_lifecycle() {
    let router = catalog().await;

    let (status, body) = send(&router, Method::GET, "/v1/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let id = create_author(&router).await;

    let (status, body) = send(&router, Method::GET, &format!("/v1/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "John Doe");
    assert_eq!(body["age"], 40);

    let replacement = json!({
        "id": id + 100,
        "name": "Jane Roe",
        "age": 55,
        "description": "Another description",
        "image": "author-image-b.jpeg"
    });
    let (status, body) =
        send(&router, Method::PUT, &format!("/v1/authors/{id}"), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Jane Roe");

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/v1/authors/{id}"),
        Some(json!({ "age": 56, "name": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["age"], 56);
    assert_eq!(body["name"], "Jane Roe");
    assert_eq!(body["image"], "author-image-b.jpeg");

    let (status, body) = send(&router, Method::GET, "/v1/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    for _ in 0..2 {
        let (status, _) = send(&router, Method::DELETE, &format!("/v1/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    let (status, _) = send(&router, Method::GET, &format!("/v1/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_errors_map_to_status_codes() {
    let router = catalog().await;

    let mut with_id = author_a();
    with_id["id"] = json!(999);
    let (status, body) = send(&router, Method::POST, "/v1/authors", Some(with_id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_argument");
    assert!(body["error"]["trace_id"].is_string());

    let (status, body) = send(&router, Method::GET, "/v1/authors/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, body) = send(&router, Method::PUT, "/v1/authors/999", Some(author_a())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_state");

    let (status, _) = send(
        &router,
        Method::PATCH,
        "/v1/authors/999",
        Some(json!({ "name": "New Name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn book_upsert_reports_created_then_updated() {
    let router = catalog().await;
    let author_id = create_author(&router).await;
    let uri = format!("/v1/books/{ISBN}");

    let (status, body) = send(&router, Method::PUT, &uri, Some(book_a(author_id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isbn"], ISBN);
    assert_eq!(
        body["author"],
        json!({ "id": author_id, "name": "John Doe", "image": "author-image.jpeg" })
    );

    let mut renamed = book_a(author_id);
    renamed["title"] = json!("Test Book B");
    renamed["isbn"] = json!("ignored-isbn");
    let (status, body) = send(&router, Method::PUT, &uri, Some(renamed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isbn"], ISBN);
    assert_eq!(body["title"], "Test Book B");

    let (status, body) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Test Book B");

    let (status, body) = send(&router, Method::GET, "/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn book_with_unknown_author_is_rejected() {
    let router = catalog().await;

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/v1/books/{ISBN}"),
        Some(book_a(999)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_state");

    let (status, _) = send(&router, Method::GET, &format!("/v1/books/{ISBN}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn books_filter_by_author() {
    let router = catalog().await;
    let first = create_author(&router).await;
    let second = create_author(&router).await;

    send(&router, Method::PUT, "/v1/books/isbn-1", Some(book_a(first))).await;
    send(&router, Method::PUT, "/v1/books/isbn-2", Some(book_a(second))).await;

    let uri = format!("/v1/books?author={first}");
    let (status, body) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], "isbn-1");

    let (_, body) = send(&router, Method::GET, "/v1/books?author=999", None).await;
    assert_eq!(body, json!([]));

    let (_, body) = send(&router, Method::GET, "/v1/books", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn book_patch_and_delete() {
    let router = catalog().await;
    let author_id = create_author(&router).await;
    let uri = format!("/v1/books/{ISBN}");

    let (status, _) = send(&router, Method::PATCH, &uri, Some(json!({ "title": "New" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&router, Method::PUT, &uri, Some(book_a(author_id))).await;

    let (status, body) = send(
        &router,
        Method::PATCH,
        &uri,
        Some(json!({ "description": "A new description." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "A new description.");
    assert_eq!(body["title"], "Test Book A");

    for _ in 0..2 {
        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    let (status, _) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_author_with_books_is_a_server_error() {
    let router = catalog().await;
    let author_id = create_author(&router).await;
    send(&router, Method::PUT, &format!("/v1/books/{ISBN}"), Some(book_a(author_id))).await;

    let uri = format!("/v1/authors/{author_id}");
    let (status, body) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");
}

/// Resolves every author without an id.
struct UnpersistedAuthors;

#[async_trait]
impl AuthorStore for UnpersistedAuthors {
    async fn insert(&self, author: &Author) -> DbResult<Author> {
        Ok(author.clone())
    }

    async fn find(&self, _id: AuthorId) -> DbResult<Option<Author>> {
        Ok(Some(Author {
            id: None,
            name: "John Doe".to_string(),
            age: 40,
            description: "Some description".to_string(),
            image: "author-image.jpeg".to_string(),
        }))
    }

    async fn exists(&self, _id: AuthorId) -> DbResult<bool> {
        Ok(true)
    }

    async fn list(&self) -> DbResult<Vec<Author>> {
        Ok(Vec::new())
    }

    async fn update(&self, _id: AuthorId, author: &Author) -> DbResult<Option<Author>> {
        Ok(Some(author.clone()))
    }

    async fn delete(&self, _id: AuthorId) -> DbResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn book_with_unpersisted_author_is_a_server_error() {
    let db = Database::open_in_memory().unwrap();
    let mut registry = ModuleRegistry::new();
    register_stores(
        &mut registry,
        Arc::new(UnpersistedAuthors),
        Arc::new(SqliteBookStore::new(db.clone())),
    );
    migrated(&registry, &db).await;
    let router = build_router(&registry, &Settings::default());

    let uri = format!("/v1/books/{ISBN}");
    let (status, body) = send(&router, Method::PUT, &uri, Some(book_a(1))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");

    assert!(!SqliteBookStore::new(db).exists(ISBN).await.unwrap());
}
