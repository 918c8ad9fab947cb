//! API integration tests

use axum::http::{Method, StatusCode};
use reqwest::Client;
use serde_json::{json, Value};

use crate::common::{app, patch, send};

const BASE_URL: &str = "http://localhost:8080/api";

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();

    let created = send(&app, Method::POST, "/api/books", Some(json!({ "author": "A", "title": "T" }))).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["status"], true);
    assert_eq!(created.body["message"], "Created successfully.");
    let id = created.id();
    assert_eq!(
        created.headers["x-bookregistry-alert"],
        format!("A new bookBook is created with identifier {}", id).as_str()
    );

    let patched = patch(&app, &format!("/api/books/{}", id), json!({ "id": id, "description": "D" })).await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["message"], "Patch successfully.");
    assert_eq!(patched.data()["author"], "A");
    assert_eq!(patched.data()["title"], "T");
    assert_eq!(patched.data()["description"], "D");

    let fetched = send(&app, Method::GET, &format!("/api/books/{}", id), None).await;
    assert_eq!(fetched.data()["description"], "D");

    let deleted = send(&app, Method::DELETE, &format!("/api/books/{}", id), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, Value::Null);
    assert_eq!(deleted.headers["x-bookregistry-params"], id.to_string().as_str());

    let again = send(&app, Method::DELETE, &format!("/api/books/{}", id), None).await;
    assert_eq!(again.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_put_is_total_overwrite() {
    let app = app();
    let id = send(
        &app,
        Method::POST,
        "/api/category-types",
        Some(json!({ "title": "Fiction", "description": "Novels" })),
    )
    .await
    .id();

    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/category-types/{}", id),
        Some(json!({ "id": id, "title": "Fiction" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["message"], "Update successfully.");
    assert_eq!(updated.data()["description"], Value::Null);
}

#[tokio::test]
async fn test_read_miss_is_null_data() {
    let app = app();
    for uri in ["/api/books/99", "/api/category-types/99", "/api/book-registrations/99"] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::OK, "{}", uri);
        assert_eq!(response.body["status"], true);
        assert_eq!(response.body["message"], "Inquiry successfully.");
        assert_eq!(response.body["data"], Value::Null);
    }
}

#[tokio::test]
async fn test_list_and_envelope_timestamp() {
    let app = app();
    for title in ["T1", "T2"] {
        send(&app, Method::POST, "/api/books", Some(json!({ "author": "A", "title": title }))).await;
    }

    let listed = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.data().as_array().map(Vec::len), Some(2));

    let timestamp = listed.body["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), "2024-01-31 09:15:00".len());
    assert_eq!(&timestamp[10..11], " ");
}

#[tokio::test]
async fn test_registration_wire_format() {
    let app = app();
    let created = send(
        &app,
        Method::POST,
        "/api/book-registrations",
        Some(json!({
            "studentId": "S-001",
            "requestDate": "2024-03-01T09:00:00Z",
            "requestStatus": "BORROW",
            "remarks": "first loan"
        })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["studentId"], "S-001");
    assert_eq!(created.data()["requestStatus"], "BORROW");
    assert_eq!(created.data()["book"], Value::Null);

    let rejected = send(
        &app,
        Method::POST,
        "/api/book-registrations",
        Some(json!({ "requestStatus": "LOST" })),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["errorKey"], "validation");
    assert_eq!(rejected.headers["x-bookregistry-error"], "error.validation");
}

#[tokio::test]
async fn test_patch_accepts_plain_json() {
    let app = app();
    let id = send(&app, Method::POST, "/api/category-types", Some(json!({ "title": "Fiction" })))
        .await
        .id();

    let patched = send(
        &app,
        Method::PATCH,
        &format!("/api/category-types/{}", id),
        Some(json!({ "id": id, "description": "Novels" })),
    )
    .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["message"], "Patch successfully.");
    assert_eq!(patched.data()["title"], "Fiction");
    assert_eq!(patched.data()["description"], "Novels");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    let health = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.body["storage"], "memory");

    let ready = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(ready.body["status"], "ready");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let doc = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(doc.status, StatusCode::OK);
    assert!(doc.body["paths"]["/books/{id}"].is_object());
}

#[tokio::test]
#[ignore] // Run against a live server with: cargo test -- --ignored
async fn test_live_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_live_create_and_delete_book() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "author": "A", "title": "T" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["data"]["id"].as_i64().expect("No id in response");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}
