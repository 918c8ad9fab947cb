//! Identity and validation rejections over HTTP

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{app, patch, send, send_raw, TestResponse};

fn assert_rejected(response: &TestResponse, error_key: &str) {
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errorKey"], error_key);
    assert_eq!(
        response.headers["x-bookregistry-error"],
        format!("error.{}", error_key).as_str()
    );
}

#[tokio::test]
async fn test_create_with_id_is_conflict() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "id": 4, "author": "A", "title": "T" })),
    )
    .await;
    assert_rejected(&response, "idexists");
    assert_eq!(response.body["entityName"], "bookBook");

    // Conflict wins even when required fields are missing
    let response = send(&app, Method::POST, "/api/category-types", Some(json!({ "id": 4 }))).await;
    assert_rejected(&response, "idexists");
    assert_eq!(response.body["entityName"], "bookCategoryType");

    let listed = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(listed.data(), &json!([]));
}

#[tokio::test]
async fn test_create_conflict_wins_over_undecodable_body() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "id": 4, "author": "A", "title": 5 })),
    )
    .await;
    assert_rejected(&response, "idexists");
}

#[tokio::test]
async fn test_malformed_bodies_use_error_body() {
    let app = app();

    let wrong_type = send(&app, Method::POST, "/api/books", Some(json!({ "author": "A", "title": 5 }))).await;
    assert_rejected(&wrong_type, "validation");

    let truncated = send_raw(&app, Method::POST, "/api/category-types", "{\"title\":", "application/json").await;
    assert_rejected(&truncated, "validation");

    let not_json = send_raw(&app, Method::POST, "/api/category-types", "title=x", "text/plain").await;
    assert_rejected(&not_json, "validation");
}

#[tokio::test]
async fn test_replace_priority_order() {
    let app = app();
    let id = send(&app, Method::POST, "/api/books", Some(json!({ "author": "A", "title": "T" })))
        .await
        .id();
    let uri = format!("/api/books/{}", id);

    let missing = send(&app, Method::PUT, &uri, Some(json!({ "author": "A" }))).await;
    assert_rejected(&missing, "idnull");

    let mismatch = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "id": id + 1, "author": "A", "title": "T" })),
    )
    .await;
    assert_rejected(&mismatch, "idinvalid");

    let unknown = send(
        &app,
        Method::PUT,
        "/api/books/404",
        Some(json!({ "id": 404, "author": "A", "title": "T" })),
    )
    .await;
    assert_rejected(&unknown, "idnotfound");

    let accepted = send(&app, Method::PUT, &uri, Some(json!({ "id": id, "author": "B", "title": "T" }))).await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert_eq!(accepted.data()["author"], "B");
}

#[tokio::test]
async fn test_merge_identity_checks() {
    let app = app();
    let id = send(&app, Method::POST, "/api/book-registrations", Some(json!({ "studentId": "S1" })))
        .await
        .id();
    let uri = format!("/api/book-registrations/{}", id);

    assert_rejected(&patch(&app, &uri, json!({ "remarks": "x" })).await, "idnull");
    assert_rejected(&patch(&app, &uri, json!({ "id": 0, "remarks": "x" })).await, "idinvalid");
    assert_rejected(
        &patch(&app, "/api/book-registrations/500", json!({ "id": 500 })).await,
        "idnotfound",
    );
}

#[tokio::test]
async fn test_field_validation() {
    let app = app();

    let missing_title = send(&app, Method::POST, "/api/books", Some(json!({ "author": "A" }))).await;
    assert_rejected(&missing_title, "validation");

    let long = "x".repeat(501);
    let too_long = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "author": "A", "title": "T", "description": long })),
    )
    .await;
    assert_rejected(&too_long, "validation");

    let id = send(&app, Method::POST, "/api/books", Some(json!({ "author": "A", "title": "T" })))
        .await
        .id();
    let cleared = patch(&app, &format!("/api/books/{}", id), json!({ "id": id, "title": null })).await;
    assert_rejected(&cleared, "validation");

    let stored = send(&app, Method::GET, &format!("/api/books/{}", id), None).await;
    assert_eq!(stored.data()["title"], "T");
}

#[tokio::test]
async fn test_unknown_reference_is_rejected() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/book-registrations",
        Some(json!({ "book": { "id": 77 } })),
    )
    .await;
    assert_rejected(&response, "validation");
}
