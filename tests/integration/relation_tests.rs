//! Relationship consistency across endpoints

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{app, patch, send};

async fn create(app: &axum::Router, uri: &str, body: Value) -> i64 {
    let response = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.id()
}

async fn get(app: &axum::Router, uri: String) -> Value {
    send(app, Method::GET, &uri, None).await.data().clone()
}

#[tokio::test]
async fn test_category_reference_is_one_sided() {
    let app = app();
    let category = create(&app, "/api/category-types", json!({ "title": "Fiction" })).await;
    let book = create(&app, "/api/books", json!({ "author": "X", "title": "Y" })).await;

    // Reference-side write: the category does not list the book
    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", book),
        Some(json!({ "id": book, "author": "X", "title": "Y", "categoryType": { "id": category } })),
    )
    .await;
    assert_eq!(updated.data()["categoryType"], json!({ "id": category }));
    let stored = get(&app, format!("/api/category-types/{}", category)).await;
    assert_eq!(stored["books"], json!([]));

    // Collection-side write: both sides agree
    let patched = patch(
        &app,
        &format!("/api/category-types/{}", category),
        json!({ "id": category, "books": [{ "id": book }] }),
    )
    .await;
    assert_eq!(patched.data()["books"], json!([{ "id": book }]));
    assert_eq!(patched.data()["title"], "Fiction");
    let stored = get(&app, format!("/api/books/{}", book)).await;
    assert_eq!(stored["categoryType"], json!({ "id": category }));
}

#[tokio::test]
async fn test_book_registrations_collection() {
    let app = app();
    let first = create(&app, "/api/book-registrations", json!({ "studentId": "S1" })).await;
    let second = create(&app, "/api/book-registrations", json!({ "studentId": "S2" })).await;
    let book = create(
        &app,
        "/api/books",
        json!({ "author": "A", "title": "T", "bookRegistrations": [{ "id": first }, { "id": second }] }),
    )
    .await;

    for registration in [first, second] {
        let stored = get(&app, format!("/api/book-registrations/{}", registration)).await;
        assert_eq!(stored["book"], json!({ "id": book }));
    }

    // Replacing with an omitted collection releases every registration
    send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", book),
        Some(json!({ "id": book, "author": "A", "title": "T" })),
    )
    .await;
    for registration in [first, second] {
        let stored = get(&app, format!("/api/book-registrations/{}", registration)).await;
        assert_eq!(stored["book"], Value::Null);
    }
}

#[tokio::test]
async fn test_registration_moves_between_books() {
    let app = app();
    let old_book = create(&app, "/api/books", json!({ "author": "A", "title": "Old" })).await;
    let new_book = create(&app, "/api/books", json!({ "author": "A", "title": "New" })).await;
    let registration = create(&app, "/api/book-registrations", json!({ "requestStatus": "BORROW" })).await;

    patch(
        &app,
        &format!("/api/books/{}", old_book),
        json!({ "id": old_book, "bookRegistrations": [{ "id": registration }] }),
    )
    .await;

    let moved = patch(
        &app,
        &format!("/api/book-registrations/{}", registration),
        json!({ "id": registration, "book": { "id": new_book }, "requestStatus": "RETURN" }),
    )
    .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.data()["requestStatus"], "RETURN");

    let old = get(&app, format!("/api/books/{}", old_book)).await;
    assert_eq!(old["bookRegistrations"], json!([]));
    let new = get(&app, format!("/api/books/{}", new_book)).await;
    assert_eq!(new["bookRegistrations"], json!([{ "id": registration }]));
}

#[tokio::test]
async fn test_delete_keeps_relations_consistent() {
    let app = app();
    let category = create(&app, "/api/category-types", json!({ "title": "Fiction" })).await;
    let registration = create(&app, "/api/book-registrations", json!({ "studentId": "S1" })).await;
    let book = create(
        &app,
        "/api/books",
        json!({ "author": "A", "title": "T", "bookRegistrations": [{ "id": registration }] }),
    )
    .await;
    patch(
        &app,
        &format!("/api/category-types/{}", category),
        json!({ "id": category, "books": [{ "id": book }] }),
    )
    .await;

    let deleted = send(&app, Method::DELETE, &format!("/api/book-registrations/{}", registration), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let stored = get(&app, format!("/api/books/{}", book)).await;
    assert_eq!(stored["bookRegistrations"], json!([]));

    send(&app, Method::DELETE, &format!("/api/books/{}", book), None).await;
    let stored = get(&app, format!("/api/category-types/{}", category)).await;
    assert_eq!(stored["books"], json!([]));
}

#[tokio::test]
async fn test_delete_after_one_sided_replace() {
    let app = app();
    let category = create(&app, "/api/category-types", json!({ "title": "Fiction" })).await;
    let book = create(&app, "/api/books", json!({ "author": "A", "title": "T" })).await;
    patch(
        &app,
        &format!("/api/category-types/{}", category),
        json!({ "id": category, "books": [{ "id": book }] }),
    )
    .await;

    // Only the book's side is cleared
    send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", book),
        Some(json!({ "id": book, "author": "A", "title": "T" })),
    )
    .await;
    let stored = get(&app, format!("/api/category-types/{}", category)).await;
    assert_eq!(stored["books"], json!([{ "id": book }]));

    let deleted = send(&app, Method::DELETE, &format!("/api/books/{}", book), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let stored = get(&app, format!("/api/category-types/{}", category)).await;
    assert_eq!(stored["books"], json!([]));
}
