//! API integration tests

use axum::http::StatusCode;
use serde_json::json;

use bookshelf_server::services::notifier::{ChangeAction, Collection, Origin};

use crate::common::{catalog_entry, spawn_remote, unreachable_remote, Fault, TestApp};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new("");

    let (status, body) = app.request("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.request("GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "local");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_local_only_catalog_entry_lifecycle() {
    let app = TestApp::new("");

    let (status, created) = app.request("POST", "/catalog-entries", Some(catalog_entry())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["origin"], "local");
    let author_id = created["author_id"].as_i64().unwrap();
    let book_id = created["book_id"].as_i64().unwrap();
    assert!(author_id < 0);
    assert!(book_id < 0);
    assert_ne!(author_id, book_id);
    assert_eq!(created["author"]["books"][0]["name"], "Cien años de soledad");
    assert_eq!(created["author"]["prizes"][0]["name"], "Nobel");

    let (status, listing) = app.request("GET", "/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["remote_available"], false);
    assert_eq!(listing["authors"][0]["id"], author_id);

    let (_, books) = app.request("GET", "/books", None).await;
    assert_eq!(books["books"][0]["id"], book_id);

    let (status, detail) = app.request("GET", &format!("/books/{}", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["book"]["name"], "Cien años de soledad");
    assert_eq!(detail["reviews"], json!([]));

    let (status, _) = app.request("DELETE", &format!("/authors/{}", author_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.request("GET", &format!("/authors/{}", author_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
async fn test_blank_catalog_entry_is_rejected_without_writes() {
    let app = TestApp::new("");

    let (status, body) = app.request("POST", "/catalog-entries", Some(json!({"authorName": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Author name is required"));
    assert_eq!(app.store.write_count(), 0);
}

#[tokio::test]
async fn test_catalog_entry_created_remotely() {
    let (base_url, calls) = spawn_remote(Fault::None).await;
    let app = TestApp::new(&base_url);

    let (status, created) = app.request("POST", "/catalog-entries", Some(catalog_entry())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["origin"], "remote");
    assert_eq!(created["author_id"], 2);
    assert_eq!(created["book_id"], 11);
    assert_eq!(created["prize_id"], 21);
    assert!(created.get("author").is_none());
    assert_eq!(calls.prizes(), 1);
    assert_eq!(app.store.write_count(), 0);
}

#[tokio::test]
async fn test_catalog_entry_falls_back_when_book_step_fails() {
    let (base_url, calls) = spawn_remote(Fault::BookCreate).await;
    let app = TestApp::new(&base_url);

    let (status, created) = app.request("POST", "/catalog-entries", Some(catalog_entry())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["origin"], "local");
    assert!(created["author_id"].as_i64().unwrap() < 0);
    assert_eq!(calls.prizes(), 0);
    assert_eq!(app.store.write_count(), 1);

    // Local author listed ahead of the remote one
    let (_, listing) = app.request("GET", "/authors", None).await;
    assert_eq!(listing["remote_available"], true);
    let authors = listing["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0]["id"], created["author_id"]);
    assert_eq!(authors[1]["name"], "Remote Author");
}

#[tokio::test]
async fn test_catalog_entry_falls_back_on_unusable_prize_id() {
    let (base_url, calls) = spawn_remote(Fault::PrizeId).await;
    let app = TestApp::new(&base_url);

    let (_, ready) = app.request("GET", "/ready", None).await;
    assert_eq!(ready["mode"], "remote");

    let (status, created) = app.request("POST", "/catalog-entries", Some(catalog_entry())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["origin"], "local");
    assert!(created["prize_id"].as_i64().unwrap() < 0);
    assert_eq!(calls.prizes(), 1);
    assert_eq!(app.store.write_count(), 1);
}

#[tokio::test]
async fn test_unreachable_remote_degrades_to_local() {
    let app = TestApp::new(&unreachable_remote().await);

    let (status, listing) = app.request("GET", "/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["remote_available"], false);
    assert_eq!(listing["authors"], json!([]));

    let (status, stored) = app
        .request("POST", "/authors", Some(json!({"name": "Clarice Lispector"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored["origin"], "local");
    assert!(stored["author"]["id"].as_i64().unwrap() < 0);

    let (status, _) = app.request("GET", "/authors/7", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_remote_book_detail_uses_nested_reviews() {
    let (base_url, _) = spawn_remote(Fault::None).await;
    let app = TestApp::new(&base_url);

    let (status, detail) = app.request("GET", "/books/10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["book"]["name"], "Remote Book");
    assert_eq!(detail["reviews"][0]["name"], "Ana");

    let (status, _) = app.request("GET", "/authors/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_on_remote_and_local_books() {
    let (base_url, calls) = spawn_remote(Fault::BookCreate).await;
    let app = TestApp::new(&base_url);

    let (status, stored) = app
        .request("POST", "/books/10/reviews", Some(json!({"description": "Loved it"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored["origin"], "remote");
    assert_eq!(calls.reviews_posted(), 1);

    let (_, created) = app.request("POST", "/catalog-entries", Some(catalog_entry())).await;
    let book_id = created["book_id"].as_i64().unwrap();

    let (status, stored) = app
        .request(
            "POST",
            &format!("/books/{}/reviews", book_id),
            Some(json!({"name": " ", "source": "", "description": "Local note"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored["origin"], "local");
    assert_eq!(stored["review"]["name"], "Anon");
    assert_eq!(calls.reviews_posted(), 1);

    let (_, reviews) = app.request("GET", &format!("/books/{}/reviews", book_id), None).await;
    assert_eq!(reviews[0]["description"], "Local note");
    assert_eq!(reviews[0]["_local"], true);
}

#[tokio::test]
async fn test_review_without_description_is_rejected() {
    let app = TestApp::new("");

    let (status, body) = app
        .request("POST", "/books/10/reviews", Some(json!({"name": "Ana"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Description is required"));
    assert_eq!(app.store.write_count(), 0);
}

#[tokio::test]
async fn test_updating_local_author_conflicts() {
    let app = TestApp::new("");

    let (status, body) = app
        .request("PUT", "/authors/-5", Some(json!({"name": "Renamed"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "LocalOnly");
}

#[tokio::test]
async fn test_writes_notify_subscribers() {
    let app = TestApp::new("");
    let mut events = app.state.services.notifier.subscribe();

    let (status, stored) = app
        .request("POST", "/authors", Some(json!({"name": "Clarice Lispector"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let event = events.recv().await.unwrap();
    assert_eq!(event.collection, Collection::Authors);
    assert_eq!(event.action, ChangeAction::Created);
    assert_eq!(event.origin, Origin::Local);
    assert_eq!(event.id.map(i64::from), stored["author"]["id"].as_i64());
}
