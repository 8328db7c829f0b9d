//! # Server Tests
//!
//! End-to-end tests for the public, unauthenticated routes: the health check,
//! the popular books list and the book detail redirect.

mod common;

use anyhow::Result;
use bookrec_test_utils::sample_catalog;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(app.url("/health")).send().await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_popular_books_carry_isbn_and_image() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;

    // --- 2. Act ---
    let response = app.client.get(app.url("/")).send().await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert!(body.get("debug").is_none(), "debug is opt-in");

    let books = body["result"].as_array().expect("result is a list");
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["title"], "The Hobbit");
    assert_eq!(books[0]["num_ratings"], 540);
    assert_eq!(books[0]["avg_rating"], 8.9);
    assert_eq!(books[0]["isbn"], "0000000003");
    assert_eq!(books[0]["image_url"], "http://images.test/2.jpg");
    assert_eq!(books[1]["title"], "Dune");
    assert_eq!(books[1]["isbn"], "0000000004");
    Ok(())
}

#[tokio::test]
async fn test_popular_book_without_image_gets_placeholder() -> Result<()> {
    // "Lost Manuscript" has no book row, so it has neither image nor ISBN.
    let app =
        TestApp::spawn_with_catalog(sample_catalog().popular("Lost Manuscript", 12, 7.5)).await?;

    let body: Value = app.client.get(app.url("/")).send().await?.json().await?;

    let books = body["result"].as_array().expect("result is a list");
    let lost = books
        .iter()
        .find(|b| b["title"] == "Lost Manuscript")
        .expect("popular entry is listed");
    assert_eq!(lost["image_url"], "/static/images/default-placeholder.jpg");
    assert!(lost["isbn"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_popular_books_debug_info() -> Result<()> {
    let app = TestApp::spawn().await?;

    let body: Value = app
        .client
        .get(app.url("/?debug=true"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["debug"]["catalog_titles"], 7);
    assert_eq!(body["debug"]["popular"], 2);
    Ok(())
}

#[tokio::test]
async fn test_book_detail_redirects_to_catalog_page() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .get(app.url("/book_detail/The%20Hobbit"))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("redirect has a location")
        .to_str()?;
    assert_eq!(location, "https://books.google.com/books?vid=ISBN0000000003");
    Ok(())
}

#[tokio::test]
async fn test_book_detail_for_unknown_title_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;

    let unknown = app
        .client
        .get(app.url("/book_detail/Nonexistent%20Book"))
        .send()
        .await?;
    // A pivot title with no book row has no ISBN either.
    let without_metadata = app
        .client
        .get(app.url("/book_detail/Lost%20Manuscript"))
        .send()
        .await?;

    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let body: Value = unknown.json().await?;
    assert!(body["error"].as_str().unwrap().contains("Nonexistent Book"));
    assert_eq!(without_metadata.status(), StatusCode::NOT_FOUND);
    Ok(())
}
