//! Book and review endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, CreateReview, EntityId, NewBook, Review},
    services::{
        catalog::{BookDetail, BooksListing},
        reviews::StoredReview,
    },
    AppState,
};

/// List books from the remote catalog, or from the authors' books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = BooksListing)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> Json<BooksListing> {
    Json(state.services.catalog.list_books().await)
}

/// Get a book with its reviews
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details and reviews", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<BookDetail>> {
    let detail = state.services.catalog.get_book(EntityId::from(id)).await?;
    Ok(Json(detail))
}

/// Update a remote book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = NewBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book only exists locally"),
        (status = 502, description = "Remote catalog error")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(book): Json<NewBook>,
) -> AppResult<Json<Book>> {
    let updated = state.services.catalog.update_book(EntityId::from(id), book).await?;
    Ok(Json(updated))
}

/// List the reviews of a book
#[utoipa::path(
    get,
    path = "/books/{id}/reviews",
    tag = "reviews",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Local and remote reviews", body = Vec<Review>)
    )
)]
pub async fn list_reviews(State(state): State<AppState>, Path(id): Path<i64>) -> Json<Vec<Review>> {
    Json(state.services.reviews.list_for_book(EntityId::from(id), None).await)
}

/// Add a review to a book
#[utoipa::path(
    post,
    path = "/books/{id}/reviews",
    tag = "reviews",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review stored", body = StoredReview),
        (status = 400, description = "Description missing")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<StoredReview>)> {
    let stored = state.services.reviews.create(EntityId::from(id), form).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
