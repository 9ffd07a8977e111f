//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Author, EntityId, NewAuthor},
    services::catalog::{AuthorsListing, StoredAuthor},
    AppState,
};

/// List authors: local ones first, then the remote catalog's
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Merged list of authors", body = AuthorsListing)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> Json<AuthorsListing> {
    Json(state.services.catalog.list_authors().await)
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID (negative for local authors)")
    ),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found"),
        (status = 503, description = "Remote catalog unavailable")
    )
)]
pub async fn get_author(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Author>> {
    let author = state.services.catalog.get_author(EntityId::from(id)).await?;
    Ok(Json(author))
}

/// Create an author, locally if the remote catalog cannot take it
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = NewAuthor,
    responses(
        (status = 201, description = "Author created", body = StoredAuthor),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(author): Json<NewAuthor>,
) -> AppResult<(StatusCode, Json<StoredAuthor>)> {
    let stored = state.services.catalog.create_author(author).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Update a remote author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    request_body = NewAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author only exists locally"),
        (status = 502, description = "Remote catalog error")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(author): Json<NewAuthor>,
) -> AppResult<Json<Author>> {
    let updated = state
        .services
        .catalog
        .update_author(EntityId::from(id), author)
        .await?;
    Ok(Json(updated))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID (negative for local authors)")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 502, description = "Remote catalog error")
    )
)]
pub async fn delete_author(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.services.catalog.delete_author(EntityId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
