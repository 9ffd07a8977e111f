//! Composite catalog entry endpoint (author + book + prize)

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Author, NewCatalogEntry},
    services::{notifier::Origin, workflow::WorkflowOutcome},
    AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogEntryResponse {
    /// "remote" when all five remote steps committed, "local" on fallback
    pub origin: Origin,
    pub author_id: i64,
    pub book_id: i64,
    pub prize_id: i64,
    /// The stored composite author, for local entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl From<WorkflowOutcome> for CatalogEntryResponse {
    fn from(outcome: WorkflowOutcome) -> Self {
        match outcome {
            WorkflowOutcome::RemoteSucceeded {
                author_id,
                book_id,
                prize_id,
            } => Self {
                origin: Origin::Remote,
                author_id: author_id.raw(),
                book_id: book_id.raw(),
                prize_id: prize_id.raw(),
                author: None,
            },
            WorkflowOutcome::LocalFallbackCommitted { author } => Self {
                origin: Origin::Local,
                author_id: author.id.raw(),
                book_id: author.books.first().map(|b| b.id.raw()).unwrap_or_default(),
                prize_id: author.prizes.first().map(|p| p.id.raw()).unwrap_or_default(),
                author: Some(author),
            },
        }
    }
}

/// Create an author with one book and one prize
#[utoipa::path(
    post,
    path = "/catalog-entries",
    tag = "catalog",
    request_body = NewCatalogEntry,
    responses(
        (status = 201, description = "Entry stored remotely or locally", body = CatalogEntryResponse),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn create_catalog_entry(
    State(state): State<AppState>,
    Json(entry): Json<NewCatalogEntry>,
) -> AppResult<(StatusCode, Json<CatalogEntryResponse>)> {
    let outcome = state.services.catalog_entries.run(entry).await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}
