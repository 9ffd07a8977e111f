//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, catalog_entries, events, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Library catalog gateway with local fallback storage"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::update_book,
        // Reviews
        books::list_reviews,
        books::create_review,
        // Catalog entries
        catalog_entries::create_catalog_entry,
        // Events
        events::stream_events,
    ),
    components(
        schemas(
            // Models
            crate::models::Author,
            crate::models::NewAuthor,
            crate::models::Book,
            crate::models::NewBook,
            crate::models::Prize,
            crate::models::NewPrize,
            crate::models::Review,
            crate::models::CreateReview,
            crate::models::NewCatalogEntry,
            // Responses
            crate::services::catalog::AuthorsListing,
            crate::services::catalog::BooksListing,
            crate::services::catalog::BookDetail,
            crate::services::catalog::StoredAuthor,
            crate::services::reviews::StoredReview,
            catalog_entries::CatalogEntryResponse,
            // Events
            crate::services::notifier::ChangeEvent,
            crate::services::notifier::Collection,
            crate::services::notifier::ChangeAction,
            crate::services::notifier::Origin,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Authors, remote and local"),
        (name = "books", description = "Books, remote and local"),
        (name = "reviews", description = "Book reviews"),
        (name = "catalog", description = "Composite author/book/prize creation"),
        (name = "events", description = "Data-changed notifications")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
