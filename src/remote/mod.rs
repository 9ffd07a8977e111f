//! Remote catalog gateway
//!
//! Thin client over the catalog REST API. An empty base URL means the
//! remote is not configured; callers treat that exactly like a failed call
//! and fall back to local storage.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Author, Book, EntityId, NewAuthor, NewBook, NewPrize, NewReview, Prize, Review};

pub use http::HttpGateway;

/// Any reason the remote catalog could not serve a call
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Remote catalog is not configured")]
    NotConfigured,

    #[error("Remote request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected remote payload: {0}")]
    Decode(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Endpoints of the remote catalog used by the services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Whether a base URL is configured at all
    fn is_configured(&self) -> bool;

    async fn list_authors(&self) -> RemoteResult<Vec<Author>>;
    async fn get_author(&self, id: EntityId) -> RemoteResult<Author>;
    async fn create_author(&self, author: &NewAuthor) -> RemoteResult<Author>;
    async fn update_author(&self, id: EntityId, author: &NewAuthor) -> RemoteResult<Author>;
    async fn delete_author(&self, id: EntityId) -> RemoteResult<()>;

    async fn list_books(&self) -> RemoteResult<Vec<Book>>;
    /// Raw book payload, which may carry a nested `reviews` array
    async fn get_book(&self, id: EntityId) -> RemoteResult<Value>;
    async fn create_book(&self, book: &NewBook) -> RemoteResult<Book>;
    async fn update_book(&self, id: EntityId, book: &NewBook) -> RemoteResult<Book>;
    async fn associate_book(&self, author_id: EntityId, book_id: EntityId) -> RemoteResult<()>;

    async fn list_reviews(&self, book_id: EntityId) -> RemoteResult<Vec<Review>>;
    /// Returns the stored review when the remote echoes it back
    async fn create_review(&self, book_id: EntityId, review: &NewReview) -> RemoteResult<Option<Review>>;

    async fn create_prize(&self, prize: &NewPrize) -> RemoteResult<Prize>;
    async fn associate_prize(&self, prize_id: EntityId, author_id: EntityId) -> RemoteResult<()>;
}
