//! Data models for the bookshelf catalog

pub mod author;
pub mod book;
pub mod catalog_entry;
pub mod id;
pub mod prize;
pub mod review;

use serde_json::{Map, Value};

// Re-export commonly used types
pub use author::{Author, AuthorDraft, NewAuthor};
pub use book::{Book, NewBook};
pub use catalog_entry::NewCatalogEntry;
pub use id::{EntityId, Identified};
pub use prize::{NewPrize, Prize};
pub use review::{CreateReview, NewReview, Review};

/// String field of a loosely typed payload; anything else reads as empty
pub(crate) fn pick_string(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}
