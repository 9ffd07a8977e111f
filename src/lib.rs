//! Bookshelf catalog gateway
//!
//! Serves a library catalog (authors, books, prizes, reviews) to a UI,
//! backed by a remote REST API when one is configured and reachable, and by
//! local storage otherwise. Local records carry negative ids and are merged
//! in front of the remote ones on every read.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod remote;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
