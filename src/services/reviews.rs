//! Book reviews: remote first, local storage as fallback

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{CreateReview, EntityId, Review},
    remote::RemoteGateway,
    repository::Repository,
};

use super::{
    notifier::{ChangeAction, ChangeEvent, ChangeNotifier, Collection, Origin},
    reconcile,
};

/// Result of a review submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredReview {
    pub origin: Origin,
    /// The stored review; absent when the remote accepted it without echoing it back
    pub review: Option<Review>,
}

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
    remote: Arc<dyn RemoteGateway>,
    notifier: ChangeNotifier,
}

impl ReviewsService {
    pub fn new(repository: Repository, remote: Arc<dyn RemoteGateway>, notifier: ChangeNotifier) -> Self {
        Self {
            repository,
            remote,
            notifier,
        }
    }

    /// Reviews of a book: local ones first, then the server's.
    ///
    /// `nested` are the reviews embedded in the book payload, if any. The
    /// dedicated reviews endpoint is only queried when there are none.
    pub async fn list_for_book(&self, book_id: EntityId, nested: Option<Vec<Review>>) -> Vec<Review> {
        let server = match nested {
            Some(reviews) if !reviews.is_empty() => reviews,
            _ => self.fetch_remote(book_id).await,
        };
        reconcile::merge(self.repository.reviews.get(book_id), server)
    }

    async fn fetch_remote(&self, book_id: EntityId) -> Vec<Review> {
        if book_id.is_local() || !self.remote.is_configured() {
            return Vec::new();
        }
        match self.remote.list_reviews(book_id).await {
            Ok(reviews) => reviews,
            Err(e) => {
                tracing::warn!("Reviews for book {} unavailable remotely: {}", book_id, e);
                Vec::new()
            }
        }
    }

    /// Submit a review. Validation happens before any I/O; a remote failure
    /// stores the review locally instead.
    pub async fn create(&self, book_id: EntityId, form: CreateReview) -> AppResult<StoredReview> {
        let review = form.normalize();
        review.validate()?;

        if !book_id.is_local() && self.remote.is_configured() {
            match self.remote.create_review(book_id, &review).await {
                Ok(stored) => {
                    self.notify(book_id, stored.as_ref().map(|r| r.id), Origin::Remote);
                    return Ok(StoredReview {
                        origin: Origin::Remote,
                        review: stored,
                    });
                }
                Err(e) => {
                    tracing::warn!("Review for book {} kept locally: {}", book_id, e);
                }
            }
        }

        let stored = self.repository.reviews.add(book_id, review);
        self.notify(book_id, Some(stored.id), Origin::Local);
        Ok(StoredReview {
            origin: Origin::Local,
            review: Some(stored),
        })
    }

    fn notify(&self, book_id: EntityId, id: Option<EntityId>, origin: Origin) {
        self.notifier.publish(
            ChangeEvent::new(Collection::Reviews, ChangeAction::Created, id, origin).for_book(book_id),
        );
    }
}
