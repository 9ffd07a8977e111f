//! Authors and books: remote catalog merged with local records

use std::{collections::HashSet, sync::Arc};

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDraft, Book, EntityId, NewAuthor, NewBook, Review},
    remote::{RemoteError, RemoteGateway},
    repository::Repository,
};

use super::{
    notifier::{ChangeAction, ChangeEvent, ChangeNotifier, Collection, Origin},
    reconcile,
    reviews::ReviewsService,
};

/// Authors list; `remote_available` is false when only local data could be shown
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorsListing {
    pub authors: Vec<Author>,
    pub remote_available: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BooksListing {
    pub books: Vec<Book>,
    pub remote_available: bool,
}

/// Book with its merged reviews
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredAuthor {
    pub origin: Origin,
    pub author: Author,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    remote: Arc<dyn RemoteGateway>,
    notifier: ChangeNotifier,
    reviews: ReviewsService,
}

/// Map a failed remote read: a 404 is a missing entity, anything else means
/// the remote is unavailable.
fn read_error(e: RemoteError, what: String) -> AppError {
    match e {
        RemoteError::Status { status: 404, .. } => AppError::NotFound(what),
        e => AppError::RemoteUnavailable(e),
    }
}

/// Same as [`read_error`] for writes the caller must hear about
fn write_error(e: RemoteError, what: String) -> AppError {
    match e {
        RemoteError::Status { status: 404, .. } => AppError::NotFound(what),
        e => AppError::Remote(e),
    }
}

/// Books embedded in the given authors, first occurrence of each id wins
fn embedded_books(authors: Vec<Author>) -> Vec<Book> {
    let mut seen = HashSet::new();
    authors
        .into_iter()
        .flat_map(|a| a.books)
        .filter(|b| seen.insert(b.id.raw()))
        .collect()
}

impl CatalogService {
    pub fn new(
        repository: Repository,
        remote: Arc<dyn RemoteGateway>,
        notifier: ChangeNotifier,
        reviews: ReviewsService,
    ) -> Self {
        Self {
            repository,
            remote,
            notifier,
            reviews,
        }
    }

    fn notify(&self, collection: Collection, action: ChangeAction, id: EntityId, origin: Origin) {
        self.notifier
            .publish(ChangeEvent::new(collection, action, Some(id), origin));
    }

    /// Local authors followed by the remote ones not already shown
    pub async fn list_authors(&self) -> AuthorsListing {
        let local = self.repository.authors.load();

        let (remote, remote_available) = if self.remote.is_configured() {
            match self.remote.list_authors().await {
                Ok(authors) => (authors, true),
                Err(e) => {
                    tracing::warn!("Remote authors unavailable, showing local only: {}", e);
                    (Vec::new(), false)
                }
            }
        } else {
            (Vec::new(), false)
        };

        AuthorsListing {
            authors: reconcile::merge(local, remote),
            remote_available,
        }
    }

    pub async fn get_author(&self, id: EntityId) -> AppResult<Author> {
        match id {
            EntityId::Local(_) => self
                .repository
                .authors
                .get(id)
                .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id))),
            EntityId::Remote(_) => self
                .remote
                .get_author(id)
                .await
                .map_err(|e| read_error(e, format!("Author {} not found", id))),
        }
    }

    /// Create a standalone author, locally when the remote cannot take it
    pub async fn create_author(&self, author: NewAuthor) -> AppResult<StoredAuthor> {
        let author = author.trimmed();
        author.validate()?;

        if self.remote.is_configured() {
            match self.remote.create_author(&author).await {
                Ok(created) => {
                    self.notify(Collection::Authors, ChangeAction::Created, created.id, Origin::Remote);
                    return Ok(StoredAuthor {
                        origin: Origin::Remote,
                        author: created,
                    });
                }
                Err(e) => tracing::warn!("Author '{}' kept locally: {}", author.name, e),
            }
        }

        let stored = self.repository.authors.add(AuthorDraft::from(author));
        self.notify(Collection::Authors, ChangeAction::Created, stored.id, Origin::Local);
        Ok(StoredAuthor {
            origin: Origin::Local,
            author: stored,
        })
    }

    /// Update a remote author. Local authors have no update path.
    pub async fn update_author(&self, id: EntityId, author: NewAuthor) -> AppResult<Author> {
        let author = author.trimmed();
        author.validate()?;

        if id.is_local() {
            return Err(AppError::LocalOnly(format!("Author {} only exists locally", id)));
        }

        let updated = self
            .remote
            .update_author(id, &author)
            .await
            .map_err(|e| write_error(e, format!("Author {} not found", id)))?;
        self.notify(Collection::Authors, ChangeAction::Updated, id, Origin::Remote);
        Ok(updated)
    }

    /// Delete an author: from local storage for local ids, remotely otherwise
    pub async fn delete_author(&self, id: EntityId) -> AppResult<Origin> {
        let origin = match id {
            EntityId::Local(_) => {
                if !self.repository.authors.delete(id) {
                    return Err(AppError::NotFound(format!("Author {} not found", id)));
                }
                Origin::Local
            }
            EntityId::Remote(_) => {
                self.remote
                    .delete_author(id)
                    .await
                    .map_err(|e| write_error(e, format!("Author {} not found", id)))?;
                Origin::Remote
            }
        };

        tracing::info!("Deleted author {} ({:?})", id, origin);
        self.notify(Collection::Authors, ChangeAction::Deleted, id, origin);
        Ok(origin)
    }

    /// Remote books list, or the books embedded in the authors when the
    /// remote list is unavailable. Local books always come first.
    pub async fn list_books(&self) -> BooksListing {
        let local = embedded_books(self.repository.authors.load());

        if self.remote.is_configured() {
            match self.remote.list_books().await {
                Ok(remote) => {
                    return BooksListing {
                        books: reconcile::merge(local, remote),
                        remote_available: true,
                    }
                }
                Err(e) => tracing::warn!("Remote books unavailable, deriving from authors: {}", e),
            }
        }

        let listing = self.list_authors().await;
        BooksListing {
            books: embedded_books(listing.authors),
            remote_available: listing.remote_available,
        }
    }

    /// Book details with local and server reviews merged
    pub async fn get_book(&self, id: EntityId) -> AppResult<BookDetail> {
        let (book, nested) = match id {
            EntityId::Local(_) => {
                let book = self
                    .repository
                    .authors
                    .find_book(id)
                    .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
                (book, None)
            }
            EntityId::Remote(_) => self.fetch_remote_book(id).await?,
        };

        let reviews = self.reviews.list_for_book(id, nested).await;
        Ok(BookDetail { book, reviews })
    }

    async fn fetch_remote_book(&self, id: EntityId) -> AppResult<(Book, Option<Vec<Review>>)> {
        if self.remote.is_configured() {
            match self.remote.get_book(id).await {
                Ok(payload) => {
                    let nested = payload
                        .get("reviews")
                        .and_then(Value::as_array)
                        .map(|reviews| reviews.iter().map(Review::from_value).collect());
                    return Ok((Book::from_value(&payload), nested));
                }
                Err(e) => tracing::warn!("Book {} not served remotely, searching authors: {}", id, e),
            }
        }

        self.list_authors()
            .await
            .authors
            .into_iter()
            .flat_map(|a| a.books)
            .find(|b| b.id == id)
            .map(|book| (book, None))
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found remotely or in authors", id)))
    }

    /// Update a remote book. Books embedded in local authors cannot be updated.
    pub async fn update_book(&self, id: EntityId, book: NewBook) -> AppResult<Book> {
        let book = book.trimmed();
        book.validate()?;

        if id.is_local() {
            return Err(AppError::LocalOnly(format!("Book {} only exists locally", id)));
        }

        let updated = self
            .remote
            .update_book(id, &book)
            .await
            .map_err(|e| write_error(e, format!("Book {} not found", id)))?;
        self.notify(Collection::Books, ChangeAction::Updated, id, Origin::Remote);
        Ok(updated)
    }
}
