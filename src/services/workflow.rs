//! Chained catalog entry creation
//!
//! Creates an author, a book and a prize on the remote catalog and links
//! them together. Any failure abandons the remote path and stores the whole
//! entry as one local author instead.

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{Author, AuthorDraft, EntityId, NewAuthor, NewBook, NewCatalogEntry, NewPrize},
    remote::{RemoteError, RemoteGateway},
    repository::Repository,
};

use super::notifier::{ChangeAction, ChangeEvent, ChangeNotifier, Collection, Origin};

/// Terminal state of a catalog entry submission
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// All five remote steps committed
    RemoteSucceeded {
        author_id: EntityId,
        book_id: EntityId,
        prize_id: EntityId,
    },
    /// The remote path was abandoned and one local author was stored
    LocalFallbackCommitted { author: Author },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    CreateAuthor,
    CreateBook,
    AssociateBook,
    CreatePrize,
    AssociatePrize,
}

/// Remote records created before the failing step
#[derive(Debug, Clone, Copy, Default)]
struct Committed {
    author: Option<EntityId>,
    book: Option<EntityId>,
    prize: Option<EntityId>,
}

#[derive(Debug)]
struct StepFailure {
    step: Step,
    committed: Committed,
    error: RemoteError,
}

#[derive(Clone)]
pub struct CatalogEntryWorkflow {
    repository: Repository,
    remote: Arc<dyn RemoteGateway>,
    notifier: ChangeNotifier,
}

impl CatalogEntryWorkflow {
    pub fn new(repository: Repository, remote: Arc<dyn RemoteGateway>, notifier: ChangeNotifier) -> Self {
        Self {
            repository,
            remote,
            notifier,
        }
    }

    /// Validate and submit an entry. Validation errors are returned before
    /// any remote call; remote failures are never returned.
    pub async fn run(&self, entry: NewCatalogEntry) -> AppResult<WorkflowOutcome> {
        let entry = entry.trimmed();
        entry.validate()?;
        let (author, book, prize) = entry.into_parts();

        if self.remote.is_configured() {
            match self.run_remote(&author, &book, &prize).await {
                Ok(outcome) => {
                    if let WorkflowOutcome::RemoteSucceeded { author_id, .. } = &outcome {
                        tracing::info!("Catalog entry created remotely as author {}", author_id);
                        self.publish(*author_id, Origin::Remote);
                    }
                    return Ok(outcome);
                }
                Err(failure) => {
                    // Records already created remotely are left in place.
                    tracing::warn!(
                        "Catalog entry step {:?} failed: {}. Storing locally; remote author={:?} book={:?} prize={:?} left behind",
                        failure.step,
                        failure.error,
                        failure.committed.author,
                        failure.committed.book,
                        failure.committed.prize,
                    );
                }
            }
        }

        let stored = self.repository.authors.add(AuthorDraft {
            author,
            books: vec![book],
            prizes: vec![prize],
        });
        tracing::info!("Catalog entry stored locally as author {}", stored.id);
        self.publish(stored.id, Origin::Local);
        Ok(WorkflowOutcome::LocalFallbackCommitted { author: stored })
    }

    async fn run_remote(
        &self,
        author: &NewAuthor,
        book: &NewBook,
        prize: &NewPrize,
    ) -> Result<WorkflowOutcome, StepFailure> {
        let mut committed = Committed::default();
        let fail = |step: Step, committed: Committed| move |error| StepFailure { step, committed, error };

        let author_id = self
            .remote
            .create_author(author)
            .await
            .map_err(fail(Step::CreateAuthor, committed))?
            .id;
        committed.author = Some(author_id);

        let book_id = self
            .remote
            .create_book(book)
            .await
            .map_err(fail(Step::CreateBook, committed))?
            .id;
        committed.book = Some(book_id);

        self.remote
            .associate_book(author_id, book_id)
            .await
            .map_err(fail(Step::AssociateBook, committed))?;

        let prize_id = self
            .remote
            .create_prize(prize)
            .await
            .map_err(fail(Step::CreatePrize, committed))?
            .id;
        committed.prize = Some(prize_id);

        self.remote
            .associate_prize(prize_id, author_id)
            .await
            .map_err(fail(Step::AssociatePrize, committed))?;

        Ok(WorkflowOutcome::RemoteSucceeded {
            author_id,
            book_id,
            prize_id,
        })
    }

    fn publish(&self, author_id: EntityId, origin: Origin) {
        self.notifier.publish(ChangeEvent::new(
            Collection::Authors,
            ChangeAction::Created,
            Some(author_id),
            origin,
        ));
    }
}
