//! "Data changed" notifications
//!
//! Publish/notify only: events sent while nobody is subscribed are dropped,
//! and a lagging subscriber loses the oldest events.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

use crate::models::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Authors,
    Books,
    Reviews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// Where a write ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub collection: Collection,
    pub action: ChangeAction,
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    /// Parent book for review events
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub book_id: Option<EntityId>,
    pub origin: Origin,
}

impl ChangeEvent {
    pub fn new(collection: Collection, action: ChangeAction, id: Option<EntityId>, origin: Origin) -> Self {
        Self {
            collection,
            action,
            id,
            book_id: None,
            origin,
        }
    }

    pub fn for_book(mut self, book_id: EntityId) -> Self {
        self.book_id = Some(book_id);
        self
    }
}

#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Register an observer; it sees every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Broadcast an event, ignoring if nobody is listening
    pub fn publish(&self, event: ChangeEvent) {
        match self.tx.send(event) {
            Ok(count) => tracing::debug!("Change event delivered to {} subscribers", count),
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!("Change event {:?} dropped, no subscribers", event.collection)
            }
        }
    }
}
