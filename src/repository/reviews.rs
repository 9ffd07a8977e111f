//! Local reviews store, partitioned by parent book id

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    ids::IdGenerator,
    models::{EntityId, NewReview, Review},
};

use super::kv::{KeyValueStore, StorageError};

const STORAGE_KEY: &str = "localBookReviews";

type AllReviews = IndexMap<String, Vec<Review>>;

#[derive(Clone)]
pub struct LocalReviewsStore {
    kv: Arc<dyn KeyValueStore>,
    ids: Arc<IdGenerator>,
    /// Held across load, modify and save
    writes: Arc<Mutex<()>>,
}

impl LocalReviewsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, ids: Arc<IdGenerator>, writes: Arc<Mutex<()>>) -> Self {
        Self { kv, ids, writes }
    }

    fn load_all(&self) -> AllReviews {
        let raw = match self.kv.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AllReviews::new(),
            Err(e) => {
                tracing::warn!("Local reviews unreadable, using empty set: {}", e);
                return AllReviews::new();
            }
        };

        decode(&raw).unwrap_or_else(|e| {
            tracing::warn!("{}; using empty set", e);
            AllReviews::new()
        })
    }

    fn save_all(&self, all: &AllReviews) {
        let raw = match serde_json::to_string(all) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to encode local reviews: {}", e);
                return;
            }
        };
        if let Err(e) = self.kv.set(STORAGE_KEY, &raw) {
            tracing::warn!("Local reviews not saved: {}", e);
        }
    }

    /// Reviews stored locally for a book, most recent first
    pub fn get(&self, book_id: EntityId) -> Vec<Review> {
        self.load_all()
            .swap_remove(&book_id.raw().to_string())
            .unwrap_or_default()
    }

    pub fn add(&self, book_id: EntityId, data: NewReview) -> Review {
        let review = Review {
            id: EntityId::from(self.ids.next(0)),
            name: data.name,
            source: data.source,
            description: data.description,
            created_at: Some(Utc::now()),
            local: true,
        };

        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let mut all = self.load_all();
        all.entry(book_id.raw().to_string())
            .or_default()
            .insert(0, review.clone());
        self.save_all(&all);
        tracing::debug!("Stored local review {} for book {}", review.id, book_id);
        review
    }
}

fn decode(raw: &str) -> Result<AllReviews, StorageError> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| StorageError::Corrupt(format!("{}: {}", STORAGE_KEY, e)))?;
    let Value::Object(books) = parsed else {
        return Err(StorageError::Corrupt(format!("{}: expected an object", STORAGE_KEY)));
    };

    let mut all = AllReviews::new();
    for (book_id, entries) in books {
        let Value::Array(entries) = entries else {
            tracing::warn!("Skipping malformed local reviews for book {}", book_id);
            continue;
        };
        let reviews = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Review>(entry) {
                Ok(review) => Some(review),
                Err(e) => {
                    tracing::warn!("Skipping malformed local review for book {}: {}", book_id, e);
                    None
                }
            })
            .collect();
        all.insert(book_id, reviews);
    }
    Ok(all)
}
