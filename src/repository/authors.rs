//! Local authors store
//!
//! Authors created while the remote catalog is unavailable live here, each
//! embedding its own books and prizes. Most recent first.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::{
    ids::IdGenerator,
    models::{Author, AuthorDraft, Book, EntityId},
};

use super::kv::{KeyValueStore, StorageError};

const STORAGE_KEY: &str = "localAuthorsData";

#[derive(Serialize)]
struct StoreShape<'a> {
    authors: &'a [Author],
}

#[derive(Clone)]
pub struct LocalAuthorsStore {
    kv: Arc<dyn KeyValueStore>,
    ids: Arc<IdGenerator>,
    /// Held across load, modify and save
    writes: Arc<Mutex<()>>,
}

impl LocalAuthorsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, ids: Arc<IdGenerator>, writes: Arc<Mutex<()>>) -> Self {
        Self { kv, ids, writes }
    }

    /// Load every local author. Never fails: missing, unreadable or
    /// malformed data reads as an empty list.
    pub fn load(&self) -> Vec<Author> {
        let raw = match self.kv.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Local authors unreadable, using empty list: {}", e);
                return Vec::new();
            }
        };

        match decode(&raw) {
            Ok(authors) => authors,
            Err(e) => {
                tracing::warn!("{}; using empty list", e);
                Vec::new()
            }
        }
    }

    /// Persist the full list. Storage failures drop the write.
    pub fn save(&self, authors: &[Author]) {
        let raw = match serde_json::to_string(&StoreShape { authors }) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to encode local authors: {}", e);
                return;
            }
        };
        if let Err(e) = self.kv.set(STORAGE_KEY, &raw) {
            tracing::warn!("Local authors not saved: {}", e);
        }
    }

    pub fn get(&self, id: EntityId) -> Option<Author> {
        self.load().into_iter().find(|a| a.id == id)
    }

    /// Find a book embedded in any local author
    pub fn find_book(&self, id: EntityId) -> Option<Book> {
        self.load()
            .into_iter()
            .flat_map(|a| a.books)
            .find(|b| b.id == id)
    }

    /// Store a new author with fresh ids for it and everything it embeds
    pub fn add(&self, draft: AuthorDraft) -> Author {
        let mut offset = 0;
        let mut next_id = || {
            let id = EntityId::from(self.ids.next(offset));
            offset += 1;
            id
        };

        let id = next_id();
        let books = draft.books.into_iter().map(|b| b.with_id(next_id())).collect();
        let prizes = draft.prizes.into_iter().map(|p| p.with_id(next_id())).collect();
        let author = Author {
            id,
            name: draft.author.name,
            birth_date: draft.author.birth_date,
            image: draft.author.image,
            description: draft.author.description,
            books,
            prizes,
        };

        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let mut authors = self.load();
        authors.insert(0, author.clone());
        self.save(&authors);
        tracing::debug!("Stored local author {}", author.id);
        author
    }

    /// Remove the author with this id. Storage is only written when
    /// something was actually removed.
    pub fn delete(&self, id: EntityId) -> bool {
        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let mut authors = self.load();
        let before = authors.len();
        authors.retain(|a| a.id != id);
        if authors.len() == before {
            return false;
        }
        self.save(&authors);
        true
    }
}

fn decode(raw: &str) -> Result<Vec<Author>, StorageError> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| StorageError::Corrupt(format!("{}: {}", STORAGE_KEY, e)))?;

    let entries = parsed
        .get("authors")
        .and_then(Value::as_array)
        .ok_or_else(|| StorageError::Corrupt(format!("{}: missing authors array", STORAGE_KEY)))?;

    Ok(entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Author>(entry.clone()) {
            Ok(author) => Some(author),
            Err(e) => {
                tracing::warn!("Skipping malformed local author: {}", e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{NewAuthor, NewBook, NewPrize},
        repository::kv::MemoryStore,
    };
    use std::collections::HashSet;

    fn store() -> (Arc<MemoryStore>, LocalAuthorsStore) {
        let kv = Arc::new(MemoryStore::new());
        let store = LocalAuthorsStore::new(kv.clone(), Arc::new(IdGenerator::new()), Arc::default());
        (kv, store)
    }

    fn draft(name: &str) -> AuthorDraft {
        AuthorDraft {
            author: NewAuthor {
                name: name.to_string(),
                birth_date: "1899-08-24".to_string(),
                ..Default::default()
            },
            books: vec![NewBook {
                name: "Ficciones".to_string(),
                publishing_date: "1944".to_string(),
                ..Default::default()
            }],
            prizes: vec![NewPrize {
                name: "Cervantes".to_string(),
                premiation_date: "1979".to_string(),
            }],
        }
    }

    #[test]
    fn test_add_assigns_distinct_negative_ids() {
        let (_, store) = store();
        let mut seen = HashSet::new();

        for i in 0..50 {
            let author = store.add(draft(&format!("Author {}", i)));
            for id in [author.id, author.books[0].id, author.prizes[0].id] {
                assert!(id.is_local());
                assert!(id.raw() < 0);
                assert!(seen.insert(id.raw()), "duplicate id {}", id);
            }
        }
        assert_eq!(store.load().len(), 50);
    }

    #[test]
    fn test_add_inserts_most_recent_first() {
        let (_, store) = store();
        store.add(draft("First"));
        store.add(draft("Second"));

        let names: Vec<_> = store.load().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn test_delete_missing_id_does_not_write() {
        let (kv, store) = store();
        let author = store.add(draft("Borges"));
        let writes = kv.write_count();

        assert!(!store.delete(EntityId::Local(-1)));
        assert_eq!(kv.write_count(), writes);

        assert!(store.delete(author.id));
        assert_eq!(kv.write_count(), writes + 1);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let (kv, store) = store();

        kv.set(STORAGE_KEY, "{not json").unwrap();
        assert!(store.load().is_empty());

        kv.set(STORAGE_KEY, r#"{"authors": {"oops": true}}"#).unwrap();
        assert!(store.load().is_empty());

        kv.set(STORAGE_KEY, "[1, 2, 3]").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let (kv, store) = store();
        kv.set(
            STORAGE_KEY,
            r#"{"authors": [{"id": -5, "name": "Kept"}, {"name": "no id"}, 7]}"#,
        )
        .unwrap();

        let authors = store.load();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "Kept");
    }

    #[test]
    fn test_quota_error_drops_write() {
        let kv = Arc::new(MemoryStore::with_quota(16));
        let store = LocalAuthorsStore::new(kv.clone(), Arc::new(IdGenerator::new()), Arc::default());

        let author = store.add(draft("Too big to fit"));
        assert!(author.id.is_local());
        assert!(store.load().is_empty());
        assert_eq!(kv.write_count(), 0);
    }

    #[test]
    fn test_concurrent_adds_are_all_persisted() {
        let (kv, store) = store();

        std::thread::scope(|scope| {
            for t in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for i in 0..50 {
                        store.add(draft(&format!("Author {}-{}", t, i)));
                    }
                });
            }
        });

        let authors = store.load();
        assert_eq!(authors.len(), 400);
        assert_eq!(kv.write_count(), 400);
        let ids: HashSet<_> = authors.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 400);
    }

    #[test]
    fn test_concurrent_deletes_and_adds() {
        let (_, store) = store();
        let doomed: Vec<_> = (0..20).map(|i| store.add(draft(&format!("Old {}", i))).id).collect();

        std::thread::scope(|scope| {
            let deleter = &store;
            let doomed = &doomed;
            scope.spawn(move || {
                for id in doomed {
                    assert!(deleter.delete(*id));
                }
            });
            let adder = &store;
            scope.spawn(move || {
                for i in 0..20 {
                    adder.add(draft(&format!("New {}", i)));
                }
            });
        });

        let names: Vec<_> = store.load().into_iter().map(|a| a.name).collect();
        assert_eq!(names.len(), 20);
        assert!(names.iter().all(|n| n.starts_with("New ")));
    }

    #[test]
    fn test_find_book_searches_embedded_books() {
        let (_, store) = store();
        let author = store.add(draft("Borges"));
        let book_id = author.books[0].id;

        assert_eq!(store.find_book(book_id).map(|b| b.name), Some("Ficciones".to_string()));
        assert!(store.find_book(EntityId::Local(-2)).is_none());
    }
}
