//! Local storage layer: the fallback for every write the remote catalog
//! could not take

pub mod authors;
pub mod kv;
pub mod reviews;

use std::sync::{Arc, Mutex};

use crate::ids::IdGenerator;

pub use authors::LocalAuthorsStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use reviews::LocalReviewsStore;

/// Main repository struct holding both local stores
#[derive(Clone)]
pub struct Repository {
    pub authors: LocalAuthorsStore,
    pub reviews: LocalReviewsStore,
}

impl Repository {
    /// Create the stores over a shared backend and id generator.
    ///
    /// Both stores serialize their read-modify-write cycles on one lock.
    pub fn new(kv: Arc<dyn KeyValueStore>, ids: Arc<IdGenerator>) -> Self {
        let writes = Arc::new(Mutex::new(()));
        Self {
            authors: LocalAuthorsStore::new(kv.clone(), ids.clone(), writes.clone()),
            reviews: LocalReviewsStore::new(kv, ids, writes),
        }
    }
}
