//! Synthetic identifiers for locally stored entities
//!
//! Local records get negative ids derived from the wall clock so they can
//! never be mistaken for server-issued ones (which are non-negative).

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rand::Rng;

/// Upper bound (exclusive) of the random component added to each id.
const RANDOM_SPREAD: i64 = 1000;

/// Generator of negative ids, shared by every local store of a process.
pub struct IdGenerator {
    last: AtomicI64,
    clock: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl IdGenerator {
    /// Generator driven by the system clock (milliseconds since the epoch)
    pub fn new() -> Self {
        Self::with_clock(|| Utc::now().timestamp_millis())
    }

    /// Generator driven by a custom millisecond clock
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        Self {
            last: AtomicI64::new(0),
            clock: Box::new(clock),
        }
    }

    /// Issue a new id: `-now_ms - offset - random`.
    ///
    /// `offset` is the caller's position inside a batch (0 for the first
    /// entity, 1 for the next...). Ids are always strictly below every id this
    /// generator issued before.
    pub fn next(&self, offset: i64) -> i64 {
        let jitter = rand::thread_rng().gen_range(0..RANDOM_SPREAD);
        let candidate = -(self.clock)().abs() - offset.abs() - jitter - 1;

        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let id = if candidate < previous { candidate } else { previous - 1 };
            match self
                .last
                .compare_exchange_weak(previous, id, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return id,
                Err(current) => previous = current,
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
