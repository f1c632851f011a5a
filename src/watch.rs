//! Live collection for rebuild-on-change tools
//!
//! Readers take an `Arc` snapshot; a rebuild loads a complete new collection
//! and swaps it in only when the load succeeds, so a render pass never sees a
//! half-built or mutated collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::content::Collection;
use crate::error::LoadErrors;

/// The current collection, replaced wholesale on each successful rebuild
#[derive(Debug)]
pub struct LiveCollection {
    current: RwLock<Arc<Collection>>,
    generation: AtomicU64,
}

impl LiveCollection {
    pub fn new(initial: Collection) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            generation: AtomicU64::new(0),
        }
    }

    /// The collection as of now; unaffected by later rebuilds
    pub fn snapshot(&self) -> Arc<Collection> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Number of successful swaps since creation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Swap in `next`, returning the collection it replaced
    pub fn replace(&self, next: Collection) -> Arc<Collection> {
        let next = Arc::new(next);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, next);
        self.generation.fetch_add(1, Ordering::AcqRel);
        previous
    }

    /// Run `load` and swap in its result. On failure the current collection
    /// stays in place and the errors are returned.
    pub fn rebuild<F>(&self, load: F) -> Result<Arc<Collection>, LoadErrors>
    where
        F: FnOnce() -> Result<Collection, LoadErrors>,
    {
        match load() {
            Ok(collection) => {
                self.replace(collection);
                Ok(self.snapshot())
            }
            Err(errors) => {
                tracing::warn!(
                    "Rebuild failed with {} errors, keeping previous content",
                    errors.len()
                );
                Err(errors)
            }
        }
    }
}
