//! Latest-request-wins holders for view results.
//!
//! Loads for the same view may overlap (a date changes twice in quick
//! succession, a refresh fires while a load is in flight). Each load takes a
//! ticket when it starts; only the holder of the most recently issued ticket
//! may publish its result. An earlier load that finishes later is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

/// Proof that a load was started, carrying its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A published value with the generation that produced it.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub generation: u64,
    pub value: T,
}

/// Holds the result of the newest load of one view.
pub struct LatestSlot<T> {
    issued: AtomicU64,
    committed: RwLock<Option<Committed<T>>>,
}

impl<T: Clone> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            committed: RwLock::new(None),
        }
    }

    /// Start a load. Supersedes every ticket issued before it.
    pub fn begin(&self) -> LoadTicket {
        LoadTicket {
            generation: self.issued.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Whether no newer load has started since `ticket` was issued.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.generation
    }

    /// Publish `value` if `ticket` is still the newest. Returns whether the
    /// value was stored.
    pub async fn complete(&self, ticket: LoadTicket, value: T) -> bool {
        let mut committed = self.committed.write().await;
        if !self.is_current(ticket) {
            return false;
        }
        *committed = Some(Committed {
            generation: ticket.generation,
            value,
        });
        true
    }

    /// The most recently published value.
    pub async fn latest(&self) -> Option<Committed<T>> {
        self.committed.read().await.clone()
    }
}

impl<T: Clone> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
