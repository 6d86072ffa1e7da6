//! The shared snapshot slot.
//!
//! [`SnapshotStore`] is the single piece of mutable state in the service.
//! It is injected into both the loader (writer) and the query service
//! (reader) rather than living in a global, so tests can build as many
//! independent stores as they like.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::snapshot::Snapshot;

/// Point-in-time view of the loader's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStatus {
    /// Whether any reload has succeeded yet.
    pub ready: bool,
    /// Completion time of the reload that produced the current snapshot.
    pub loaded_at: Option<DateTime<Utc>>,
    /// Number of records in the current snapshot (0 when not ready).
    pub record_count: usize,
}

/// Holds the most recent successfully loaded [`Snapshot`], if any.
///
/// The write lock is held only for the pointer swap in [`install`]; readers
/// clone the [`Arc`] out and drop the lock straight away, so a reload in
/// flight never blocks a query and a query never sees a half-built
/// snapshot.
///
/// [`install`]: SnapshotStore::install
#[derive(Debug, Default)]
pub struct SnapshotStore {
    slot: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    /// Create an empty store (not ready).
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// The current snapshot, or `None` before the first successful reload.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        // The slot only ever holds a complete value, so a poisoned lock is
        // still safe to read.
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current snapshot wholesale.
    pub fn install(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(next);
    }

    /// Whether a snapshot has been installed.
    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }

    /// Summarise the current state. Never fails.
    pub fn status(&self) -> SnapshotStatus {
        self.current().map_or(
            SnapshotStatus {
                ready: false,
                loaded_at: None,
                record_count: 0,
            },
            |snap| SnapshotStatus {
                ready: true,
                loaded_at: Some(snap.loaded_at),
                record_count: snap.len(),
            },
        )
    }
}
