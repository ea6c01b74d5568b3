pub mod models;

use std::sync::{Arc, PoisonError, RwLock};

use crate::core::incident::IncidentSnapshot;
use models::StatusView;

/// Process-wide holder of the latest incident. Clones share the same state.
///
/// The poller is the only writer. Locks are held for a pointer swap or an
/// `Arc` clone and never across an await point.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    state: Arc<RwLock<StatusView>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current incident and the check time together.
    pub fn publish(&self, snapshot: IncidentSnapshot, checked_at: String) -> Arc<IncidentSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.current = Some(snapshot.clone());
        state.last_checked_at = Some(checked_at);
        snapshot
    }

    /// Records an attempt that produced no new incident; `current` is kept.
    pub fn mark_checked(&self, checked_at: String) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.last_checked_at = Some(checked_at);
    }

    pub fn read(&self) -> StatusView {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
