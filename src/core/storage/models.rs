use std::sync::Arc;

use crate::core::incident::IncidentSnapshot;

/// Everything a reader sees, taken under one lock so the pair is consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub current: Option<Arc<IncidentSnapshot>>,
    pub last_checked_at: Option<String>,
}

impl StatusView {
    pub const NO_INCIDENTS: &'static str = "No incidents detected yet.";

    pub fn render(&self) -> String {
        let Some(incident) = &self.current else {
            return Self::NO_INCIDENTS.to_string();
        };
        // `publish` sets the check time together with `current`, so the
        // fallback is unreachable through `SnapshotStore`.
        format!(
            "[{}] Product: {}\nStatus: {}\nLast checked: {}",
            incident.time,
            incident.product,
            incident.status,
            self.last_checked_at.as_deref().unwrap_or("never"),
        )
    }
}
