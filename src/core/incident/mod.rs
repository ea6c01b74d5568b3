pub mod status;
pub mod text;

use chrono::{DateTime, Utc};

use crate::core::feed::ParsedEntry;

pub use status::{extract_status, UNKNOWN};
pub use text::normalize_text;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The incident derived from one feed entry. Never mutated; a newer poll
/// replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentSnapshot {
    pub product: String,
    pub status: String,
    pub time: String,
    pub link: String,
}

impl IncidentSnapshot {
    /// `polled_at` stands in for the timestamp when the entry carries none.
    pub fn from_entry(entry: &ParsedEntry, polled_at: DateTime<Utc>) -> Self {
        let clean_text = normalize_text(entry.body());
        let product = entry
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();

        Self {
            product,
            status: extract_status(&clean_text),
            time: format_timestamp(entry.published_at.unwrap_or(polled_at)),
            link: entry.link.clone().unwrap_or_default(),
        }
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
