use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl ParsedEntry {
    /// Markup to derive the incident text from: content, then summary, then title.
    pub fn body(&self) -> &str {
        [&self.content, &self.summary, &self.title]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub entries: Vec<ParsedEntry>,
}

impl ParsedFeed {
    /// Feeds list newest entries first, so the latest incident is the first one.
    pub fn latest(&self) -> Option<&ParsedEntry> {
        self.entries.first()
    }
}
