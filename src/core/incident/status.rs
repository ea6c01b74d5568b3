use regex::Regex;
use std::sync::LazyLock;

pub const UNKNOWN: &str = "Unknown";

static STATUS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Status:\s*([^\n]+)").expect("status pattern is valid")
});

/// Text after the first `Status:` label (any case) up to the end of the line.
pub fn extract_status(text: &str) -> String {
    STATUS_LABEL
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
