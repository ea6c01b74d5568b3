pub mod fetcher;
pub mod parser;
pub mod types;

pub use fetcher::{FeedFetcher, FetchError, FetchStatus, Validators};
pub use parser::{parse_feed_bytes, FeedParseError};
pub use types::{ParsedEntry, ParsedFeed};
