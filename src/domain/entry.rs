use chrono::{DateTime, Utc};

/// A single entry of an RSS or Atom feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// Entry content, or its summary when the feed carries no content.
    pub body: String,
    /// `None` when the feed date was missing or could not be parsed.
    pub published_at: Option<DateTime<Utc>>,
    pub author: String,
}

impl FeedEntry {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

/// Stable sort, newest first. Entries without a date sort as the oldest.
pub fn sort_newest_first(entries: &mut [FeedEntry]) {
    // Option<DateTime> orders None below every Some.
    entries.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
