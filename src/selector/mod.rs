//! Picks the most recent entries of a feed.

use crate::app::{FeedhookError, Result};
use crate::domain::entry::sort_newest_first;
use crate::domain::FeedEntry;
use crate::fetcher::FeedSource;

/// Fetch `url` once and return its `limit` most recent entries, newest first.
///
/// An empty feed is an error: there is nothing to announce.
pub async fn latest_from_feed<S>(source: &S, url: &str, limit: usize) -> Result<Vec<FeedEntry>>
where
    S: FeedSource + ?Sized,
{
    if limit < 1 {
        return Err(FeedhookError::Config("limit must be at least 1".to_string()));
    }

    let entries = source.fetch_feed(url).await?;
    select_latest(entries, limit).ok_or_else(|| FeedhookError::EmptyFeed(url.to_string()))
}

/// `None` when there are no entries.
pub fn select_latest(mut entries: Vec<FeedEntry>, limit: usize) -> Option<Vec<FeedEntry>> {
    if entries.is_empty() {
        return None;
    }

    sort_newest_first(&mut entries);
    entries.truncate(limit);
    Some(entries)
}
