//! Like aggregation over every page of a tag search.

use tracing::{debug, info};

use crate::app::{FeedhookError, Result};
use crate::domain::{Article, LikeSummary};
use crate::fetcher::ArticleSource;

/// Largest page the tag search API serves.
pub const PAGE_SIZE: usize = 100;

/// Fetch up to `max_pages` pages of `tag` and summarize their likes.
///
/// Pagination ends early on an empty page, or after a page shorter than
/// `page_size`, which the API only returns as its last page. Any fetch error
/// aborts the whole run.
pub async fn aggregate<S>(
    source: &S,
    tag: &str,
    max_pages: u32,
    page_size: usize,
) -> Result<LikeSummary>
where
    S: ArticleSource + ?Sized,
{
    if max_pages < 1 {
        return Err(FeedhookError::Config(
            "max_pages must be at least 1".to_string(),
        ));
    }

    let mut articles: Vec<Article> = Vec::new();

    for page in 1..=max_pages {
        let items = source.fetch_page(tag, page_size, page).await?;
        debug!("Fetched page {} of tag {}: {} items", page, tag, items.len());

        if items.is_empty() {
            debug!("Page {} is empty, stopping", page);
            break;
        }

        let last_page = items.len() < page_size;
        articles.extend(items);

        if last_page {
            debug!("Page {} is short, stopping", page);
            break;
        }
    }

    let summary = LikeSummary::from_articles(tag, articles);
    info!(
        "Tag {}: {} likes across {} articles",
        summary.tag, summary.total_likes, summary.total_items
    );

    Ok(summary)
}
