pub mod feed;
pub mod http_fetcher;
pub mod tag_search;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Article, FeedEntry};

pub use feed::FeedClient;
pub use http_fetcher::HttpFetcher;
pub use tag_search::TagSearchClient;

/// One HTTP GET returning the raw body of a 200 response.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str, bearer: Option<&str>) -> Result<Vec<u8>>;
}

/// One page of the tag search API.
#[async_trait]
pub trait ArticleSource {
    async fn fetch_page(&self, tag: &str, per_page: usize, page: u32) -> Result<Vec<Article>>;
}

/// A whole feed, entries in document order.
#[async_trait]
pub trait FeedSource {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>>;
}
