use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::FeedEntry;
use crate::fetcher::{FeedSource, Fetcher};
use crate::normalizer::Normalizer;

pub struct FeedClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
}

impl FeedClient {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            normalizer: Normalizer::new(),
        }
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let body = self.fetcher.fetch(url, None).await?;
        let entries = self.normalizer.normalize(&body)?;
        tracing::info!("Fetched {} entries from {}", entries.len(), url);
        Ok(entries)
    }
}
