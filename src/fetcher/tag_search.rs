use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::app::{FeedhookError, Result};
use crate::domain::Article;
use crate::fetcher::{ArticleSource, Fetcher};

/// Client for `GET {api_base}/tags/{tag}/items`.
pub struct TagSearchClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    api_base: Url,
    access_token: Option<String>,
}

impl TagSearchClient {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        api_base: &str,
        access_token: Option<String>,
    ) -> Result<Self> {
        let api_base = Url::parse(api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(FeedhookError::Config(format!(
                "API base is not a base URL: {}",
                api_base
            )));
        }

        Ok(Self {
            fetcher,
            api_base,
            access_token: access_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn items_url(&self, tag: &str, per_page: usize, page: u32) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["tags", tag, "items"]);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        url
    }
}

#[async_trait]
impl ArticleSource for TagSearchClient {
    async fn fetch_page(&self, tag: &str, per_page: usize, page: u32) -> Result<Vec<Article>> {
        let url = self.items_url(tag, per_page, page);
        let body = self
            .fetcher
            .fetch(url.as_str(), self.access_token.as_deref())
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }
}
