use std::sync::Arc;

use crate::app::Result;
use crate::config::{RunConfig, RunRequest, Settings};
use crate::dispatcher::{Delivery, Dispatcher, RetryPolicy};
use crate::fetcher::{FeedClient, Fetcher, HttpFetcher, TagSearchClient};
use crate::notifier::WebhookNotifier;

pub struct AppContext {
    pub settings: Settings,
    pub dispatcher: Dispatcher,
}

impl AppContext {
    /// Wire the HTTP-backed sources and the webhook notifier from `settings`.
    pub fn new(settings: Settings) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&settings)?);
        let articles = TagSearchClient::new(
            fetcher.clone(),
            &settings.api_base,
            settings.access_token.clone(),
        )?;
        let feeds = FeedClient::new(fetcher);
        let notifier = WebhookNotifier::new(&settings)?;

        let dispatcher = Dispatcher::new(Arc::new(articles), Arc::new(feeds), Arc::new(notifier))
            .with_retry(RetryPolicy::from(&settings.retry))
            .with_feed_heading(settings.feed_heading.clone());

        Ok(Self::with_dispatcher(settings, dispatcher))
    }

    pub fn with_dispatcher(settings: Settings, dispatcher: Dispatcher) -> Self {
        Self {
            settings,
            dispatcher,
        }
    }

    /// Resolve the run configuration, then produce and deliver.
    ///
    /// A configuration error here means nothing was fetched or sent.
    pub async fn run(&self, request: &RunRequest) -> Result<Delivery> {
        let config = RunConfig::resolve(request, &self.settings)?;
        self.settings.require_webhook_url()?;
        tracing::info!("Running in {} mode", config.mode);
        self.dispatcher.run(&config).await
    }
}
