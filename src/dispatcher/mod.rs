//! Runs one producer, then delivers its payload with bounded retry.
//!
//! ```text
//! Idle → Producing → Notifying → Done
//!            ↓           ↓
//!          Failed      Failed
//! ```
//!
//! Producer errors are fatal. Only [`FeedhookError::DeliveryStatus`] earns
//! another delivery attempt; every other notifier error stops the run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::aggregator::{self, PAGE_SIZE};
use crate::app::{FeedhookError, Result};
use crate::config::{Mode, RetrySettings, RunConfig};
use crate::domain::Payload;
use crate::fetcher::{ArticleSource, FeedSource};
use crate::notifier::Notifier;
use crate::render;
use crate::selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Producing,
    Notifying,
    Done,
    Failed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchState::Idle => "idle",
            DispatchState::Producing => "producing",
            DispatchState::Notifying => "notifying",
            DispatchState::Done => "done",
            DispatchState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause between attempts. Zero retries immediately.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::ZERO,
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            delay: Duration::from_millis(settings.delay_ms),
        }
    }
}

/// A successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub payload: Payload,
    /// Delivery attempts made, including the successful one.
    pub attempts: u32,
}

/// How a run ended. `state` is always `Done` or `Failed`.
#[derive(Debug)]
pub struct Outcome {
    pub state: DispatchState,
    /// Delivery attempts made; zero when the producer failed.
    pub attempts: u32,
    pub result: Result<Payload>,
}

impl Outcome {
    pub fn into_result(self) -> Result<Delivery> {
        self.result.map(|payload| Delivery {
            payload,
            attempts: self.attempts,
        })
    }
}

pub struct Dispatcher {
    articles: Arc<dyn ArticleSource + Send + Sync>,
    feeds: Arc<dyn FeedSource + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    retry: RetryPolicy,
    feed_heading: Option<String>,
}

impl Dispatcher {
    pub fn new(
        articles: Arc<dyn ArticleSource + Send + Sync>,
        feeds: Arc<dyn FeedSource + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        Self {
            articles,
            feeds,
            notifier,
            retry: RetryPolicy::default(),
            feed_heading: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_feed_heading(mut self, heading: Option<String>) -> Self {
        self.feed_heading = heading;
        self
    }

    pub async fn run(&self, config: &RunConfig) -> Result<Delivery> {
        self.execute(config).await.into_result()
    }

    /// Drive one run to `Done` or `Failed`.
    pub async fn execute(&self, config: &RunConfig) -> Outcome {
        let mut state = DispatchState::Idle;

        transition(&mut state, DispatchState::Producing);
        let payload = match self.produce(config).await {
            Ok(payload) => payload,
            Err(e) => {
                transition(&mut state, DispatchState::Failed);
                return Outcome {
                    state,
                    attempts: 0,
                    result: Err(e),
                };
            }
        };

        transition(&mut state, DispatchState::Notifying);
        let (attempts, delivered) = self.deliver(&payload).await;
        let result = match delivered {
            Ok(()) => {
                transition(&mut state, DispatchState::Done);
                Ok(payload)
            }
            Err(e) => {
                transition(&mut state, DispatchState::Failed);
                Err(e)
            }
        };

        Outcome {
            state,
            attempts,
            result,
        }
    }

    /// Build the payload for the configured mode.
    pub async fn produce(&self, config: &RunConfig) -> Result<Payload> {
        match config.mode {
            Mode::Message => Ok(Payload::new(config.message.clone())),
            Mode::Aggregate => {
                let summary = aggregator::aggregate(
                    self.articles.as_ref(),
                    &config.tag,
                    config.max_pages,
                    PAGE_SIZE,
                )
                .await?;
                Ok(render::summary(&summary, Local::now().date_naive()))
            }
            Mode::Feed => {
                let selected = selector::latest_from_feed(
                    self.feeds.as_ref(),
                    &config.feed_url,
                    config.feed_limit,
                )
                .await?;
                // Only the newest entry is rendered; the rest of the selection is logged.
                for entry in selected.iter().skip(1) {
                    debug!("Also recent: {}", entry.display_title());
                }
                let newest = selected
                    .first()
                    .ok_or_else(|| FeedhookError::EmptyFeed(config.feed_url.clone()))?;
                Ok(render::entry(newest, self.feed_heading.as_deref()))
            }
        }
    }

    /// Returns the number of attempts made along with the final result.
    async fn deliver(&self, payload: &Payload) -> (u32, Result<()>) {
        let mut attempt = 1;
        loop {
            match self.notifier.notify(payload).await {
                Ok(()) => {
                    info!("Notification sent successfully!");
                    return (attempt, Ok(()));
                }
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    warn!(
                        "Delivery attempt {}/{} failed: {}",
                        attempt, self.retry.max_attempts, e
                    );
                    if !self.retry.delay.is_zero() {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => {
                    warn!("Delivery attempt {} failed: {}", attempt, e);
                    return (attempt, Err(e));
                }
            }
        }
    }
}

fn transition(state: &mut DispatchState, next: DispatchState) {
    debug!("Dispatch {} -> {}", state, next);
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Article, FeedEntry};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubArticles {
        articles: Vec<Article>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ArticleSource for StubArticles {
        async fn fetch_page(&self, _tag: &str, _per_page: usize, page: u32) -> Result<Vec<Article>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if page == 1 { self.articles.clone() } else { Vec::new() })
        }
    }

    #[derive(Default)]
    struct StubFeed {
        entries: Vec<FeedEntry>,
    }

    #[async_trait]
    impl FeedSource for StubFeed {
        async fn fetch_feed(&self, _url: &str) -> Result<Vec<FeedEntry>> {
            Ok(self.entries.clone())
        }
    }

    /// Replays scripted results; succeeds once the script runs out.
    #[derive(Default)]
    struct ScriptedNotifier {
        script: Mutex<VecDeque<Result<()>>>,
        sent: Mutex<Vec<Payload>>,
        calls: AtomicUsize,
    }

    impl ScriptedNotifier {
        fn with(script: Vec<Result<()>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                ..Default::default()
            }
        }

        fn always(make: fn() -> FeedhookError) -> Self {
            Self::with((0..10).map(|_| Err(make())).collect())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Notifier for ScriptedNotifier {
        async fn notify(&self, payload: &Payload) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(payload.clone());
            self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    fn dispatcher(
        articles: StubArticles,
        feed: StubFeed,
        notifier: Arc<ScriptedNotifier>,
    ) -> Dispatcher {
        Dispatcher::new(Arc::new(articles), Arc::new(feed), notifier)
    }

    fn config(mode: Mode) -> RunConfig {
        RunConfig {
            mode,
            tag: "Go".into(),
            max_pages: 5,
            feed_url: "https://qiita.com/tags/Go/feed".into(),
            feed_limit: 10,
            message: "Hello, Slack!".into(),
        }
    }

    #[tokio::test]
    async fn test_message_mode_delivers_static_text() {
        let notifier = Arc::new(ScriptedNotifier::default());
        let d = dispatcher(StubArticles::default(), StubFeed::default(), notifier.clone());

        let delivery = d.run(&config(Mode::Message)).await.unwrap();
        assert_eq!(delivery.attempts, 1);
        assert_eq!(delivery.payload, Payload::new("Hello, Slack!"));
        assert_eq!(notifier.sent.lock().unwrap()[0].text, "Hello, Slack!");
    }

    #[tokio::test]
    async fn test_retries_bad_status_then_succeeds() {
        let notifier = Arc::new(ScriptedNotifier::with(vec![
            Err(FeedhookError::DeliveryStatus(500)),
            Err(FeedhookError::DeliveryStatus(502)),
            Ok(()),
        ]));
        let d = dispatcher(StubArticles::default(), StubFeed::default(), notifier.clone());

        let outcome = d.execute(&config(Mode::Message)).await;
        assert_eq!(outcome.state, DispatchState::Done);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(notifier.calls(), 3);
        assert_eq!(outcome.into_result().unwrap().attempts, 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let notifier = Arc::new(ScriptedNotifier::always(|| FeedhookError::DeliveryStatus(500)));
        let d = dispatcher(StubArticles::default(), StubFeed::default(), notifier.clone());

        let outcome = d.execute(&config(Mode::Message)).await;
        assert_eq!(outcome.state, DispatchState::Failed);
        assert_eq!(outcome.attempts, 3);
        assert!(matches!(outcome.result, Err(FeedhookError::DeliveryStatus(500))));
        assert_eq!(notifier.calls(), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let notifier = Arc::new(ScriptedNotifier::always(|| {
            FeedhookError::Config("SLACK_WEBHOOK_URL is not set".into())
        }));
        let d = dispatcher(StubArticles::default(), StubFeed::default(), notifier.clone());

        let outcome = d.execute(&config(Mode::Message)).await;
        assert_eq!(outcome.state, DispatchState::Failed);
        assert_eq!(outcome.attempts, 1);
        assert!(matches!(outcome.result, Err(FeedhookError::Config(_))));
        assert_eq!(notifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_custom_attempt_budget_and_delay() {
        let notifier = Arc::new(ScriptedNotifier::always(|| FeedhookError::DeliveryStatus(429)));
        let d = dispatcher(StubArticles::default(), StubFeed::default(), notifier.clone())
            .with_retry(RetryPolicy {
                max_attempts: 5,
                delay: Duration::from_millis(1),
            });

        assert!(d.run(&config(Mode::Message)).await.is_err());
        assert_eq!(notifier.calls(), 5);
    }

    #[tokio::test]
    async fn test_aggregate_mode_renders_summary() {
        let articles = StubArticles {
            articles: vec![
                Article::new("Low", "https://qiita.com/low", 1),
                Article::new("High", "https://qiita.com/high", 8),
            ],
            ..Default::default()
        };
        let notifier = Arc::new(ScriptedNotifier::default());
        let d = dispatcher(articles, StubFeed::default(), notifier.clone());

        let delivery = d.run(&config(Mode::Aggregate)).await.unwrap();
        assert!(delivery.payload.text.contains("Total likes: 9"));
        assert!(delivery.payload.text.contains("Total articles: 2"));
        assert!(delivery.payload.text.contains("1. High"));
    }

    #[tokio::test]
    async fn test_feed_mode_renders_newest_entry() {
        let feed = StubFeed {
            entries: vec![
                FeedEntry {
                    title: "Older".into(),
                    published_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single(),
                    ..Default::default()
                },
                FeedEntry {
                    title: "Newest".into(),
                    published_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single(),
                    ..Default::default()
                },
            ],
        };
        let notifier = Arc::new(ScriptedNotifier::default());
        let d = dispatcher(StubArticles::default(), feed, notifier.clone())
            .with_feed_heading(Some("Advent Calendar".into()));

        let delivery = d.run(&config(Mode::Feed)).await.unwrap();
        assert!(delivery.payload.text.starts_with("## Advent Calendar"));
        assert!(delivery.payload.text.contains("Newest"));
        assert!(!delivery.payload.text.contains("Older"));
    }

    #[tokio::test]
    async fn test_producer_error_skips_notification() {
        let notifier = Arc::new(ScriptedNotifier::default());
        let d = dispatcher(StubArticles::default(), StubFeed::default(), notifier.clone());

        let outcome = d.execute(&config(Mode::Feed)).await;
        assert_eq!(outcome.state, DispatchState::Failed);
        assert_eq!(outcome.attempts, 0);
        assert!(matches!(outcome.result, Err(FeedhookError::EmptyFeed(_))));
        assert_eq!(notifier.calls(), 0);
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let policy = RetryPolicy::from(&RetrySettings {
            max_attempts: 0,
            delay_ms: 250,
        });
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }
}
