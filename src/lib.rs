//! # Feedhook
//!
//! Pulls data from a tag search API or an RSS/Atom feed, turns it into a
//! single text message and posts it to a chat webhook.
//!
//! ## Architecture
//!
//! ```text
//! Config → Producer (message | aggregate | rss) → Payload → Notifier → webhook
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export SLACK_WEBHOOK_URL=https://hooks.slack.com/services/...
//!
//! # Tally likes for a tag
//! feedhook --mode aggregate --tag Rust --pages 3
//!
//! # Announce the newest entry of a feed
//! feedhook --mode rss --rss https://qiita.com/tags/Go/feed
//! ```

/// Application context and error types.
///
/// [`AppContext`](app::AppContext) wires the HTTP sources, the notifier and
/// the dispatcher from [`Settings`](config::Settings).
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Settings file, environment overrides and the per-run [`RunConfig`](config::RunConfig).
pub mod config;

/// Core domain models: articles, like summaries, feed entries and payloads.
pub mod domain;

/// HTTP fetching for the tag search API and feeds.
///
/// - [`Fetcher`](fetcher::Fetcher): raw GET
/// - [`ArticleSource`](fetcher::ArticleSource) / [`TagSearchClient`](fetcher::TagSearchClient)
/// - [`FeedSource`](fetcher::FeedSource) / [`FeedClient`](fetcher::FeedClient)
pub mod fetcher;

/// Feed parsing. RSS 0.9x/1.0/2.0 and Atom are both accepted.
pub mod normalizer;

/// Paginated like aggregation.
pub mod aggregator;

/// Most-recent entry selection.
pub mod selector;

/// Message rendering.
pub mod render;

/// Webhook delivery.
pub mod notifier;

/// Producer selection and delivery retry.
pub mod dispatcher;

#[cfg(test)]
mod test_support;
