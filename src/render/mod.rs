//! Plain-text rendering of summaries and feed entries.
//!
//! Rendering never fails: empty summaries and blank entry fields still
//! produce a readable message.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::domain::{FeedEntry, LikeSummary, Payload};

const RULE: &str = "===================================";

/// Render a like summary as of `date`.
pub fn summary(summary: &LikeSummary, date: NaiveDate) -> Payload {
    let mut text = String::new();

    let _ = writeln!(text, "{}", RULE);
    let _ = writeln!(text, "*Tag: {}*", summary.tag);
    let _ = writeln!(text, "*Likes as of {}*", date.format("%Y-%m-%d"));
    let _ = writeln!(text, "*👍 Total likes: {}*", summary.total_likes);
    let _ = writeln!(text, "*📝 Total articles: {}*", summary.total_items);
    let _ = writeln!(text, "*🎉 Top {} by likes:*", LikeSummary::TOP_N);
    let _ = writeln!(text, "{}", RULE);

    if summary.top_articles.is_empty() {
        text.push_str("No articles found.\n");
    }

    for (rank, article) in summary.top_articles.iter().enumerate() {
        let _ = write!(
            text,
            "{}. {} (👍 {})",
            rank + 1,
            article.title,
            article.likes_count
        );
        if !article.author_id.is_empty() {
            let _ = write!(text, " by @{}", article.author_id);
        }
        let _ = writeln!(text, "\n   {}", article.url);
    }

    Payload::new(text)
}

/// Render one feed entry as the headline, under an optional heading.
pub fn entry(entry: &FeedEntry, heading: Option<&str>) -> Payload {
    let mut text = String::new();

    if let Some(heading) = heading.filter(|h| !h.is_empty()) {
        let _ = writeln!(text, "## {}\n", heading);
    }

    let _ = writeln!(text, "{}", entry.display_title());
    if !entry.author.is_empty() {
        let _ = writeln!(text, "by {}", entry.author);
    }
    if !entry.body.is_empty() {
        let _ = writeln!(text, "\n{}", entry.body.trim());
    }
    if !entry.link.is_empty() {
        let _ = writeln!(text, "\n{}", entry.link);
    }

    Payload::new(text)
}
