use std::path::PathBuf;

use clap::Parser;

use crate::config::RunRequest;

const EXAMPLES: &str = "\
Examples:
  # Send a plain message
  feedhook --mode message --message \"Hello, Slack!\"

  # Tally likes for a tag
  feedhook --mode aggregate --tag Go --pages 5

  # Announce the latest feed entry
  feedhook --mode rss --rss https://qiita.com/tags/Go/feed --limit 10

Environment:
  SLACK_WEBHOOK_URL   webhook that receives the message (required)
  QIITA_ACCESS_TOKEN  bearer token for the tag search API
  SLACK_MESSAGE       message used when --message is not given";

#[derive(Parser, Debug)]
#[command(name = "feedhook")]
#[command(version, about = "Post tag like tallies and feed updates to a chat webhook")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Mode of operation: message, aggregate or rss
    #[arg(long, default_value = "message")]
    pub mode: String,

    /// Tag to tally (aggregate mode)
    #[arg(long, default_value = "Go")]
    pub tag: String,

    /// Maximum number of pages to fetch (aggregate mode)
    #[arg(long, default_value_t = 5)]
    pub pages: u32,

    /// Feed URL (rss mode)
    #[arg(long = "rss", value_name = "URL")]
    pub rss: Option<String>,

    /// Number of recent entries to select (rss mode)
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Message to send (message mode)
    #[arg(long)]
    pub message: Option<String>,

    /// Config file (default: ~/.config/feedhook/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run_request(&self) -> RunRequest {
        RunRequest {
            mode: self.mode.clone(),
            tag: self.tag.clone(),
            pages: self.pages,
            feed_url: self.rss.clone(),
            limit: self.limit,
            message: self.message.clone(),
        }
    }
}
