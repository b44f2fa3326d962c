use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedhook::app::AppContext;
use feedhook::cli::Cli;
use feedhook::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = async {
        let settings = Settings::load(cli.config.as_deref())?;
        let ctx = AppContext::new(settings)?;
        ctx.run(&cli.run_request()).await
    }
    .await;

    match result {
        Ok(delivery) => {
            tracing::debug!("Delivered after {} attempt(s)", delivery.attempts);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
