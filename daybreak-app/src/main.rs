use anyhow::Result;
use clap::Parser;
use daybreak_common::DaybreakError;
use daybreak_common::observability::{LogConfig, init_logging};
use daybreak_imagery::bing::{BingApi, DEFAULT_MARKET};
use daybreak_social::WeiboApi;

use daybreak_app::publish;

#[derive(Parser, Debug)]
#[command(
    name = "daybreak",
    version,
    about = "Republish the daily featured image to a social feed"
)]
struct Cli {
    /// OAuth 2.0 access token for the share API.
    #[arg(long, env = "DAYBREAK_ACCESS_TOKEN")]
    token: String,

    /// Source attribution appended to every posted caption, identifying the
    /// posting application.
    #[arg(long, env = "DAYBREAK_SOURCE")]
    source: String,

    /// Market code for the image archive endpoint.
    #[arg(long, default_value = DEFAULT_MARKET)]
    market: String,
}

fn validate(cli: &Cli) -> daybreak_common::Result<()> {
    if cli.token.trim().is_empty() {
        return Err(DaybreakError::Config("token cannot be empty".into()));
    }
    if cli.source.trim().is_empty() {
        return Err(DaybreakError::Config("source cannot be empty".into()));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogConfig::default())?;
    validate(&cli)?;

    let images = BingApi::new(&cli.market);
    let share = WeiboApi::new(cli.token, cli.source);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => return Err(DaybreakError::Canceled.into()),
        res = publish::publish_daily_image(&images, &share) => res?,
    }

    tracing::info!("success");
    Ok(())
}
