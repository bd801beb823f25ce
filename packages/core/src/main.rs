use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;

use yt_channel_tracker::analysis::RandomNoise;
use yt_channel_tracker::cli::Cli;
use yt_channel_tracker::config::Config;
use yt_channel_tracker::error::AppError;
use yt_channel_tracker::logging::init_logging;
use yt_channel_tracker::render::{render_json, render_text};
use yt_channel_tracker::report::build_report;
use yt_channel_tracker::services::youtube::YouTubeClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::from_env().map_err(AppError::Config)?;
    config.apply_cli(&cli).map_err(AppError::Config)?;

    let api_key = config.require_api_key().map_err(AppError::Config)?;
    let client = YouTubeClient::new(config.api_url.clone(), api_key);
    let settings = config.report_settings();

    let mut noise = match cli.seed {
        Some(seed) => RandomNoise::seeded(seed),
        None => RandomNoise::from_entropy(),
    };

    tracing::info!("Analysing channel {}", cli.handle);
    let report = build_report(&client, &cli.handle, &settings, &mut noise, Utc::now()).await?;

    if cli.json {
        let json = render_json(&report).map_err(|err| AppError::Parse(err.to_string()))?;
        println!("{}", json);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}
