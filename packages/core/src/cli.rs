use std::path::PathBuf;

use clap::Parser;

/// YouTube Channel Tracker CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "yt-channel-tracker",
    version,
    about = "Channel statistics, title analysis and growth forecasts for YouTube channels"
)]
pub struct Cli {
    /// Channel handle, e.g. @channelname
    pub handle: String,

    /// YouTube Data API key (overrides YOUTUBE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// YouTube Data API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Days of synthesized history
    #[arg(long)]
    pub days: Option<u32>,

    /// Months to forecast
    #[arg(long)]
    pub months: Option<usize>,

    /// Page size for the video listing
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Maximum number of videos to collect
    #[arg(long)]
    pub cap: Option<usize>,

    /// Directory holding the cached history
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Keep a separate history cache per channel
    #[arg(long)]
    pub per_channel_cache: bool,

    /// Seed the noise source for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
