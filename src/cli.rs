use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ytscout::search::{SortBy, VideoType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytscout",
    about = "Find outlier YouTube videos by channel, duration and keyword",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// YouTube Data API key (overrides YOUTUBE_API_KEY and the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Show resolution steps and request counts
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a channel URL, handle, username or ID to a channel ID
    Resolve {
        /// Channel URL, @handle, legacy username URL or UC... ID
        reference: String,
    },

    /// List a channel's uploads shorter than a duration
    Uploads {
        /// Channel URL, @handle, legacy username URL or UC... ID
        reference: String,

        /// Keep videos strictly shorter than this many seconds
        #[arg(short = 'd', long)]
        max_duration: Option<u64>,

        /// Maximum number of videos to return
        #[arg(short, long)]
        cap: Option<usize>,
    },

    /// Search channels from a channels file for outlier videos matching a keyword
    Search {
        /// Keyword matched against title, description and tags
        keyword: String,

        /// Channels file ({"channels": [{"id": ..., "name": ...}]})
        #[arg(long)]
        channels: Option<PathBuf>,

        /// Only search the named channel (repeatable; default all)
        #[arg(long = "channel")]
        channel_names: Vec<String>,

        /// Video type filter
        #[arg(long, value_enum, default_value_t = VideoType::All)]
        video_type: VideoType,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortBy::Outlier)]
        sort: SortBy,

        /// Only keep videos scoring strictly above this outlier multiplier
        #[arg(long, default_value_t = 2.0)]
        min_outlier: f64,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Attach the N most-liked comments to each result
        #[arg(long, value_name = "N")]
        comments: Option<usize>,
    },
}
