use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, Command, OutputFormat};
use ytscout::config::{self, Config};
use ytscout::output;
use ytscout::resolve;
use ytscout::search::SearchOptions;
use ytscout::youtube::ApiClient;

/// Default duration cutoff for `uploads` when neither flag nor config sets one
const DEFAULT_MAX_DURATION_SECS: u64 = 60;
const DEFAULT_CAP: usize = 50;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytscout.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytscout")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = match std::env::var(config::API_KEY_ENV) {
        Ok(_) => format!("  \x1b[32m✅\x1b[0m {}  set", config::API_KEY_ENV),
        Err(_) => format!(
            "  \x1b[31m❌\x1b[0m {}  (not set; use --api-key or api_key in the config file)",
            config::API_KEY_ENV
        ),
    };

    format!(
        "\nAPI KEY:\n{key_line}\n\nConfig file: {}\nLogs are written to: {}",
        config::config_path().display(),
        log_dir().join("ytscout.log").display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();
    if cli.verbose {
        let config_path = config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    // Only commands that talk to the API need a key
    let connect = || -> Result<ApiClient> {
        let api_config = config.api_config(cli.api_key.clone(), std::env::var(config::API_KEY_ENV).ok(), cli.timeout)?;
        debug!("Using {} with a {:?} timeout", api_config.base_url, api_config.timeout);
        ApiClient::new(api_config)
    };

    let rendered = match cli.command {
        Command::Resolve { ref reference } => {
            let mode = resolve::classify(reference);
            let channel_id = match resolve::literal(&mode) {
                Some(id) => Some(id),
                None => resolve::resolve_mode(&connect()?, &mode).await,
            };
            if cli.verbose {
                eprintln!("Reference: {reference}\nMode: {mode}\nIdentifier: {}", mode.identifier());
            }
            match (cli.format, channel_id) {
                (OutputFormat::Json, id) => output::render_resolution_json(reference, &mode, id.as_ref()),
                (OutputFormat::Text, Some(id)) => output::render_resolution_text(&mode, &id),
                (OutputFormat::Text, None) => bail!("could not resolve channel: {reference}"),
            }
        }

        Command::Uploads {
            ref reference,
            max_duration,
            cap,
        } => {
            let max_duration = max_duration
                .or(config.default_max_duration)
                .unwrap_or(DEFAULT_MAX_DURATION_SECS);
            let cap = cap.or(config.default_cap).unwrap_or(DEFAULT_CAP);
            let api = connect()?;

            let Some(channel_id) = resolve::resolve(&api, reference).await else {
                bail!("could not resolve channel: {reference}");
            };
            let Some(uploads) = ytscout::collect::uploads_playlist_id(&api, &channel_id).await else {
                bail!("channel {channel_id} has no uploads playlist (or the lookup failed)");
            };

            let records = ytscout::collect::collect(&api, &uploads, max_duration, cap).await;
            if cli.verbose {
                eprintln!(
                    "Channel: {channel_id}\nUploads playlist: {uploads}\nVideos under {max_duration}s: {} (cap {cap})",
                    records.len()
                );
            }

            match cli.format {
                OutputFormat::Text if records.is_empty() => bail!("no videos under {max_duration}s found for {channel_id}"),
                OutputFormat::Text => output::render_records_text(&records),
                OutputFormat::Json => output::render_json(&records),
            }
        }

        Command::Search {
            keyword,
            channels,
            channel_names,
            video_type,
            sort,
            min_outlier,
            limit,
            comments,
        } => {
            let channels_file = channels.unwrap_or_else(|| config.channels_file());
            let entries = ytscout::channels::select(ytscout::channels::load(&channels_file)?, &channel_names);
            if entries.is_empty() {
                bail!("no channels selected from {}", channels_file.display());
            }

            let options = SearchOptions {
                keyword,
                video_type,
                sort,
                min_outlier,
                limit,
                comments,
            };
            let results = ytscout::search::search(&connect()?, &entries, &options).await?;
            if cli.verbose {
                eprintln!("Channels searched: {}\nVideos found: {}", entries.len(), results.len());
            }

            match cli.format {
                OutputFormat::Text if results.is_empty() => bail!("no videos match the criteria"),
                OutputFormat::Text => output::render_scored_text(&results),
                OutputFormat::Json => output::render_json(&results),
            }
        }
    };

    println!("{rendered}");
    Ok(())
}
