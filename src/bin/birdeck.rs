use std::path::PathBuf;
use std::process;

use birdeck::catalog::{random_sample, read_catalog, write_catalog};
use birdeck::config::{Config, DEFAULT_SKIP_URLS};
use birdeck::decoder::ScriptCipherDecoder;
use birdeck::media::{Ffmpeg, MediaDownloader};
use birdeck::scraper::{WebScraper, build_catalog, fetch_bird, run_deck};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "birdeck")]
#[command(about = "Build an Anki deck of UK birds from rspb.org.uk", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
struct Settings {
    #[arg(long, global = true, default_value = "https://www.rspb.org.uk", help = "Site to scrape")]
    base_url: String,

    #[arg(long, global = true, default_value = "birdurls.txt", help = "URL catalog file")]
    catalog: PathBuf,

    #[arg(
        long,
        global = true,
        help = "Anki media folder [default: ~/.local/share/Anki2/User 1/collection.media]"
    )]
    media_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value = "birds.csv", help = "Deck CSV to write")]
    output: PathBuf,

    #[arg(
        long,
        global = true,
        default_value_t = 5,
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Image slots per bird"
    )]
    max_images: u16,

    #[arg(long, global = true, default_value_t = 20, help = "ffmpeg -q:v for images")]
    image_quality: u32,

    #[arg(long, global = true, default_value = "32k", help = "ffmpeg -b:a for calls")]
    audio_bitrate: String,

    #[arg(long, global = true, default_value_t = 10, help = "Seconds of each call to keep")]
    audio_seconds: u32,

    #[arg(long, global = true, default_value = "ffmpeg", help = "ffmpeg binary")]
    ffmpeg: PathBuf,

    #[arg(
        long = "skip",
        global = true,
        help = "Page URL to leave out of the deck (repeatable; replaces the built-in list)"
    )]
    skip_urls: Vec<String>,
}

impl From<Settings> for Config {
    fn from(s: Settings) -> Self {
        let skip_urls = if s.skip_urls.is_empty() {
            DEFAULT_SKIP_URLS.iter().map(|u| u.to_string()).collect()
        } else {
            s.skip_urls
        };

        Config {
            base_url: s.base_url,
            catalog_path: s.catalog,
            media_dir: s.media_dir.unwrap_or_else(Config::default_media_dir),
            output_path: s.output,
            max_images: s.max_images.into(),
            image_quality: s.image_quality,
            audio_bitrate: s.audio_bitrate,
            audio_max_seconds: s.audio_seconds,
            ffmpeg_path: s.ffmpeg,
            skip_urls,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the A-Z listing and save every species page URL to the catalog
    Catalog,
    /// Fetch every bird in the catalog, download its media and write the deck
    Deck,
    /// Fetch a few random birds from the catalog and print them
    Sample {
        #[arg(
            short = 'n',
            long,
            default_value_t = 1,
            help = "Number of birds to fetch"
        )]
        count: usize,

        #[arg(
            short = 'o',
            long = "output-format",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch a single species page and print what was extracted
    Show {
        #[arg(help = "URL of the species page")]
        url: String,

        #[arg(
            short = 'o',
            long = "output-format",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn load_catalog(config: &Config) -> Vec<String> {
    read_catalog(&config.catalog_path).unwrap_or_else(|e| {
        log::error!(
            "Error reading catalog {}: {} (run `birdeck catalog` first)",
            config.catalog_path.display(),
            e
        );
        process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let config = Config::from(cli.settings);
    log::debug!("Using {:?}", config);

    let scraper = WebScraper::new(&config.base_url).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });
    let decoder = ScriptCipherDecoder;

    match cli.command {
        Commands::Catalog => {
            let urls = build_catalog(&scraper, scraper.base_url())
                .await
                .unwrap_or_else(|e| {
                    log::error!("Error building catalog: {}", e);
                    process::exit(1);
                });
            if urls.is_empty() {
                log::error!(
                    "No bird URLs found; leaving {} untouched",
                    config.catalog_path.display()
                );
                process::exit(1);
            }

            write_catalog(&config.catalog_path, &urls).unwrap_or_else(|e| {
                log::error!("Error writing {}: {}", config.catalog_path.display(), e);
                process::exit(1);
            });
            log::info!(
                "Saved {} bird URLs to {}",
                urls.len(),
                config.catalog_path.display()
            );
        }

        Commands::Deck => {
            let urls = load_catalog(&config);
            let downloader = MediaDownloader::new(&config, Ffmpeg::new(&config.ffmpeg_path));

            let stats = run_deck(&scraper, &decoder, &downloader, &config, &urls)
                .await
                .unwrap_or_else(|e| {
                    log::error!("Error building deck: {}", e);
                    process::exit(1);
                });
            print!("{}", stats);
        }

        Commands::Sample { count, format } => {
            let urls = load_catalog(&config);
            let mut birds = Vec::new();

            for url in random_sample(&urls, count) {
                log::info!("Fetching: {}", url);
                let bird = fetch_bird(&scraper, &decoder, &url)
                    .await
                    .unwrap_or_else(|e| {
                        log::error!("Error fetching {}: {}", url, e);
                        process::exit(1);
                    });
                birds.push(bird);
            }

            match format {
                OutputFormat::Json => serialize_json(&birds),
                OutputFormat::Text => birds.iter().for_each(|b| println!("{}", b)),
            }
        }

        Commands::Show { url, format } => {
            log::info!("Fetching: {}", url);
            let bird = fetch_bird(&scraper, &decoder, &url)
                .await
                .unwrap_or_else(|e| {
                    log::error!("Error fetching {}: {}", url, e);
                    process::exit(1);
                });

            match format {
                OutputFormat::Json => serialize_json(&bird),
                OutputFormat::Text => println!("{}", bird),
            }
        }
    }
}
