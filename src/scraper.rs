use crate::config::Config;
use crate::deck::{DeckError, write_deck};
use crate::decoder::FactsDecoder;
use crate::media::{MediaDownloader, Transcoder};
use crate::parser::{ParseError, parse_audio_page, parse_bird_page, parse_catalog_page};
use crate::types::BirdRecord;
use crate::utils::RunStats;

use reqwest::Client;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error in {url}: {source}")]
    ParseError { url: String, source: ParseError },
    #[error("Deck error: {0}")]
    DeckError(#[from] DeckError),
    #[error("Page not found: {0}")]
    NotFound(String),
}

/// Anything that can hand back the HTML of a URL.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn get_html(&self, url: &str) -> Result<String, ScraperError>;
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PageSource for WebScraper {
    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}

/// Walks `/birds-and-wildlife/a-z?page=N` until a page comes back without
/// any species cards. A page missing the card container fails the whole
/// walk, so a layout change never yields a truncated catalog.
pub async fn build_catalog<S: PageSource>(
    source: &S,
    base_url: &str,
) -> Result<Vec<String>, ScraperError> {
    let mut urls = Vec::new();
    for page in 1u32.. {
        let url = format!("{}/birds-and-wildlife/a-z?page={}", base_url, page);
        log::info!("Fetching catalog page {}: {}", page, url);
        let html = source.get_html(&url).await?;

        let found = parse_catalog_page(&html, base_url)
            .map_err(|e| ScraperError::ParseError { url: url.clone(), source: e })?;
        if found.is_empty() {
            break;
        }
        log::debug!("Found {} birds on page {}", found.len(), page);
        urls.extend(found);
    }
    Ok(urls)
}

/// Follows a xeno-canto recording link to the audio file itself. Any
/// failure along the way just means the bird has no call.
pub async fn resolve_audio<S: PageSource>(source: &S, xeno_canto_url: &str) -> Option<String> {
    match source.get_html(xeno_canto_url).await {
        Ok(html) => {
            let audio = parse_audio_page(&html);
            if audio.is_none() {
                log::debug!("No recording on {}", xeno_canto_url);
            }
            audio
        }
        Err(e) => {
            log::warn!("Failed to fetch recording page {}: {}", xeno_canto_url, e);
            None
        }
    }
}

pub async fn fetch_bird<S: PageSource, D: FactsDecoder + ?Sized>(
    source: &S,
    decoder: &D,
    url: &str,
) -> Result<BirdRecord, ScraperError> {
    let html = source.get_html(url).await?;
    if html.trim().is_empty() {
        return Err(ScraperError::NotFound(url.to_string()));
    }

    let page = parse_bird_page(&html, decoder).map_err(|e| ScraperError::ParseError {
        url: url.to_string(),
        source: e,
    })?;

    let audio_url = match &page.xeno_canto_url {
        Some(link) => resolve_audio(source, link).await,
        None => None,
    };

    Ok(BirdRecord::from_page(page, url, audio_url))
}

/// Fetches every catalog URL in order, downloads each bird's media and
/// writes the deck. The first page that fails to parse aborts the run;
/// media problems never do.
pub async fn run_deck<S, D, T>(
    source: &S,
    decoder: &D,
    downloader: &MediaDownloader<T>,
    config: &Config,
    urls: &[String],
) -> Result<RunStats, ScraperError>
where
    S: PageSource,
    D: FactsDecoder + ?Sized,
    T: Transcoder,
{
    let mut stats = RunStats::default();
    let mut birds = Vec::new();

    for url in urls {
        log::info!("Fetching: {}", url);
        if config.should_skip(url) {
            log::info!("Skipping {}", url);
            stats.skipped_urls += 1;
            continue;
        }

        let bird = fetch_bird(source, decoder, url).await?;
        let report = downloader.download(&bird).await;
        stats.media_submitted += report.submitted;
        stats.media_present += report.skipped;
        birds.push(bird);
    }

    write_deck(&config.output_path, &mut birds, config.max_images)?;
    stats.processed = birds.len();
    Ok(stats)
}
