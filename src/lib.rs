pub mod catalog;
pub mod config;
pub mod decoder;
pub mod deck;
pub mod media;
mod parser;
pub mod record;
pub mod scraper;
pub mod types;
pub mod utils;

pub use config::Config;
pub use parser::ParseError;
pub use self::scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://www.rspb.org.uk";
