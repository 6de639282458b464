use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::decoder::{DecodeError, FactsDecoder};
use crate::types::BirdPage;
use crate::utils::capitalize;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Failed to decode key facts: {0}")]
    Decode(#[from] DecodeError),
}

static RE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Group: (.*)").expect("invalid regex: group"));

static RE_STATUS_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".* status").expect("invalid regex: status class"));

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn first_text(document: &Html, selector: &str, field: &str) -> Result<String, ParseError> {
    let sel = Selector::parse(selector).unwrap();
    document
        .select(&sel)
        .next()
        .map(|e| elem_text(e).trim().to_string())
        .ok_or_else(|| ParseError::MissingField(field.to_string()))
}

fn parse_group(document: &Html) -> Result<String, ParseError> {
    document
        .root_element()
        .text()
        .find(|t| t.contains("Group:"))
        .and_then(|t| RE_GROUP.captures(t))
        .map(|caps| caps[1].trim().to_string())
        .ok_or_else(|| ParseError::MissingField("group".to_string()))
}

fn parse_status(document: &Html) -> Result<String, ParseError> {
    let class_sel = Selector::parse("[class]").unwrap();
    document
        .select(&class_sel)
        .find(|e| {
            e.value()
                .attr("class")
                .is_some_and(|class| RE_STATUS_CLASS.is_match(class))
        })
        .map(|e| elem_text(e).trim().to_string())
        .ok_or_else(|| ParseError::MissingField("conservation status".to_string()))
}

fn parse_image_urls(document: &Html) -> Vec<String> {
    let gallery_sel = Selector::parse(".swiper.swiper-gallery").unwrap();
    let image_sel = Selector::parse("rspb-image").unwrap();
    let img_sel = Selector::parse("img").unwrap();

    let Some(gallery) = document.select(&gallery_sel).next() else {
        log::debug!("No image gallery on page");
        return Vec::new();
    };

    gallery
        .select(&image_sel)
        .filter_map(|image| {
            image
                .select(&img_sel)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map(str::to_string)
        })
        .collect()
}

fn parse_xeno_canto_link(document: &Html) -> Option<String> {
    let a_sel = Selector::parse("a[href]").unwrap();
    document
        .select(&a_sel)
        .find(|a| elem_text(*a) == "xeno-canto")
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

fn parse_distribution_map(document: &Html) -> Option<String> {
    let map_sel = Selector::parse("[src*='distributionmap']").unwrap();
    document
        .select(&map_sel)
        .next()
        .and_then(|e| e.value().attr("src"))
        .map(str::to_string)
}

pub fn parse_bird_page<D: FactsDecoder + ?Sized>(
    html: &str,
    decoder: &D,
) -> Result<BirdPage, ParseError> {
    let document = Html::parse_document(html);

    let name = first_text(&document, "h1", "name")?;
    let binomial_name = capitalize(&first_text(&document, ".info.latin", "binomial name")?);
    let group = capitalize(&parse_group(&document)?);
    let conservation_status = parse_status(&document)?;
    let description = first_text(&document, ".intro", "description")?;
    let facts = decoder.decode_facts(html)?;

    let image_urls = parse_image_urls(&document);

    let xeno_canto_url = parse_xeno_canto_link(&document);
    if xeno_canto_url.is_none() {
        log::debug!("No xeno-canto link for {}", name);
    }

    let distribution_map_url = parse_distribution_map(&document);
    if distribution_map_url.is_none() {
        log::debug!("No distribution map for {}", name);
    }

    Ok(BirdPage {
        name,
        binomial_name,
        group,
        conservation_status,
        description,
        facts,
        image_urls,
        xeno_canto_url,
        distribution_map_url,
    })
}

/// Direct file URL of the recording on a xeno-canto page, if one is embedded.
pub fn parse_audio_page(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let path_sel = Selector::parse(".xc-audio [data-xc-filepath]").unwrap();
    document
        .select(&path_sel)
        .next()
        .and_then(|e| e.value().attr("data-xc-filepath"))
        .map(|path| format!("https:{}", path))
}

/// Card links of one A-Z listing page. An empty list means the listing has
/// run out; a page without the card container at all is an error.
pub fn parse_catalog_page(html: &str, base_url: &str) -> Result<Vec<String>, ParseError> {
    let document = Html::parse_document(html);
    let cards_sel = Selector::parse(".cards").unwrap();
    let a_sel = Selector::parse("a[href]").unwrap();

    let cards = document
        .select(&cards_sel)
        .next()
        .ok_or_else(|| ParseError::MissingField("cards".to_string()))?;

    Ok(cards
        .select(&a_sel)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| format!("{}{}", base_url, href))
        .collect())
}
