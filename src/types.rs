use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

/// Key/value facts recovered from the page's obfuscated inline JSON.
pub type Facts = BTreeMap<String, String>;

/// Fact key holding the UK breeding population text, e.g. `"1.2 million pairs"`.
pub const BREEDING_BIRDS_KEY: &str = "ukBreedingBirds";

/// Raw fields of a species page, before the xeno-canto link is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirdPage {
    pub name: String,
    pub binomial_name: String,
    pub group: String,
    pub conservation_status: String,
    pub description: String,
    pub facts: Facts,
    pub image_urls: Vec<String>,
    pub xeno_canto_url: Option<String>,
    pub distribution_map_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirdRecord {
    pub name: String,
    pub binomial_name: String,
    pub group: String,
    pub conservation_status: String,
    pub description: String,
    pub facts: Facts,
    pub page_url: String,
    pub image_urls: Vec<String>,
    pub audio_url: Option<String>,
    pub distribution_map_url: Option<String>,
}

impl BirdRecord {
    pub fn from_page(page: BirdPage, page_url: &str, audio_url: Option<String>) -> Self {
        Self {
            name: page.name,
            binomial_name: page.binomial_name,
            group: page.group,
            conservation_status: page.conservation_status,
            description: page.description,
            facts: page.facts,
            page_url: page_url.to_string(),
            image_urls: page.image_urls,
            audio_url,
            distribution_map_url: page.distribution_map_url,
        }
    }
}

impl Display for BirdRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== {} ({}) ===", self.name, self.binomial_name)?;
        writeln!(f, "Group:  {}", self.group)?;
        writeln!(f, "Status: {}", self.conservation_status)?;
        writeln!(f, "URL:    {}", self.page_url)?;
        writeln!(f, "Estimated UK population: {}", self.population_estimate())?;
        writeln!(f, "\n{}", self.description)?;

        if !self.facts.is_empty() {
            writeln!(f, "\nKey facts:")?;
            for (key, value) in &self.facts {
                writeln!(f, "  {}: {}", key, value)?;
            }
        }

        writeln!(f, "\nImages: {}", self.image_urls.len())?;
        for url in &self.image_urls {
            writeln!(f, "  {}", url)?;
        }
        if let Some(audio) = &self.audio_url {
            writeln!(f, "Audio: {}", audio)?;
        }
        if let Some(map) = &self.distribution_map_url {
            writeln!(f, "Distribution map: {}", map)?;
        }
        Ok(())
    }
}
