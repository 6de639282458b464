//! Fields derived from a [`BirdRecord`]: cloze text, population estimate,
//! media filenames and the deck row.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BREEDING_BIRDS_KEY, BirdRecord};
use crate::utils::normalize_tag;

static RE_LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d,.]*").expect("invalid regex: leading number"));

static MULTIPLIERS: LazyLock<[(Regex, f64); 2]> = LazyLock::new(|| {
    [
        (
            Regex::new(r"(?i)million").expect("invalid regex: million"),
            1_000_000.0,
        ),
        (Regex::new(r"(?i)pair").expect("invalid regex: pair"), 2.0),
    ]
});

/// Estimated number of individuals from a breeding-population fact such as
/// `"1.2 million pairs"`. Unknown or non-numeric text gives 0.
pub fn estimate_population(fact: &str) -> u64 {
    let fact = fact.trim();
    let number_str = RE_LEADING_NUMBER
        .find(fact)
        .map(|m| m.as_str().replace(',', ""))
        .unwrap_or_default();
    if number_str.is_empty() {
        return 0;
    }

    let mut number: f64 = match number_str.parse() {
        Ok(n) => n,
        Err(e) => {
            log::warn!("Unreadable population figure '{}': {}", fact, e);
            return 0;
        }
    };

    for (re, factor) in MULTIPLIERS.iter() {
        if re.is_match(fact) {
            number *= factor;
        }
    }

    number.round_ties_even() as u64
}

impl BirdRecord {
    /// The description with the first mention of the bird's name hidden.
    pub fn cloze(&self) -> String {
        if self.name.is_empty() {
            return self.description.clone();
        }
        self.description
            .replacen(&self.name, &format!("{{{{c1:{}}}}}", self.name), 1)
    }

    pub fn population_estimate(&self) -> u64 {
        let fact = self
            .facts
            .get(BREEDING_BIRDS_KEY)
            .map(String::as_str)
            .unwrap_or("0");
        estimate_population(fact)
    }

    pub fn slug(&self) -> &str {
        self.page_url
            .rsplit_once('/')
            .map(|(_, last)| last)
            .unwrap_or(self.page_url.as_str())
    }

    /// Media filename for image slot `slot` (1-based).
    pub fn image_filename(&self, slot: usize) -> String {
        format!("bird_image_{}{}.jpg", self.slug(), slot)
    }

    pub fn audio_filename(&self) -> String {
        match self.audio_url {
            Some(_) => format!("bird_call_{}.mp3", self.slug()),
            None => String::new(),
        }
    }

    pub fn group_tag(&self) -> String {
        normalize_tag(&self.group)
    }

    /// One deck row. Image slots past `max_images` are dropped, missing ones
    /// are left empty.
    pub fn deck_fields(&self, max_images: usize) -> Vec<String> {
        let mut fields = vec![
            self.name.clone(),
            self.binomial_name.clone(),
            self.description.clone(),
            self.cloze(),
            self.page_url.clone(),
        ];

        for slot in 1..=max_images {
            match self.image_urls.get(slot - 1) {
                Some(url) => {
                    fields.push(url.clone());
                    fields.push(format!("<img src=\"{}\">", self.image_filename(slot)));
                }
                None => {
                    fields.push(String::new());
                    fields.push(String::new());
                }
            }
        }

        let sound = match self.audio_url {
            Some(_) => format!("[sound:{}]", self.audio_filename()),
            None => String::new(),
        };
        fields.push(self.audio_url.clone().unwrap_or_default());
        fields.push(sound);
        fields.push(self.group_tag());

        fields
    }
}
