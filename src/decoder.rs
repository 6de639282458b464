//! Recovery of the key facts that RSPB pages ship inside an enciphered
//! blob of inline JSON.
//!
//! The page generator emits one long line where quotes are written as `&q;`.
//! Reflowing the braces onto their own lines lets the `"slug":"general"`
//! object be cut out with a single non-greedy match.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::types::Facts;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Page has no inline script")]
    NoScript,
    #[error("No \"slug\":\"general\" object in script text")]
    MarkerNotFound,
    #[error("Malformed facts JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Facts JSON has no \"specifications\" object")]
    MissingSpecifications,
}

static RE_GENERAL_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\{.*?"slug":"general".*?\}"#).expect("invalid regex: general object")
});

const REPLACEMENTS: [(&str, &str); 3] = [("{", "\n{"), ("}", "\n}"), ("&q;", "\"")];

pub trait FactsDecoder {
    fn decode_facts(&self, raw_page: &str) -> Result<Facts, DecodeError>;
}

/// Decodes facts from the last `<script>` on the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptCipherDecoder;

impl FactsDecoder for ScriptCipherDecoder {
    fn decode_facts(&self, raw_page: &str) -> Result<Facts, DecodeError> {
        let document = Html::parse_document(raw_page);
        let script_sel = Selector::parse("script").unwrap();
        let script = document
            .select(&script_sel)
            .last()
            .ok_or(DecodeError::NoScript)?;

        decode_script(&script.text().collect::<String>())
    }
}

pub fn decode_script(script: &str) -> Result<Facts, DecodeError> {
    let reflowed = REPLACEMENTS
        .iter()
        .fold(script.to_string(), |text, (from, to)| text.replace(from, to));
    log::trace!("Reflowed script text:\n{}", reflowed);

    let matched = RE_GENERAL_OBJECT
        .find(&reflowed)
        .ok_or(DecodeError::MarkerNotFound)?
        .as_str();

    // The lazy match stops at the first closing brace, so the outer object
    // is left open and needs one more `}`.
    let lines: Vec<&str> = matched.lines().collect();
    let tail = &lines[lines.len().saturating_sub(3)..];
    let repaired = format!("{}}}", tail.join("\n"));

    let json: serde_json::Value = serde_json::from_str(&repaired)?;
    let specifications = json
        .get("specifications")
        .and_then(|v| v.as_object())
        .ok_or(DecodeError::MissingSpecifications)?;

    Ok(specifications
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_decode_synthetic_single_line_script() {
        let script =
            r#"{"a":1,"slug":"general","specifications":{"ukBreedingBirds":"1.2 million pairs"}}"#;

        let facts = decode_script(script).expect("Failed to decode script");

        assert_eq!(facts.len(), 1);
        assert_eq!(
            facts.get("ukBreedingBirds").map(String::as_str),
            Some("1.2 million pairs")
        );
    }

    #[test]
    fn test_decode_enciphered_quotes() {
        let script = "window.STATE={&q;page&q;:7,&q;sections&q;:[{&q;slug&q;:&q;diet&q;},\
             {&q;id&q;:3,&q;slug&q;:&q;general&q;,&q;specifications&q;:\
             {&q;ukBreedingBirds&q;:&q;6,300 pairs&q;,&q;length&q;:&q;25cm&q;}}]}";

        let facts = decode_script(script).expect("Failed to decode script");

        assert_eq!(facts["ukBreedingBirds"], "6,300 pairs");
        assert_eq!(facts["length"], "25cm");
    }

    #[test]
    fn test_decode_keeps_non_string_values_as_json_text() {
        let script =
            r#"{"slug":"general","specifications":{"wingspan":42,"legal":true,"note":null}}"#;

        let facts = decode_script(script).expect("Failed to decode script");

        assert_eq!(facts["wingspan"], "42");
        assert_eq!(facts["legal"], "true");
        assert!(!facts.contains_key("note"));
    }

    #[test]
    fn test_decode_missing_marker() {
        let script = r#"{"slug":"diet","specifications":{"ukBreedingBirds":"10"}}"#;

        let err = decode_script(script).unwrap_err();
        assert!(matches!(err, DecodeError::MarkerNotFound));
    }

    #[test]
    fn test_decode_missing_specifications() {
        let script = r#"{"a":1,"slug":"general","other":{"x":"y"}}"#;

        let err = decode_script(script).unwrap_err();
        assert!(matches!(err, DecodeError::MissingSpecifications));
    }

    #[test]
    fn test_decode_malformed_json() {
        let script = r#"{"slug":"general","specifications":{"ukBreedingBirds":}}"#;

        let err = decode_script(script).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_decode_facts_uses_last_script() {
        let html = r#"
            <html><head>
            <script>var first = {"slug":"general","specifications":{"ukBreedingBirds":"1"}};</script>
            </head><body>
            <script>{&q;slug&q;:&q;general&q;,&q;specifications&q;:{&q;ukBreedingBirds&q;:&q;2&q;}}</script>
            </body></html>
        "#;

        let facts = ScriptCipherDecoder
            .decode_facts(html)
            .expect("Failed to decode facts");
        assert_eq!(facts["ukBreedingBirds"], "2");
    }

    #[test]
    fn test_decode_facts_without_script() {
        let html = "<html><body><h1>Robin</h1></body></html>";

        let err = ScriptCipherDecoder.decode_facts(html).unwrap_err();
        assert!(matches!(err, DecodeError::NoScript));
    }

    #[test]
    fn test_decode_facts_from_fixture() {
        let html = fs::read_to_string("fixtures/bird_page_complete.html")
            .expect("Failed to read fixture");

        let facts = ScriptCipherDecoder
            .decode_facts(&html)
            .expect("Failed to decode facts");

        assert_eq!(facts["ukBreedingBirds"], "7.35 million pairs");
        assert_eq!(facts["diet"], "Worms, seeds and fruits, insects");
    }
}
