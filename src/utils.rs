use std::fmt::Display;

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Anki tags cannot contain spaces.
pub fn normalize_tag(text: &str) -> String {
    text.replace(',', "").replace(' ', "_")
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub skipped_urls: usize,
    pub media_submitted: usize,
    pub media_present: usize,
}

impl Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Birds written:       {}", self.processed)?;
        writeln!(f, "  URLs skipped:        {}", self.skipped_urls)?;
        writeln!(f, "  Media transcoded:    {}", self.media_submitted)?;
        writeln!(f, "  Media already found: {}", self.media_present)
    }
}
