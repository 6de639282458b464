use std::io;
use std::path::Path;

use crate::types::BirdRecord;

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("Failed to write deck: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Most numerous birds first.
///
/// This is an ascending stable sort followed by a reversal, so birds with
/// equal estimates come out in the reverse of their catalog order.
pub fn sort_for_deck(records: &mut [BirdRecord]) {
    records.sort_by_cached_key(BirdRecord::population_estimate);
    records.reverse();
}

pub fn write_rows<W: io::Write>(
    writer: W,
    records: &[BirdRecord],
    max_images: usize,
) -> Result<(), DeckError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    for record in records {
        csv_writer.write_record(record.deck_fields(max_images))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Sorts `records` and writes them to `path`, replacing any previous deck.
pub fn write_deck(
    path: &Path,
    records: &mut [BirdRecord],
    max_images: usize,
) -> Result<(), DeckError> {
    sort_for_deck(records);
    let file = std::fs::File::create(path)?;
    write_rows(file, records, max_images)?;
    log::info!("Wrote {} birds to {}", records.len(), path.display());
    Ok(())
}
