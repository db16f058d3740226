//! Result table output
//!
//! UTF-8 with a BOM so spreadsheet tools keep multi-byte names intact.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::TableError;
use crate::finder::{ChannelCategory, SellerOutcome};

/// Identity columns leading every row
pub const RECORD_COLUMNS: [&str; 3] = ["shop_id", "name", "ranking"];

/// Channels always written, in column order. The alternate marketplace is
/// appended only when some seller has one.
const FIXED_CHANNELS: [ChannelCategory; 3] = [
    ChannelCategory::NativeStorefront,
    ChannelCategory::OwnedSite,
    ChannelCategory::FashionChannel,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write outcomes to `path`, replacing any existing file.
pub fn write_outcomes(path: impl AsRef<Path>, outcomes: &[SellerOutcome]) -> Result<(), TableError> {
    let path = path.as_ref();
    let io_error = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut sink = BufWriter::new(file);
    write_outcomes_to(&mut sink, outcomes)?;
    sink.flush().map_err(io_error)?;

    info!("Results saved to {}", path.display());
    Ok(())
}

/// Write outcomes as CSV (BOM first) to any sink.
pub fn write_outcomes_to<W: Write>(mut sink: W, outcomes: &[SellerOutcome]) -> Result<(), TableError> {
    sink.write_all(UTF8_BOM).map_err(csv::Error::from)?;

    let mut channels = FIXED_CHANNELS.to_vec();
    if outcomes
        .iter()
        .any(|outcome| !outcome.alternate_marketplace_url.is_empty())
    {
        channels.push(ChannelCategory::AlternateMarketplace);
    }

    let mut writer = csv::Writer::from_writer(sink);
    let header: Vec<&str> = RECORD_COLUMNS
        .into_iter()
        .chain(channels.iter().filter_map(|channel| channel.column()))
        .collect();
    writer.write_record(&header)?;

    for outcome in outcomes {
        let id = outcome.id.to_string();
        let rank = outcome.rank.to_string();
        let row: Vec<&str> = [id.as_str(), outcome.display_name.as_str(), rank.as_str()]
            .into_iter()
            .chain(channels.iter().map(|channel| outcome.url_for(*channel)))
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
