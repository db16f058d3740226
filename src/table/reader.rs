//! Seller table ingestion

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::TableError;
use crate::finder::SellerRecord;

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["shop_id", "name", "ranking", "url"];

/// Read the seller table at `path`, sorted by `shop_id`.
pub fn read_sellers(path: impl AsRef<Path>) -> Result<Vec<SellerRecord>, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_sellers_from(file)?;
    info!("Loaded {} sellers from {}", records.len(), path.display());
    Ok(records)
}

/// Read a seller table from any CSV source, sorted by `shop_id`.
///
/// Header names are matched case-insensitively and a leading UTF-8 BOM is
/// ignored. Missing required columns fail before any row is read.
pub fn read_sellers_from<R: Read>(source: R) -> Result<Vec<SellerRecord>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let mut index = HashMap::<String, usize>::new();
    for (idx, header) in headers.iter().enumerate() {
        let name = header.trim_start_matches('\u{feff}').trim().to_ascii_lowercase();
        index.entry(name).or_insert(idx);
    }

    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        match index.get(column) {
            Some(idx) => *slot = *idx,
            None => missing.push(column.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(TableError::MissingColumns { missing });
    }

    let [id, name, ranking, url] = positions;
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(SellerRecord::from_raw(
            row.get(id),
            row.get(name),
            row.get(ranking),
            row.get(url),
        ));
    }

    records.sort_by_key(|record| record.id);
    Ok(records)
}
