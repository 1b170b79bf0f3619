use std::io::Read;
use std::path::Path;

use crate::error::ForestError;
use crate::models::{StandRecord, StandResult};

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

fn parse_csv_records<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<StandRecord>, ForestError> {
    let mut records = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let record: StandRecord = result.map_err(|e| {
            // Header is line 1, first data row line 2.
            ForestError::ParseError(format!("CSV row {}: {e}", i + 2))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Read a stand snapshot from a CSV file with a header row.
///
/// Empty cells become undefined values. Unknown columns are ignored.
pub fn read_stands_csv(path: impl AsRef<Path>) -> Result<Vec<StandRecord>, ForestError> {
    let mut rdr = reader_builder().from_path(path.as_ref())?;
    parse_csv_records(&mut rdr)
}

/// Read a stand snapshot from CSV bytes.
pub fn read_stands_csv_from_bytes(data: &[u8]) -> Result<Vec<StandRecord>, ForestError> {
    let mut rdr = reader_builder().from_reader(data);
    parse_csv_records(&mut rdr)
}

/// Write enriched stand results to a CSV file, one row per stand.
///
/// Undefined values are written as empty cells.
pub fn write_results_csv(results: &[StandResult], path: impl AsRef<Path>) -> Result<(), ForestError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}
