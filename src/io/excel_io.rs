use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::error::ForestError;
use crate::models::{StandRecord, StandResult};

/// Read a stand snapshot from the first sheet of an Excel (.xlsx) file.
///
/// The first row holds the column names; columns are matched by name, so
/// their order does not matter. Entirely blank rows are skipped; a row with
/// data but no `bestand_id` is kept with an empty id, which the engine rejects
/// like an empty id from any other format.
pub fn read_stands_excel(path: impl AsRef<Path>) -> Result<Vec<StandRecord>, ForestError> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())?;
    read_workbook(&mut workbook)
}

/// Read a stand snapshot from Excel bytes.
pub fn read_stands_excel_from_bytes(data: &[u8]) -> Result<Vec<StandRecord>, ForestError> {
    let mut workbook = Xlsx::new(Cursor::new(data))?;
    read_workbook(&mut workbook)
}

fn read_workbook<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<Vec<StandRecord>, ForestError> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ForestError::Excel("No sheets found in workbook".to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ForestError::MissingInput(format!("sheet '{sheet_name}' is empty")))?;
    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.to_string().trim().to_string(), i))
        .collect();
    if !columns.contains_key("bestand_id") {
        return Err(ForestError::ParseError(format!(
            "sheet '{sheet_name}' has no bestand_id column"
        )));
    }

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let line = i + 2;
        let cell = |name: &str| columns.get(name).and_then(|&idx| row.get(idx));
        let text = |name: &str| -> String {
            cell(name)
                .filter(|c| !c.is_empty())
                .map(cell_text)
                .unwrap_or_default()
        };
        let number = |name: &str| -> Option<f64> {
            let c = cell(name).filter(|c| !c.is_empty())?;
            let value = c.as_f64();
            if value.is_none() {
                tracing::warn!(row = line, column = name, value = %c, "ignoring non-numeric cell");
            }
            value
        };

        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        let bestand_id = text("bestand_id");
        if bestand_id.is_empty() {
            tracing::warn!(row = line, "row without bestand_id");
        }
        records.push(StandRecord {
            bestand_id,
            treslag: text("treslag"),
            bonitet: number("bonitet"),
            arealm2: number("arealm2"),
            alder: number("alder"),
            srhoydeo: number("srhoydeo"),
            srtrean: number("srtrean"),
            srgrflate: number("srgrflate"),
            srvolmb: number("srvolmb"),
            hogstkl_verdi: number("hogstkl_verdi"),
            srvolub: number("srvolub"),
        });
    }
    Ok(records)
}

/// Cell text; whole floats print without a fractional part so numeric ids stay `"17"`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

/// Column names of the result sheet, in output order.
const RESULT_HEADERS: [&str; 31] = [
    "bestand_id",
    "treslag",
    "bonitet",
    "arealm2",
    "alder",
    "hogstkl_verdi",
    "srvolmb",
    "srvolub",
    "height",
    "N_per_hectare",
    "G1",
    "Ht40",
    "yearly_height_growth",
    "delta_N_per_hectare",
    "G2",
    "volume_per_hectare",
    "volume_per_hectare_next_year",
    "volume_per_hectare_without_bark",
    "volume",
    "volume_next_year",
    "volume_growth_next_year",
    "volume_growth_factor",
    "saw_wood_portion",
    "volume_without_bark",
    "carbon_stored",
    "carbon_captured_next_year",
    "years_to_maturity",
    "volume_at_maturity",
    "volume_at_maturity_without_bark",
    "yield_requirement",
    "error",
];

fn numeric_columns(r: &StandResult) -> [Option<f64>; 27] {
    [
        r.bonitet,
        r.arealm2,
        r.alder,
        r.hogstkl_verdi,
        r.srvolmb,
        r.srvolub,
        r.height,
        r.n_per_hectare,
        r.g1,
        r.ht40,
        r.yearly_height_growth,
        r.delta_n_per_hectare,
        r.g2,
        r.volume_per_hectare,
        r.volume_per_hectare_next_year,
        r.volume_per_hectare_without_bark,
        r.volume,
        r.volume_next_year,
        r.volume_growth_next_year,
        r.volume_growth_factor,
        r.saw_wood_portion,
        r.volume_without_bark,
        r.carbon_stored,
        r.carbon_captured_next_year,
        r.years_to_maturity.map(f64::from),
        r.volume_at_maturity,
        r.volume_at_maturity_without_bark,
    ]
}

fn write_result_row(worksheet: &mut Worksheet, row: u32, r: &StandResult) -> Result<(), ForestError> {
    worksheet.write_string(row, 0, &r.bestand_id)?;
    worksheet.write_string(row, 1, &r.treslag)?;
    let mut col: u16 = 2;
    for value in numeric_columns(r) {
        // Undefined values stay blank cells.
        if let Some(v) = value {
            worksheet.write_number(row, col, v)?;
        }
        col += 1;
    }
    worksheet.write_number(row, col, r.yield_requirement)?;
    if let Some(error) = &r.error {
        worksheet.write_string(row, col + 1, error)?;
    }
    Ok(())
}

/// Write enriched stand results to an Excel (.xlsx) file.
pub fn write_results_excel(results: &[StandResult], path: impl AsRef<Path>) -> Result<(), ForestError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Stands")?;

    for (col, header) in RESULT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (i, result) in results.iter().enumerate() {
        write_result_row(worksheet, i as u32 + 1, result)?;
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
