use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use log::debug;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::dataset::{CellValue, Dataset};
use crate::error::ReportError;

/// Load the first worksheet of an uploaded workbook
///
/// The workbook format (xlsx, xlsm, xls, ods) is detected from the content. The
/// first row of the used range is the header; every following row becomes a
/// record, blank rows included, so record positions map back to worksheet rows.
///
/// # Arguments
/// * `bytes` - The raw upload
///
/// # Returns
/// * `Result<Dataset, ReportError>` - The table or a `Load` error
///
/// # Examples
/// ```no_run
/// use packing_list::loader::load_dataset;
///
/// let bytes = std::fs::read("dump.xlsx").unwrap();
/// match load_dataset(&bytes) {
///     Ok(ds) => println!("Read {} rows", ds.len()),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn load_dataset(bytes: &[u8]) -> Result<Dataset, ReportError> {
    let sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    dataset_from_first_sheet(sheets)
}

/// Load the first worksheet of a workbook on disk.
pub fn load_dataset_from_path(path: impl AsRef<Path>) -> Result<Dataset, ReportError> {
    let sheets = open_workbook_auto(path)?;
    dataset_from_first_sheet(sheets)
}

fn dataset_from_first_sheet<RS: Read + Seek>(mut sheets: Sheets<RS>) -> Result<Dataset, ReportError> {
    let range = sheets
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Load("No sheets found in workbook".to_string()))??;

    Ok(range_to_dataset(&range))
}

fn range_to_dataset(range: &Range<Data>) -> Dataset {
    let mut rows = range.rows();

    let columns = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_value(cell).to_string().trim().to_string())
            .collect(),
        None => return Dataset::default(),
    };

    let mut dataset = Dataset::new(columns);
    // Used range may start below row 1
    if let Some((start_row, _)) = range.start() {
        dataset.header_row = start_row as usize + 1;
    }

    for row in rows {
        dataset.push_row(row.iter().map(cell_value).collect());
    }

    debug!(
        "Loaded worksheet: {} columns, {} rows, header on row {}",
        dataset.columns.len(),
        dataset.len(),
        dataset.header_row
    );
    dataset
}

/// Map a calamine cell onto the report's value type
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        // Dates keep their serial value
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(e) => CellValue::text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_map_onto_report_values() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(
            cell_value(&Data::String("ABC".to_string())),
            CellValue::Text("ABC".to_string())
        );
        assert_eq!(cell_value(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::text("TRUE"));
    }

    #[test]
    fn range_header_is_trimmed_and_rows_follow() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String(" CARTONNO ".to_string()));
        range.set_value((0, 1), Data::String("QTY".to_string()));
        range.set_value((1, 0), Data::Int(1));
        range.set_value((1, 1), Data::Float(3.0));
        range.set_value((2, 0), Data::Int(2));

        let ds = range_to_dataset(&range);
        assert_eq!(ds.columns, vec!["CARTONNO", "QTY"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.cell(1, 1), &CellValue::Empty);
        assert_eq!(ds.header_row, 1);
    }

    #[test]
    fn garbage_bytes_are_a_load_error() {
        match load_dataset(b"definitely not a workbook") {
            Err(ReportError::Load(_)) => {}
            other => panic!("expected load error, got {:?}", other),
        }
    }
}
