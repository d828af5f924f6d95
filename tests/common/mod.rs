#![allow(dead_code)]

use packing_list::dataset::{CellValue, Dataset};
use packing_list::report::REQUIRED_COLUMNS;
use rust_xlsxwriter::{Workbook, Worksheet};

/// One input line: (carton, carton weight, qty, invoice)
pub type Line<'a> = (f64, f64, i64, &'a str);

pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Dataset with the required columns in their usual order
pub fn dataset(lines: &[Line]) -> Dataset {
    let mut ds = Dataset::new(columns(&REQUIRED_COLUMNS));
    for (i, (carton, weight, qty, invoice)) in lines.iter().enumerate() {
        ds.push_row(vec![
            CellValue::Number(*carton),
            CellValue::text(format!("PN-{}", i + 1)),
            CellValue::Number(*qty as f64),
            CellValue::text(*invoice),
            CellValue::text("Widget"),
            CellValue::Number(0.5),
            CellValue::text(format!("M-{}", i + 1)),
            CellValue::Number(*weight),
            CellValue::text("Acme"),
        ]);
    }
    ds
}

/// In-memory xlsx with the given header and rows on its first sheet
pub fn workbook_bytes(header: &[&str], rows: &[Vec<CellValue>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (c, name) in header.iter().enumerate() {
        worksheet.write_string(0, c as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let (r, c) = (r as u32 + 1, c as u16);
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(r, c, s.as_str()).unwrap();
                }
                CellValue::Number(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
            }
        }
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().unwrap()
}

/// The sample upload: two lines in carton 1, one in carton 2
pub fn sample_upload() -> Vec<u8> {
    let ds = dataset(&[(1.0, 10.0, 2, "INV-1"), (1.0, 10.0, 3, "INV-1"), (2.0, 5.0, 1, "INV-2")]);
    workbook_bytes(&REQUIRED_COLUMNS, &ds.rows)
}
