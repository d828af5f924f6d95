use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::dataset::CellValue;
use crate::error::ReportError;
use crate::options::ReportOptions;
use crate::report::{Alignment, CellStyle, ReportGrid, TABLE_WIDTH};

/// MIME type of the generated workbook
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Convert a packing list grid to XLSX format
///
/// Writes the grid onto a single worksheet named after `options.sheet_name`. Merged
/// regions are written with `merge_range`; every other cell is written with its own
/// format, including blank cells so their borders show.
///
/// # Arguments
/// * `grid` - The laid-out report
/// * `options` - Sheet name and column widths
///
/// # Returns
/// * `Result<Vec<u8>, ReportError>` - XLSX file content as bytes, or a `Write` error
///
/// # Examples
/// ```no_run
/// use packing_list::dataset::Dataset;
/// use packing_list::downloader::to_xlsx;
/// use packing_list::options::ReportOptions;
/// use packing_list::report::build;
///
/// let grid = build(&Dataset::default()).unwrap();
/// match to_xlsx(&grid, &ReportOptions::default()) {
///     Ok(xlsx_data) => println!("XLSX generated: {} bytes", xlsx_data.len()),
///     Err(e) => eprintln!("Failed to generate XLSX: {}", e),
/// }
/// ```
pub fn to_xlsx(grid: &ReportGrid, options: &ReportOptions) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(&options.sheet_name)?;

    for (col, width) in options.column_widths.iter().take(TABLE_WIDTH as usize).enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for merge in &grid.merges {
        let anchor = &grid.rows[merge.first_row as usize].cells[merge.first_col as usize];
        let format = cell_format(&anchor.style);
        let text = match &anchor.value {
            CellValue::Text(s) => s.as_str(),
            _ => "",
        };
        worksheet.merge_range(
            merge.first_row,
            merge.first_col,
            merge.last_row,
            merge.last_col,
            text,
            &format,
        )?;
        // Non-text values go into the anchor cell after merging
        if let CellValue::Number(n) = anchor.value {
            worksheet.write_number_with_format(merge.first_row, merge.first_col, n, &format)?;
        }
    }

    let merged = grid.merged_cells();
    for (r, row) in grid.rows.iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.cells.iter().enumerate() {
            let c = c as u16;
            if merged.contains(&(r, c)) {
                continue;
            }
            let format = cell_format(&cell.style);
            match &cell.value {
                CellValue::Empty => {
                    worksheet.write_blank(r, c, &format)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string_with_format(r, c, s, &format)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number_with_format(r, c, *n, &format)?;
                }
            }
        }
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

/// Translate a grid cell style into a rust_xlsxwriter format
fn cell_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }

    match style.align {
        Alignment::General => format,
        Alignment::Center => format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter),
        Alignment::LeftMiddle => format
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter),
        Alignment::RightMiddle => format
            .set_align(FormatAlign::Right)
            .set_align(FormatAlign::VerticalCenter),
        Alignment::BottomLeft => format
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::Bottom),
    }
}
