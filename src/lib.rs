/*!
# Packing List Generator

Turns a spreadsheet dump of shipping-carton line items into a formatted packing list
workbook.

## Overview

An uploaded workbook is read as a table (first worksheet, header row first), checked
for the required columns, grouped by carton and laid out as a bordered grid with a
header block, one merged serial/carton/weight cell per carton and a totals footer. The
grid is then written out as `Packing_List.xlsx`.

## Pipeline

1. **loader**: first worksheet of the upload → [`dataset::Dataset`]
2. **report**: `validate` the columns, `build` the [`report::ReportGrid`]
3. **downloader**: grid → xlsx bytes

Each step is a plain function of its input; nothing is kept between uploads.

## Required columns

`CARTONNO`, `PARTNO`, `QTY`, `REF1`, `PARTDESC`, `WEIGHT`, `MANFPART`, `CRTN WEIGHT`,
`Brand`. `QUANTITY` is accepted for `QTY` and `CRTNWEIGHT` for `CRTN WEIGHT`.

## Modules

- **dataset**: cell values and the input table
- **report**: validation, grouping, totals and layout
- **loader**: workbook import
- **downloader**: workbook export
- **options**: layout options and server settings
- **error**: the error type shared by every step
- **app**: upload form and HTTP endpoints (feature `web`)

## REST API Endpoints

- `/` - Upload form
- `/api/packing-list` - Multipart upload (`file`), responds with the workbook
- `/api/validate` - Multipart upload (`file`), responds with the missing columns
*/

pub mod app;
pub mod dataset;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod options;
pub mod report;

pub use dataset::{CellValue, Dataset};
pub use error::ReportError;
pub use options::{GroupingPolicy, ReportOptions, ServerConfig};
pub use report::{ReportBuilder, ReportGrid, build, validate};

/// Load an uploaded workbook, build the packing list and serialize it
///
/// Nothing is returned unless every step succeeds, so a caller never holds a
/// partial file.
pub fn generate(upload: &[u8], builder: &ReportBuilder) -> Result<Vec<u8>, ReportError> {
    let dataset = loader::load_dataset(upload)?;
    let grid = builder.build(&dataset)?;
    downloader::to_xlsx(&grid, builder.options())
}
