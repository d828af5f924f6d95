/*!
Packing list report builder.

Turns a [`Dataset`] of carton line items into a [`ReportGrid`]: the complete cell
layout of the packing list (values, merged regions and per-cell styles), ready to be
serialized by [`crate::downloader::to_xlsx`].

Layout, with 0-based rows and the ten table columns A..J:

| Row | Content |
|-----|---------|
| 0 | Title, merged A:J |
| 1 | `Invoice Number: ...` merged E:J (A:C merged, blank) |
| 2 | `Date: DD/MM/YYYY` merged E:J (A:C merged, blank) |
| 3 | blank |
| 4 | column headers |
| 5.. | one row per line item, serial/carton/carton weight merged per carton group |
| footer | totals row, package count, gross weight, signatory block |
*/

use chrono::{Local, NaiveDate};
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::dataset::{CellValue, Dataset};
use crate::error::ReportError;
use crate::options::{GroupingPolicy, ReportOptions};

/// Input column names accepted as aliases of a required column.
pub const COLUMN_RENAMES: [(&str, &str); 2] =
    [("QUANTITY", "QTY"), ("CRTNWEIGHT", "CRTN WEIGHT")];

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "CARTONNO",
    "PARTNO",
    "QTY",
    "REF1",
    "PARTDESC",
    "WEIGHT",
    "MANFPART",
    "CRTN WEIGHT",
    "Brand",
];

/// Column headers of the output table, left to right.
pub const TABLE_HEADERS: [&str; 10] = [
    "Sl. No",
    "CARTONNO",
    "PARTNO",
    "QTY",
    "REF1",
    "PARTDESC",
    "WEIGHT",
    "MANFPART",
    "CRTN WEIGHT",
    "Brand",
];

pub const TABLE_WIDTH: u16 = TABLE_HEADERS.len() as u16;

/// Largest quantity an xlsx number cell holds exactly (2^53).
pub const MAX_QUANTITY: i64 = 1 << 53;

const HEADER_ROW: u32 = 4;
const BODY_START_ROW: u32 = 5;

// Output columns
const COL_SERIAL: u16 = 0;
const COL_CARTON: u16 = 1;
const COL_PART_NO: u16 = 2;
const COL_QTY: u16 = 3;
const COL_REF: u16 = 4;
const COL_DESC: u16 = 5;
const COL_WEIGHT: u16 = 6;
const COL_MANF_PART: u16 = 7;
const COL_CARTON_WEIGHT: u16 = 8;
const COL_BRAND: u16 = 9;

/// Position of every required column in the input dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub carton: usize,
    pub part_no: usize,
    pub qty: usize,
    pub reference: usize,
    pub description: usize,
    pub weight: usize,
    pub manufacturer_part: usize,
    pub carton_weight: usize,
    pub brand: usize,
}

/// Resolve a required column, preferring an exact header match over a renamed alias.
fn resolve_column(dataset: &Dataset, required: &str) -> Option<usize> {
    dataset.column_index(required).or_else(|| {
        COLUMN_RENAMES
            .iter()
            .filter(|(_, to)| *to == required)
            .find_map(|(from, _)| dataset.column_index(from))
    })
}

/// Check that the dataset carries every required column
///
/// # Returns
/// * `Ok(ColumnMap)` - where each required column sits in the dataset
/// * `Err(ReportError::Schema)` - listing every missing column, in required order
pub fn validate(dataset: &Dataset) -> Result<ColumnMap, ReportError> {
    let resolved: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| resolve_column(dataset, name))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&resolved)
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ReportError::Schema { missing });
    }

    let idx: Vec<usize> = resolved.into_iter().flatten().collect();
    Ok(ColumnMap {
        carton: idx[0],
        part_no: idx[1],
        qty: idx[2],
        reference: idx[3],
        description: idx[4],
        weight: idx[5],
        manufacturer_part: idx[6],
        carton_weight: idx[7],
        brand: idx[8],
    })
}

/// One input row
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    /// 1-based worksheet row the item was read from
    pub row: usize,
    pub carton: CellValue,
    pub part_no: CellValue,
    pub quantity: Option<i64>,
    pub reference: CellValue,
    pub description: CellValue,
    pub weight: Option<f64>,
    pub manufacturer_part: CellValue,
    pub carton_weight: f64,
    pub brand: CellValue,
}

impl LineItem {
    /// Grouping key: carton identity plus carton weight.
    fn key(&self) -> (String, u64) {
        (carton_identity(&self.carton), weight_bits(self.carton_weight))
    }
}

fn carton_identity(carton: &CellValue) -> String {
    carton.to_string().trim().to_string()
}

fn weight_bits(weight: f64) -> u64 {
    // -0.0 and 0.0 are the same weight
    if weight == 0.0 { 0 } else { weight.to_bits() }
}

fn data_type_error(column: &str, row: usize, value: &CellValue) -> ReportError {
    ReportError::DataType {
        column: column.to_string(),
        row,
        value: value.to_string(),
    }
}

fn parse_number(
    dataset: &Dataset,
    idx: usize,
    column: &str,
    col: usize,
) -> Result<Option<f64>, ReportError> {
    let value = dataset.cell(idx, col);
    value
        .as_number()
        .map_err(|_| data_type_error(column, dataset.worksheet_row(idx), value))
}

/// Parse every non-blank row into a [`LineItem`].
///
/// Rows whose required cells are all blank are skipped. Errors carry the worksheet
/// row of the offending cell.
pub fn parse_line_items(dataset: &Dataset, map: &ColumnMap) -> Result<Vec<LineItem>, ReportError> {
    let required = [
        map.carton,
        map.part_no,
        map.qty,
        map.reference,
        map.description,
        map.weight,
        map.manufacturer_part,
        map.carton_weight,
        map.brand,
    ];

    let mut items = Vec::with_capacity(dataset.len());
    for idx in 0..dataset.len() {
        if required.iter().all(|&col| dataset.cell(idx, col).is_missing()) {
            continue;
        }
        let row = dataset.worksheet_row(idx);

        let carton = dataset.cell(idx, map.carton).clone();
        if carton.is_missing() {
            return Err(data_type_error("CARTONNO", row, &carton));
        }

        let quantity = match parse_number(dataset, idx, "QTY", map.qty)? {
            Some(q) if q.fract() != 0.0 || q.abs() > MAX_QUANTITY as f64 => {
                return Err(data_type_error("QTY", row, dataset.cell(idx, map.qty)));
            }
            Some(q) => Some(q as i64),
            None => None,
        };

        let weight = parse_number(dataset, idx, "WEIGHT", map.weight)?;

        let carton_weight = parse_number(dataset, idx, "CRTN WEIGHT", map.carton_weight)?
            .ok_or_else(|| {
                data_type_error("CRTN WEIGHT", row, dataset.cell(idx, map.carton_weight))
            })?;

        items.push(LineItem {
            row,
            carton,
            part_no: dataset.cell(idx, map.part_no).clone(),
            quantity,
            reference: dataset.cell(idx, map.reference).clone(),
            description: dataset.cell(idx, map.description).clone(),
            weight,
            manufacturer_part: dataset.cell(idx, map.manufacturer_part).clone(),
            carton_weight,
            brand: dataset.cell(idx, map.brand).clone(),
        });
    }

    Ok(items)
}

/// Line items of one carton, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct CartonGroup {
    /// 1-based, in order of first appearance
    pub serial: usize,
    pub carton: CellValue,
    pub carton_weight: f64,
    pub items: Vec<LineItem>,
}

/// Group line items by (carton number, carton weight). Groups keep the order in
/// which their key first appears; items keep input order within a group.
pub fn group_cartons(items: &[LineItem], policy: GroupingPolicy) -> Vec<CartonGroup> {
    let mut groups: Vec<CartonGroup> = Vec::new();
    let mut first_seen: HashMap<(String, u64), usize> = HashMap::new();

    for item in items {
        let key = item.key();
        let existing = match policy {
            GroupingPolicy::Contiguous => groups
                .last()
                .filter(|g| g.items.first().map(LineItem::key).as_ref() == Some(&key))
                .map(|_| groups.len() - 1),
            GroupingPolicy::Partition => first_seen.get(&key).copied(),
        };

        match existing {
            Some(i) => groups[i].items.push(item.clone()),
            None => {
                first_seen.insert(key, groups.len());
                groups.push(CartonGroup {
                    serial: groups.len() + 1,
                    carton: item.carton.clone(),
                    carton_weight: item.carton_weight,
                    items: vec![item.clone()],
                });
            }
        }
    }

    groups
}

/// The three aggregates shown in the footer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub total_quantity: i64,
    /// Sum of one carton weight per distinct carton number
    pub total_carton_weight: f64,
    /// Number of distinct carton numbers
    pub package_count: usize,
}

impl Totals {
    /// Total carton weight rounded half-to-even, as printed on the gross weight line.
    pub fn gross_weight(&self) -> i64 {
        self.total_carton_weight.round_ties_even() as i64
    }
}

/// Footer aggregates over every line item
///
/// A total that no longer fits is reported against the row that pushed it over.
pub fn compute_totals(items: &[LineItem]) -> Result<Totals, ReportError> {
    let mut seen = HashSet::new();
    let mut totals = Totals::default();

    for item in items {
        let quantity = item.quantity.unwrap_or(0);
        totals.total_quantity = totals
            .total_quantity
            .checked_add(quantity)
            .filter(|total| total.abs() <= MAX_QUANTITY)
            .ok_or_else(|| data_type_error("QTY", item.row, &CellValue::from(quantity)))?;

        // First occurrence of a carton decides its weight
        if seen.insert(carton_identity(&item.carton)) {
            totals.total_carton_weight += item.carton_weight;
            if !totals.total_carton_weight.is_finite() {
                return Err(data_type_error(
                    "CRTN WEIGHT",
                    item.row,
                    &CellValue::from(item.carton_weight),
                ));
            }
        }
    }
    totals.package_count = seen.len();
    Ok(totals)
}

/// Distinct, non-blank invoice references in first-seen order.
pub fn invoice_numbers(items: &[LineItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !item.reference.is_missing())
        .map(|item| item.reference.to_string())
        .filter(|r| seen.insert(r.clone()))
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Spreadsheet default
    #[default]
    General,
    Center,
    LeftMiddle,
    RightMiddle,
    BottomLeft,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: Option<f64>,
    pub align: Alignment,
    pub border: bool,
}

impl CellStyle {
    fn aligned(align: Alignment) -> Self {
        CellStyle {
            align,
            ..Default::default()
        }
    }

    fn bold(align: Alignment) -> Self {
        CellStyle {
            bold: true,
            align,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridCell {
    pub value: CellValue,
    pub style: CellStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
}

/// Inclusive, 0-based rectangle of merged cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeRegion {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl MergeRegion {
    pub fn contains(&self, row: u32, col: u16) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    pub fn is_anchor(&self, row: u32, col: u16) -> bool {
        self.first_row == row && self.first_col == col
    }
}

/// Fully laid-out packing list.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportGrid {
    pub rows: Vec<GridRow>,
    pub merges: Vec<MergeRegion>,
    pub totals: Totals,
    pub invoice_numbers: Vec<String>,
    pub generated_on: NaiveDate,
    pub group_count: usize,
    /// Line item rows, one per input record
    pub body_rows: Range<u32>,
    /// The totals row, after the body and any footer gap
    pub footer_row: u32,
}

impl ReportGrid {
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&GridCell> {
        self.rows.get(row as usize)?.cells.get(col as usize)
    }

    pub fn value(&self, row: u32, col: u16) -> &CellValue {
        self.cell(row, col)
            .map(|c| &c.value)
            .unwrap_or(CellValue::empty_ref())
    }

    /// Linear in the number of merges; use [`ReportGrid::merged_cells`] when walking
    /// the whole grid.
    pub fn merge_at(&self, row: u32, col: u16) -> Option<&MergeRegion> {
        self.merges.iter().find(|m| m.contains(row, col))
    }

    /// Every cell covered by a merge region, anchors included.
    pub fn merged_cells(&self) -> HashSet<(u32, u16)> {
        self.merges
            .iter()
            .flat_map(|m| {
                (m.first_row..=m.last_row)
                    .flat_map(move |r| (m.first_col..=m.last_col).map(move |c| (r, c)))
            })
            .collect()
    }
}

/// Accumulates cells and merges while laying out the report.
struct GridLayout {
    rows: Vec<GridRow>,
    merges: Vec<MergeRegion>,
}

impl GridLayout {
    fn new() -> Self {
        GridLayout {
            rows: Vec::new(),
            merges: Vec::new(),
        }
    }

    fn ensure_rows(&mut self, count: u32) {
        while self.rows.len() < count as usize {
            self.rows.push(GridRow {
                cells: vec![GridCell::default(); TABLE_WIDTH as usize],
            });
        }
    }

    fn set(&mut self, row: u32, col: u16, value: impl Into<CellValue>, style: CellStyle) {
        self.ensure_rows(row + 1);
        self.rows[row as usize].cells[col as usize] = GridCell {
            value: value.into(),
            style,
        };
    }

    /// Merge a rectangle; single cells are left unmerged.
    fn merge(&mut self, first_row: u32, first_col: u16, last_row: u32, last_col: u16) {
        self.ensure_rows(last_row + 1);
        if first_row == last_row && first_col == last_col {
            return;
        }
        self.merges.push(MergeRegion {
            first_row,
            first_col,
            last_row,
            last_col,
        });
    }

    fn merged(
        &mut self,
        (first_row, first_col): (u32, u16),
        (last_row, last_col): (u32, u16),
        value: impl Into<CellValue>,
        style: CellStyle,
    ) {
        self.merge(first_row, first_col, last_row, last_col);
        self.set(first_row, first_col, value, style);
    }

    fn finish_with_borders(mut self) -> (Vec<GridRow>, Vec<MergeRegion>) {
        for row in &mut self.rows {
            for cell in &mut row.cells {
                cell.style.border = true;
            }
        }
        (self.rows, self.merges)
    }
}

fn optional_number<T: Into<f64>>(value: Option<T>) -> CellValue {
    value.map_or(CellValue::Empty, |v| CellValue::Number(v.into()))
}

/// Builds packing list grids with a fixed set of layout options.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    options: ReportOptions,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        ReportBuilder { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Build the report dated today (local time).
    pub fn build(&self, dataset: &Dataset) -> Result<ReportGrid, ReportError> {
        self.build_on(dataset, Local::now().date_naive())
    }

    /// Build the report with an explicit generation date.
    pub fn build_on(&self, dataset: &Dataset, date: NaiveDate) -> Result<ReportGrid, ReportError> {
        let map = validate(dataset)?;
        let items = parse_line_items(dataset, &map)?;
        let groups = group_cartons(&items, self.options.grouping);
        let totals = compute_totals(&items)?;
        let invoices = invoice_numbers(&items);

        debug!(
            "Grouped {} line items into {} carton groups ({:?})",
            items.len(),
            groups.len(),
            self.options.grouping
        );

        let last_col = TABLE_WIDTH - 1;
        let mut layout = GridLayout::new();

        let title_style = CellStyle {
            font_size: self.options.title_font_size,
            ..CellStyle::bold(Alignment::Center)
        };
        layout.merged((0, 0), (0, last_col), self.options.title.as_str(), title_style);

        layout.merge(1, 0, 1, 2);
        layout.merge(2, 0, 2, 2);
        layout.merged(
            (1, 4),
            (1, last_col),
            format!("Invoice Number: {}", invoices.join(", ")),
            CellStyle::aligned(Alignment::LeftMiddle),
        );
        layout.merged(
            (2, 4),
            (2, last_col),
            format!("Date: {}", date.format("%d/%m/%Y")),
            CellStyle::aligned(Alignment::LeftMiddle),
        );

        for (col, header) in TABLE_HEADERS.iter().enumerate() {
            layout.set(HEADER_ROW, col as u16, *header, CellStyle::bold(Alignment::Center));
        }

        let mut row = BODY_START_ROW;
        for group in &groups {
            let span = group.items.len() as u32;
            for (i, item) in group.items.iter().enumerate() {
                let r = row + i as u32;
                let plain = CellStyle::default();
                layout.set(r, COL_PART_NO, item.part_no.clone(), plain);
                layout.set(r, COL_QTY, optional_number(item.quantity.map(|q| q as f64)), plain);
                layout.set(r, COL_REF, item.reference.clone(), plain);
                layout.set(r, COL_DESC, item.description.clone(), plain);
                layout.set(r, COL_WEIGHT, optional_number(item.weight), plain);
                layout.set(r, COL_MANF_PART, item.manufacturer_part.clone(), plain);
                layout.set(r, COL_BRAND, item.brand.clone(), plain);
            }

            let last = row + span - 1;
            let center = CellStyle::aligned(Alignment::Center);
            layout.merged((row, COL_SERIAL), (last, COL_SERIAL), group.serial as f64, center);
            layout.merged((row, COL_CARTON), (last, COL_CARTON), group.carton.clone(), center);
            layout.merged(
                (row, COL_CARTON_WEIGHT),
                (last, COL_CARTON_WEIGHT),
                group.carton_weight,
                center,
            );
            row += span;
        }

        let body_end = row;
        row += self.options.footer_gap_rows;
        layout.ensure_rows(row);
        let footer_row = row;

        let right = CellStyle::aligned(Alignment::RightMiddle);
        layout.merged((row, 1), (row, 2), "Total Quantity", right);
        layout.set(row, COL_QTY, totals.total_quantity as f64, CellStyle::default());
        layout.merged((row, 5), (row, 7), "TOTAL CARTON WEIGHT", right);
        layout.set(row, COL_CARTON_WEIGHT, totals.total_carton_weight, CellStyle::default());

        row += 1;
        layout.merged(
            (row, 0),
            (row, last_col),
            format!("NO OF PACKAGES : {}", totals.package_count),
            CellStyle::default(),
        );

        row += 1;
        layout.merged(
            (row, 0),
            (row, last_col),
            format!("TOTAL GROSS WEIGHT : {} KG", totals.gross_weight()),
            CellStyle::default(),
        );

        row += 1;
        let signatory_last = row + self.options.signatory_rows.max(1) - 1;
        layout.merged(
            (row, 0),
            (signatory_last, last_col),
            "AUTHORISED SIGNATORY",
            CellStyle::aligned(Alignment::BottomLeft),
        );

        let (rows, merges) = layout.finish_with_borders();

        info!(
            "Built packing list: {} line items, {} groups, {} packages, total qty {}",
            items.len(),
            groups.len(),
            totals.package_count,
            totals.total_quantity
        );

        Ok(ReportGrid {
            rows,
            merges,
            totals,
            invoice_numbers: invoices,
            generated_on: date,
            group_count: groups.len(),
            body_rows: BODY_START_ROW..body_end,
            footer_row,
        })
    }
}

/// Build a report with default options, dated today.
pub fn build(dataset: &Dataset) -> Result<ReportGrid, ReportError> {
    ReportBuilder::default().build(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn item(carton: f64, weight: f64, qty: i64) -> LineItem {
        LineItem {
            row: 2,
            carton: CellValue::Number(carton),
            part_no: CellValue::text("P"),
            quantity: Some(qty),
            reference: CellValue::Empty,
            description: CellValue::Empty,
            weight: None,
            manufacturer_part: CellValue::Empty,
            carton_weight: weight,
            brand: CellValue::Empty,
        }
    }

    #[test]
    fn validate_accepts_renamed_columns() {
        let ds = Dataset::new(columns(&[
            "CARTONNO",
            "PARTNO",
            "QUANTITY",
            "REF1",
            "PARTDESC",
            "WEIGHT",
            "MANFPART",
            "CRTNWEIGHT",
            "Brand",
        ]));
        let map = validate(&ds).unwrap();
        assert_eq!(map.qty, 2);
        assert_eq!(map.carton_weight, 7);
    }

    #[test]
    fn validate_prefers_exact_name_over_alias() {
        let ds = Dataset::new(columns(&[
            "QUANTITY",
            "QTY",
            "CARTONNO",
            "PARTNO",
            "REF1",
            "PARTDESC",
            "WEIGHT",
            "MANFPART",
            "CRTN WEIGHT",
            "Brand",
        ]));
        assert_eq!(validate(&ds).unwrap().qty, 1);
    }

    #[test]
    fn validate_reports_all_missing_columns_in_order() {
        let ds = Dataset::new(columns(&["PARTNO", "QTY", "REF1", "PARTDESC", "MANFPART"]));
        match validate(&ds) {
            Err(ReportError::Schema { missing }) => {
                assert_eq!(missing, vec!["CARTONNO", "WEIGHT", "CRTN WEIGHT", "Brand"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn contiguous_grouping_splits_reappearing_keys() {
        let items = vec![item(1.0, 10.0, 1), item(2.0, 5.0, 1), item(1.0, 10.0, 1)];
        let groups = group_cartons(&items, GroupingPolicy::Contiguous);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups.iter().map(|g| g.serial).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn partition_grouping_joins_first_occurrence() {
        let mut items = vec![item(1.0, 10.0, 1), item(2.0, 5.0, 2), item(1.0, 10.0, 3)];
        items[2].part_no = CellValue::text("LATE");
        let groups = group_cartons(&items, GroupingPolicy::Partition);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].items[1].part_no, CellValue::text("LATE"));
        assert_eq!(groups[1].serial, 2);
    }

    #[test]
    fn same_carton_with_different_weight_is_a_different_group() {
        let items = vec![item(1.0, 10.0, 1), item(1.0, 12.0, 1)];
        assert_eq!(group_cartons(&items, GroupingPolicy::Partition).len(), 2);
    }

    #[test]
    fn totals_count_each_carton_weight_once() {
        let items = vec![
            item(1.0, 10.0, 2),
            item(1.0, 10.0, 3),
            item(2.0, 10.0, 1),
            item(3.0, 5.5, 4),
        ];
        let totals = compute_totals(&items).unwrap();
        assert_eq!(totals.total_quantity, 10);
        // Cartons 1 and 2 share a weight but are both counted
        assert_eq!(totals.total_carton_weight, 25.5);
        assert_eq!(totals.package_count, 3);
    }

    #[test]
    fn quantity_total_past_the_exact_range_is_rejected() {
        let mut items = vec![item(1.0, 1.0, MAX_QUANTITY), item(2.0, 1.0, 1)];
        items[1].row = 3;
        match compute_totals(&items) {
            Err(ReportError::DataType { column, row, .. }) => {
                assert_eq!(column, "QTY");
                assert_eq!(row, 3);
            }
            other => panic!("expected data type error, got {:?}", other),
        }
    }

    #[test]
    fn quantity_total_never_wraps() {
        let items = vec![item(1.0, 1.0, i64::MAX), item(2.0, 1.0, i64::MAX)];
        assert!(matches!(
            compute_totals(&items),
            Err(ReportError::DataType { .. })
        ));
    }

    #[test]
    fn gross_weight_rounds_half_to_even() {
        let mut totals = Totals::default();
        totals.total_carton_weight = 12.5;
        assert_eq!(totals.gross_weight(), 12);
        totals.total_carton_weight = 13.5;
        assert_eq!(totals.gross_weight(), 14);
        totals.total_carton_weight = 13.2;
        assert_eq!(totals.gross_weight(), 13);
    }

    #[test]
    fn invoice_numbers_are_distinct_in_first_seen_order() {
        let mut items = vec![item(1.0, 1.0, 1), item(1.0, 1.0, 1), item(2.0, 1.0, 1), item(3.0, 1.0, 1)];
        items[0].reference = CellValue::text("INV-2");
        items[1].reference = CellValue::Number(1001.0);
        items[2].reference = CellValue::text("INV-2");
        assert_eq!(invoice_numbers(&items), vec!["INV-2", "1001"]);
    }

    #[test]
    fn merge_region_contains_its_corners() {
        let m = MergeRegion {
            first_row: 5,
            first_col: 0,
            last_row: 6,
            last_col: 0,
        };
        assert!(m.contains(5, 0));
        assert!(m.contains(6, 0));
        assert!(!m.contains(7, 0));
        assert!(!m.contains(5, 1));
        assert!(m.is_anchor(5, 0));
        assert!(!m.is_anchor(6, 0));
    }
}
