use std::fmt;

/// A single value read from, or written to, a worksheet cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY: CellValue = CellValue::Empty;

/// A cell that should hold a number holds something else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotANumber;

impl fmt::Display for NotANumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a finite number")
    }
}

impl std::error::Error for NotANumber {}

impl CellValue {
    /// Shared blank value for lookups that fall outside a table
    pub fn empty_ref() -> &'static CellValue {
        &EMPTY
    }

    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    /// Blank cells and whitespace-only strings both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
        }
    }

    /// Numeric view of the cell. Text is parsed after trimming, so `" 12 "` is 12.
    ///
    /// # Returns
    /// * `Ok(None)` - the cell is missing
    /// * `Ok(Some(n))` - the cell holds or spells a number
    /// * `Err(NotANumber)` - the cell holds text that is not a number, or an infinite
    ///   value (`"inf"` and `"NaN"` parse as floats but are not quantities)
    pub fn as_number(&self) -> Result<Option<f64>, NotANumber> {
        if self.is_missing() {
            return Ok(None);
        }
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| NotANumber)?,
            CellValue::Empty => return Ok(None),
        };
        if n.is_finite() { Ok(Some(n)) } else { Err(NotANumber) }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            // Integers without decimals
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::text(s)
    }
}

/// A worksheet read as a table: the header row gives the column names, every
/// following row is one record.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// 1-based worksheet row holding the header
    pub header_row: usize,
}

impl Default for Dataset {
    fn default() -> Self {
        Dataset::new(Vec::new())
    }
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Dataset {
            columns,
            rows: Vec::new(),
            header_row: 1,
        }
    }

    /// Worksheet row number (1-based) of the record at `idx`.
    pub fn worksheet_row(&self, idx: usize) -> usize {
        self.header_row + idx + 1
    }

    /// Appends a record. Short rows are padded with empty cells, long rows are cut
    /// to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(CellValue::empty_ref())
    }
}
