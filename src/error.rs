use thiserror::Error;

/// Everything that can stop a packing list from being produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportError {
    /// Required columns are absent from the header row, even after renaming.
    #[error("Missing columns in uploaded file: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A cell that must hold a number (or a carton key) does not.
    /// `row` is the 1-based worksheet row, counting the header as row 1.
    #[error("Invalid value {value:?} in column {column} (row {row})")]
    DataType {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Could not read uploaded file: {0}")]
    Load(String),

    #[error("Could not write packing list: {0}")]
    Write(String),
}

impl ReportError {
    /// Schema and data errors are the uploader's to fix; the rest are failures of
    /// the request itself.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ReportError::Schema { .. } | ReportError::DataType { .. })
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Write(e.to_string())
    }
}

impl From<calamine::Error> for ReportError {
    fn from(e: calamine::Error) -> Self {
        ReportError::Load(e.to_string())
    }
}
