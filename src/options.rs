use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// How rows whose carton key reappears after a different key are grouped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// Every maximal run of equal keys is its own group, so a key that comes back
    /// later starts a new group with a new serial number.
    #[default]
    Contiguous,

    /// All rows with the same key join the group of the key's first occurrence,
    /// keeping their input order within the group.
    Partition,
}

/// Layout options for the generated packing list
///
/// Every field has a default, so an options file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Text of the merged title row
    pub title: String,

    /// Name of the single worksheet
    pub sheet_name: String,

    /// Download file name
    pub file_name: String,

    /// Title font size in points; `None` keeps the workbook default
    pub title_font_size: Option<f64>,

    /// Blank rows between the last body row and the totals row
    pub footer_gap_rows: u32,

    /// Height of the signatory block in rows
    pub signatory_rows: u32,

    pub grouping: GroupingPolicy,

    /// Column widths for A..J; missing entries keep the default width
    pub column_widths: Vec<f64>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "PACKING LIST".to_string(),
            sheet_name: "Packing List".to_string(),
            file_name: "Packing_List.xlsx".to_string(),
            title_font_size: None,
            footer_gap_rows: 0,
            signatory_rows: 4,
            grouping: GroupingPolicy::Contiguous,
            column_widths: Vec::new(),
        }
    }
}

impl ReportOptions {
    /// Load options from a JSON file
    ///
    /// # Examples
    /// ```no_run
    /// use packing_list::options::ReportOptions;
    ///
    /// let options = ReportOptions::from_json_file("packing_list.json").unwrap();
    /// println!("Writing sheet {}", options.sheet_name);
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let options: ReportOptions = serde_json::from_str(content)?;
        if options.signatory_rows == 0 {
            return Err("signatory_rows must be at least 1".into());
        }
        Ok(options)
    }
}

/// Settings for the upload service, read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub options_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            options_path: None,
        }
    }
}

impl ServerConfig {
    /// `PACKING_LIST_ADDR`, `PACKING_LIST_MAX_UPLOAD` and `PACKING_LIST_OPTIONS`
    /// override the defaults. An unparseable upload limit keeps the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("PACKING_LIST_ADDR").unwrap_or(defaults.bind_addr),
            max_upload_bytes: lookup("PACKING_LIST_MAX_UPLOAD")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            options_path: lookup("PACKING_LIST_OPTIONS").map(PathBuf::from),
        }
    }
}
