//! Shared transformation-table specification models.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::conf::{C_COL_CONTENT, C_COL_DIRECTIVE_MARKER, C_COL_TRANS_SYMBOL};

////////////////////////////////////////////////////////////////////////////////
// #region CellAndSheetSpecification

/// Normalized cell value of one workbook row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// Return the text payload when the cell holds a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the cell counts as empty (missing, `""` or numeric zero).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(s) => s.is_empty(),
            Self::Number(n) => *n == 0.0 || n.is_nan(),
        }
    }

    /// Render the cell as content text; `None` for empty cells.
    ///
    /// Integral numbers are rendered without a fractional part.
    pub fn to_content_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Self::Number(n) => Some(n.to_string()),
            Self::None => None,
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One workbook row: ordered `(column header, cell)` pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetRow {
    /// Cells in source column order.
    pub cells: Vec<(String, EnumCellValue)>,
}

impl SpecSheetRow {
    /// Build a row from `(header, value)` pairs, keeping their order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<EnumCellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Cell under the exact column header, if present.
    pub fn get(&self, col_name: &str) -> Option<&EnumCellValue> {
        self.cells
            .iter()
            .find(|(c_name, _)| c_name == col_name)
            .map(|(_, value)| value)
    }
}

/// One named sheet of the workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheet {
    /// Raw sheet name.
    pub name: String,
    /// Rows in source order.
    pub rows: Vec<SpecSheetRow>,
}

/// Ordered sheet collection supplied by the loader.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecWorkbook {
    /// Sheets in source order; later sheets win on merge conflicts.
    pub sheets: Vec<SpecSheet>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DirectiveAndStateSpecification

/// Parsed header directive of one label cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumHeaderDirective {
    /// Natal-year block; rows under it contribute nothing.
    Skip,
    /// Self-transformation; target is the sheet's own palace.
    SelfTarget,
    /// Explicit `Source→Target`; holds the canonical target label.
    DirectedTarget(String),
}

/// Current-target state of the sheet interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnumTargetState {
    /// No header seen yet.
    #[default]
    Unset,
    /// Inside a skipped block.
    Skip,
    /// Rows route to this canonical target label.
    Target(String),
}

/// One `(symbol, target, content)` entry produced by a data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTransContribution {
    /// Transformation symbol.
    pub symbol: String,
    /// Canonical target palace label.
    pub target: String,
    /// Content text.
    pub content: String,
}

/// Per-sheet result: symbol -> target label -> content.
pub type TypeSheetTrans = BTreeMap<String, BTreeMap<String, String>>;

/// Final table: source label -> symbol -> target label -> content.
pub type TypeTransTable = BTreeMap<String, TypeSheetTrans>;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BuildOptions

/// Options controlling column lookup and parallelism of the table build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTransBuildOptions {
    /// Substring identifying the directive column header (first match wins).
    pub col_directive_marker: String,
    /// Header of the transformation-symbol column.
    pub col_trans_symbol: String,
    /// Header of the content column.
    pub col_content: String,
    /// Maximum worker threads for sheet interpretation.
    pub num_workers_max: Option<usize>,
}

impl Default for SpecTransBuildOptions {
    fn default() -> Self {
        Self {
            col_directive_marker: C_COL_DIRECTIVE_MARKER.to_string(),
            col_trans_symbol: C_COL_TRANS_SYMBOL.to_string(),
            col_content: C_COL_CONTENT.to_string(),
            num_workers_max: Some(1),
        }
    }
}

/// "Top-level call failed" errors of the table build.
#[derive(Debug, Error)]
pub enum TransBuildError {
    /// Options failed validation.
    #[error("invalid build options: {0}")]
    InvalidOptions(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
