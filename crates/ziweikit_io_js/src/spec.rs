//! Script marker models and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region ScriptMarkers

/// Declarations bracketing the generated table inside the data script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecScriptMarkers {
    /// Identifier of the generated table constant.
    pub table_ident: String,
    /// Identifier of the constant that follows the table.
    pub next_ident: String,
    /// Comment line re-emitted between the table and the next section.
    pub section_comment: String,
}

impl Default for SpecScriptMarkers {
    fn default() -> Self {
        Self {
            table_ident: "ZIWEI_DATA_P".to_string(),
            next_ident: "ZIWEI_DATA_ZIHUA".to_string(),
            section_comment: "//宮位自化對應表".to_string(),
        }
    }
}

impl SpecScriptMarkers {
    /// Literal start-of-object declaration, e.g. `const ZIWEI_DATA_P =`.
    pub fn start_marker(&self) -> String {
        format!("const {} =", self.table_ident)
    }

    /// Literal start-of-next-section declaration.
    pub fn end_marker(&self) -> String {
        format!("const {} =", self.next_ident)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Workbook dump loading failures.
#[derive(Debug, Error)]
pub enum WorkbookLoadError {
    /// Reading the dump file failed.
    #[error("failed to read workbook from {path:?}: {source}")]
    Read {
        /// Workbook dump path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The dump is not valid JSON.
    #[error("failed to parse workbook JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The JSON does not have the `{"sheets": {name: [rows]}}` shape.
    #[error("invalid workbook shape: {0}")]
    InvalidShape(String),
}

/// Table JSON emission failures.
#[derive(Debug, Error)]
pub enum TableWriteError {
    /// Encoding the table failed.
    #[error("failed to encode table JSON: {0}")]
    Encode(#[from] serde_json::Error),
    /// Writing the output file failed.
    #[error("failed to write table JSON to {path:?}: {source}")]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Script splice/extract/edit failures.
#[derive(Debug, Error)]
pub enum ScriptSpliceError {
    /// The start-of-object declaration is missing (or follows the end marker).
    #[error("could not find start marker {0:?} before the next section")]
    MissingStartMarker(String),
    /// The start-of-next-section declaration is missing.
    #[error("could not find end marker {0:?}")]
    MissingEndMarker(String),
    /// No JSON value follows the start declaration.
    #[error("no table value after {0:?}")]
    MissingTableValue(String),
    /// A search pattern failed to compile.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// The embedded table or table file is not valid JSON.
    #[error("failed to parse embedded table JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Reading a file failed.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing a file failed.
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
