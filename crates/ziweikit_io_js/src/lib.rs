//! `ziweikit_io_js` v1:
//! Workbook dump loading and data-script edits around the table kernel.
//!
//! Modules:
//! - `workbook` : workbook dump JSON loading, table JSON emission
//! - `script`   : splice/extract/rename/strip edits on the data script
//! - `spec`     : script markers and errors
//! - `report`   : script edit report model
//! - `util`     : lenient JSON/JSON5 parsing helpers

pub mod report;
pub mod script;
pub mod spec;
mod util;
pub mod workbook;

pub use report::ReportScriptEdit;
pub use script::{
    C_LABEL_CAREER, TUP_LABEL_CAREER_LEGACY, edit_script_file, export_table_from_script_file,
    extract_table_from_script, rename_palace_label, rename_palace_label_file,
    splice_table_file_into_script_file, splice_table_into_script, splice_table_into_script_file,
    strip_trailing_numbered_items, strip_trailing_numbered_items_file,
};
pub use spec::{ScriptSpliceError, SpecScriptMarkers, TableWriteError, WorkbookLoadError};
pub use util::parse_json_lenient;
pub use workbook::{
    load_workbook_json, parse_workbook_json, render_report_json, render_table_json,
    write_json_text, write_report_json, write_table_json,
};
