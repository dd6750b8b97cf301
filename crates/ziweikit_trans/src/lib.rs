//! `ziweikit_trans` v1:
//! Palace transformation-table kernel.
//!
//! Modules:
//! - `conf`      : constants (palace variants, symbols, markers) and presets
//! - `spec`      : cell/sheet models, directives, options, errors
//! - `util`      : pure helpers (canonicalization, header parsing)
//! - `interpret` : per-sheet target state machine
//! - `table`     : workbook orchestration and merge
//! - `report`    : run-time report model
pub mod conf;
pub mod interpret;
pub mod report;
pub mod spec;
pub mod table;
pub mod util;

pub use conf::{C_PALACE_LIFE, TUP_PALACE_LABELS, TUP_TRANS_SYMBOLS};
pub use interpret::{SpecRowTransition, SpecSheetTrans, interpret_sheet, transition};
pub use report::{ReportTrans, ReportTransBuilder};
pub use spec::{
    EnumCellValue, EnumHeaderDirective, EnumTargetState, SpecSheet, SpecSheetRow,
    SpecTransBuildOptions, SpecTransContribution, SpecWorkbook, TransBuildError, TypeSheetTrans,
    TypeTransTable,
};
pub use table::{OutputTransTable, build_trans_table};
pub use util::{
    canonicalize_palace_name, is_known_palace_label, is_palace_sheet_name,
    is_valid_trans_symbol, parse_header_directive,
};
