//! Workbook-level orchestration: filter palace sheets, interpret them, and
//! merge per-sheet results into the transformation table.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::interpret::{SpecSheetTrans, interpret_sheet};
use crate::report::{ReportTrans, ReportTransBuilder};
use crate::spec::{
    SpecSheet, SpecTransBuildOptions, SpecWorkbook, TransBuildError, TypeTransTable,
};
use crate::util::{calculate_worker_limit, is_palace_sheet_name, validate_trans_build_options};

/// Built table plus the run report.
#[derive(Debug, Clone)]
pub struct OutputTransTable {
    /// source -> symbol -> target -> content.
    pub table: TypeTransTable,
    /// Counters and warnings of the run.
    pub report: ReportTrans,
}

/// Build the transformation table from a workbook.
///
/// This function performs:
/// 1. Option validation.
/// 2. Palace-sheet filtering (name ends in `宮`/`宫`); other sheets are skipped.
/// 3. Per-sheet interpretation (serial or rayon thread pool).
/// 4. Sequential merge in sheet order; later sheets win on repeated
///    `(source, symbol, target)` triples.
///
/// Every palace sheet yields its source key, even when it contributes no
/// entries. Returns [`TransBuildError`] only for invalid options; irregular
/// rows never abort the run.
pub fn build_trans_table(
    workbook: &SpecWorkbook,
    options: &SpecTransBuildOptions,
) -> Result<OutputTransTable, TransBuildError> {
    validate_trans_build_options(options).map_err(TransBuildError::InvalidOptions)?;

    let mut builder_report = ReportTransBuilder::default();
    let mut l_sheets_palace: Vec<&SpecSheet> = Vec::with_capacity(workbook.sheets.len());
    for sheet in &workbook.sheets {
        if is_palace_sheet_name(&sheet.name) {
            l_sheets_palace.push(sheet);
        } else {
            debug!(sheet = sheet.name.as_str(), "skipped non-palace sheet");
            builder_report.add_sheet_skipped();
        }
    }

    let n_workers_max = calculate_worker_limit(options.num_workers_max);
    let l_sheet_results =
        interpret_sheets(&l_sheets_palace, options, n_workers_max, &mut builder_report);

    let mut dict_table = TypeTransTable::new();
    for spec_sheet in l_sheet_results {
        merge_sheet_trans(&mut dict_table, spec_sheet, &mut builder_report);
    }

    let report = builder_report.build();
    info!(
        sources = dict_table.len(),
        workers = n_workers_max,
        "{report}"
    );

    Ok(OutputTransTable {
        table: dict_table,
        report,
    })
}

fn interpret_sheets_serial(
    l_sheets: &[&SpecSheet],
    options: &SpecTransBuildOptions,
) -> Vec<SpecSheetTrans> {
    l_sheets
        .iter()
        .map(|sheet| interpret_sheet(&sheet.name, &sheet.rows, options))
        .collect()
}

fn interpret_sheets(
    l_sheets: &[&SpecSheet],
    options: &SpecTransBuildOptions,
    n_workers_max: usize,
    builder_report: &mut ReportTransBuilder,
) -> Vec<SpecSheetTrans> {
    if n_workers_max <= 1 || l_sheets.len() <= 1 {
        return interpret_sheets_serial(l_sheets, options);
    }

    let thread_pool = ThreadPoolBuilder::new().num_threads(n_workers_max).build();
    let Ok(thread_pool) = thread_pool else {
        builder_report.add_warning(format!(
            "Failed to initialize thread pool (workers={n_workers_max}); fallback to serial interpretation."
        ));
        return interpret_sheets_serial(l_sheets, options);
    };

    thread_pool.install(|| {
        l_sheets
            .par_iter()
            .map(|sheet| interpret_sheet(&sheet.name, &sheet.rows, options))
            .collect::<Vec<_>>()
    })
}

fn merge_sheet_trans(
    dict_table: &mut TypeTransTable,
    spec_sheet: SpecSheetTrans,
    builder_report: &mut ReportTransBuilder,
) {
    let dict_source = dict_table.entry(spec_sheet.source_label).or_default();
    for (c_symbol, dict_targets) in spec_sheet.trans {
        let dict_symbol = dict_source.entry(c_symbol).or_default();
        for (c_target, c_content) in dict_targets {
            if dict_symbol.insert(c_target, c_content).is_some() {
                builder_report.add_overwritten();
            }
        }
    }
    builder_report.merge(spec_sheet.report);
}
