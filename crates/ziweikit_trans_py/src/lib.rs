use std::collections::BTreeMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use ziweikit_io_js::{TableWriteError, WorkbookLoadError, parse_workbook_json, render_table_json};
use ziweikit_trans::{
    ReportTrans, SpecTransBuildOptions, TransBuildError, build_trans_table,
    canonicalize_palace_name, is_palace_sheet_name,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "ziweikit.trans.build_trans_table.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "ReportTrans")]
#[derive(Debug, Clone)]
struct PyReportTrans {
    #[pyo3(get)]
    cnt_sheets_scanned: u64,
    #[pyo3(get)]
    cnt_sheets_skipped: u64,
    #[pyo3(get)]
    cnt_rows_scanned: u64,
    #[pyo3(get)]
    cnt_headers: u64,
    #[pyo3(get)]
    cnt_entries_written: u64,
    #[pyo3(get)]
    cnt_entries_overwritten: u64,
    #[pyo3(get)]
    cnt_rows_ignored: u64,
    #[pyo3(get)]
    warnings: Vec<String>,
    report: ReportTrans,
}

impl From<ReportTrans> for PyReportTrans {
    fn from(report_trans: ReportTrans) -> Self {
        Self {
            cnt_sheets_scanned: report_trans.cnt_sheets_scanned,
            cnt_sheets_skipped: report_trans.cnt_sheets_skipped,
            cnt_rows_scanned: report_trans.cnt_rows_scanned,
            cnt_headers: report_trans.cnt_headers,
            cnt_entries_written: report_trans.cnt_entries_written,
            cnt_entries_overwritten: report_trans.cnt_entries_overwritten,
            cnt_rows_ignored: report_trans.cnt_rows_ignored,
            warnings: report_trans.warnings.clone(),
            report: report_trans,
        }
    }
}

#[pymethods]
impl PyReportTrans {
    #[getter]
    fn warning_count(&self) -> usize {
        self.report.warning_count()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.report.to_dict()
    }

    #[pyo3(signature = (prefix = "[TRANS]"))]
    fn format(&self, prefix: &str) -> String {
        self.report.format(prefix)
    }

    fn __str__(&self) -> String {
        self.report.to_string()
    }
}

fn map_workbook_load_error(exception: WorkbookLoadError) -> PyErr {
    PyValueError::new_err(exception.to_string())
}

fn map_trans_build_error(exception: TransBuildError) -> PyErr {
    match exception {
        TransBuildError::InvalidOptions(message) => PyValueError::new_err(message),
    }
}

fn map_table_write_error(exception: TableWriteError) -> PyErr {
    PyValueError::new_err(exception.to_string())
}

fn derive_build_options(
    col_symbol: Option<String>,
    col_content: Option<String>,
    num_workers_max: Option<usize>,
) -> SpecTransBuildOptions {
    let mut spec_options = SpecTransBuildOptions::default();
    if let Some(col_symbol) = col_symbol {
        spec_options.col_trans_symbol = col_symbol;
    }
    if let Some(col_content) = col_content {
        spec_options.col_content = col_content;
    }
    if num_workers_max.is_some() {
        spec_options.num_workers_max = num_workers_max;
    }
    spec_options
}

fn build_table_json(
    workbook_json: &str,
    spec_options: &SpecTransBuildOptions,
) -> PyResult<(String, ReportTrans)> {
    let workbook = parse_workbook_json(workbook_json).map_err(map_workbook_load_error)?;
    let output_table = build_trans_table(&workbook, spec_options).map_err(map_trans_build_error)?;
    let c_json = render_table_json(&output_table.table).map_err(map_table_write_error)?;
    Ok((c_json, output_table.report))
}

#[pyfunction(name = "canonicalize_palace_name")]
fn canonicalize_palace_name_py(name: &str) -> String {
    canonicalize_palace_name(name)
}

#[pyfunction(name = "is_palace_sheet_name")]
fn is_palace_sheet_name_py(name: &str) -> bool {
    is_palace_sheet_name(name)
}

#[pyfunction(name = "build_trans_table_json")]
#[pyo3(signature = (workbook_json, col_symbol = None, col_content = None, num_workers_max = None))]
fn build_trans_table_json_py(
    py: Python<'_>,
    workbook_json: String,
    col_symbol: Option<String>,
    col_content: Option<String>,
    num_workers_max: Option<usize>,
) -> PyResult<String> {
    let spec_options = derive_build_options(col_symbol, col_content, num_workers_max);
    let (c_json, _) = py.allow_threads(|| build_table_json(&workbook_json, &spec_options))?;
    Ok(c_json)
}

#[pyfunction(name = "build_trans_table_with_report")]
#[pyo3(signature = (workbook_json, col_symbol = None, col_content = None, num_workers_max = None))]
fn build_trans_table_with_report_py(
    py: Python<'_>,
    workbook_json: String,
    col_symbol: Option<String>,
    col_content: Option<String>,
    num_workers_max: Option<usize>,
) -> PyResult<(String, PyReportTrans)> {
    let spec_options = derive_build_options(col_symbol, col_content, num_workers_max);
    let (c_json, report_trans) =
        py.allow_threads(|| build_table_json(&workbook_json, &spec_options))?;
    Ok((c_json, PyReportTrans::from(report_trans)))
}

#[pymodule]
fn _ziweikit_trans_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportTrans>()?;
    module.add_function(wrap_pyfunction!(canonicalize_palace_name_py, module)?)?;
    module.add_function(wrap_pyfunction!(is_palace_sheet_name_py, module)?)?;
    module.add_function(wrap_pyfunction!(build_trans_table_json_py, module)?)?;
    module.add_function(wrap_pyfunction!(build_trans_table_with_report_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
