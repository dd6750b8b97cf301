//! Workbook dump loading and table JSON emission.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;
use ziweikit_trans::{
    EnumCellValue, ReportTrans, SpecSheet, SpecSheetRow, SpecWorkbook, TypeTransTable,
};

use crate::spec::{TableWriteError, WorkbookLoadError};
use crate::util::parse_json_lenient;

////////////////////////////////////////////////////////////////////////////////
// #region WorkbookLoading

fn _convert_json_to_cell(value: &Value) -> EnumCellValue {
    match value {
        Value::String(s) => EnumCellValue::String(s.clone()),
        Value::Number(n) => n.as_f64().map_or(EnumCellValue::None, EnumCellValue::Number),
        _ => EnumCellValue::None,
    }
}

fn _convert_json_to_row(value: &Value) -> SpecSheetRow {
    let Value::Object(dict_row) = value else {
        return SpecSheetRow::default();
    };
    SpecSheetRow {
        cells: dict_row
            .iter()
            .map(|(c_name, value)| (c_name.clone(), _convert_json_to_cell(value)))
            .collect(),
    }
}

fn _select_sheets_object(value: &Value) -> Result<&Map<String, Value>, WorkbookLoadError> {
    let Value::Object(dict_root) = value else {
        return Err(WorkbookLoadError::InvalidShape(
            "workbook root must be a JSON object".to_string(),
        ));
    };
    match dict_root.get("sheets") {
        Some(Value::Object(dict_sheets)) => Ok(dict_sheets),
        Some(_) => Err(WorkbookLoadError::InvalidShape(
            "`sheets` must be a JSON object".to_string(),
        )),
        None => Err(WorkbookLoadError::InvalidShape(
            "missing `sheets` object".to_string(),
        )),
    }
}

/// Parse a workbook dump `{"sheets": {"<name>": [ {row}, ... ]}}`.
///
/// Sheet and column order follow the JSON text. Bare `NaN`/`Infinity`
/// tokens (as written by Python's `json.dump` for blank cells) are accepted.
/// Non-object rows load as empty rows; booleans, arrays, nested objects and
/// non-finite numbers load as empty cells.
pub fn parse_workbook_json(text: &str) -> Result<SpecWorkbook, WorkbookLoadError> {
    let value_root = parse_json_lenient(text)?;
    let dict_sheets = _select_sheets_object(&value_root)?;

    let mut l_sheets = Vec::with_capacity(dict_sheets.len());
    for (c_sheet_name, value_rows) in dict_sheets {
        let Value::Array(l_rows_raw) = value_rows else {
            return Err(WorkbookLoadError::InvalidShape(format!(
                "sheet {c_sheet_name:?} must be an array of rows"
            )));
        };
        l_sheets.push(SpecSheet {
            name: c_sheet_name.clone(),
            rows: l_rows_raw.iter().map(_convert_json_to_row).collect(),
        });
    }

    debug!(sheets = l_sheets.len(), "parsed workbook dump");
    Ok(SpecWorkbook { sheets: l_sheets })
}

/// Read and parse a workbook dump file.
pub fn load_workbook_json<P: AsRef<Path>>(path: P) -> Result<SpecWorkbook, WorkbookLoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| WorkbookLoadError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_workbook_json(&text)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableEmission

/// Render the table as pretty JSON: 2-space indent, non-ASCII kept literal,
/// no trailing newline.
///
/// The splice step depends on this exact layout.
pub fn render_table_json(table: &TypeTransTable) -> Result<String, TableWriteError> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Write already-rendered JSON text to `path`.
pub fn write_json_text<P: AsRef<Path>>(path: P, text: &str) -> Result<(), TableWriteError> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|e| TableWriteError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Render and write the table JSON to `path`.
pub fn write_table_json<P: AsRef<Path>>(
    path: P,
    table: &TypeTransTable,
) -> Result<(), TableWriteError> {
    write_json_text(path, &render_table_json(table)?)
}

/// Render the build report as pretty JSON.
pub fn render_report_json(report: &ReportTrans) -> Result<String, TableWriteError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render and write the build report JSON to `path`.
pub fn write_report_json<P: AsRef<Path>>(
    path: P,
    report: &ReportTrans,
) -> Result<(), TableWriteError> {
    write_json_text(path, &render_report_json(report)?)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use ziweikit_trans::{SpecTransBuildOptions, build_trans_table};

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("ziweikit_workbook_test_{n}"));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    const C_WORKBOOK_FIXTURE: &str = r#"{
  "sheets": {
    "說明": [{"欄位": "說明文字"}],
    "财帛宫": [
      {"财帛宫四化": "财帛→田宅", "Unnamed:1": null, "Unnamed:2": null},
      {"财帛宫四化": null, "Unnamed:1": "祿", "Unnamed:2": "甲"},
      {"财帛宫四化": null, "Unnamed:1": "權", "Unnamed:2": 12},
      {"财帛宫四化": "生年四化→財帛", "Unnamed:1": null, "Unnamed:2": null},
      {"财帛宫四化": null, "Unnamed:1": "科", "Unnamed:2": "skipped"}
    ],
    "命宮": [
      {"命宮四化": "命宮→自化"},
      {"命宮四化": null, "Unnamed:1": "忌", "Unnamed:2": "乙"},
      "not a row",
      {"命宮四化": true, "Unnamed:1": "", "Unnamed:2": "no symbol"}
    ]
  }
}"#;

    #[test]
    fn parse_workbook_json_keeps_sheet_and_column_order() {
        let workbook = parse_workbook_json(C_WORKBOOK_FIXTURE).expect("parse workbook");
        let l_names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(l_names, vec!["說明", "财帛宫", "命宮"]);

        let row = &workbook.sheets[1].rows[0];
        let l_cols: Vec<&str> = row.cells.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(l_cols, vec!["财帛宫四化", "Unnamed:1", "Unnamed:2"]);
        assert_eq!(row.get("Unnamed:1"), Some(&EnumCellValue::None));

        assert_eq!(
            workbook.sheets[1].rows[2].get("Unnamed:2"),
            Some(&EnumCellValue::Number(12.0))
        );
        assert!(workbook.sheets[2].rows[2].cells.is_empty());
        assert_eq!(
            workbook.sheets[2].rows[3].get("命宮四化"),
            Some(&EnumCellValue::None)
        );
    }

    #[test]
    fn parse_workbook_json_accepts_nan_cells() {
        let c_text = r#"{"sheets": {"财帛宫": [
            {"财帛宫四化": "财帛→田宅", "Unnamed:1": NaN, "Unnamed:2": NaN},
            {"财帛宫四化": NaN, "Unnamed:1": "祿", "Unnamed:2": "甲"},
            {"财帛宫四化": NaN, "Unnamed:1": "權", "Unnamed:2": 3}
        ]}}"#;
        let workbook = parse_workbook_json(c_text).expect("parse workbook");

        let row = &workbook.sheets[0].rows[0];
        let l_cols: Vec<&str> = row.cells.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(l_cols, vec!["财帛宫四化", "Unnamed:1", "Unnamed:2"]);
        assert_eq!(row.get("Unnamed:1"), Some(&EnumCellValue::None));

        let output =
            build_trans_table(&workbook, &SpecTransBuildOptions::default()).expect("build");
        assert_eq!(output.table["財帛"]["祿"]["田宅"], "甲");
        assert_eq!(output.table["財帛"]["權"]["田宅"], "3");
    }

    #[test]
    fn parse_workbook_json_rejects_bad_shapes() {
        assert!(matches!(
            parse_workbook_json("[]"),
            Err(WorkbookLoadError::InvalidShape(_))
        ));
        assert!(matches!(
            parse_workbook_json(r#"{"data": {}}"#),
            Err(WorkbookLoadError::InvalidShape(_))
        ));
        assert!(matches!(
            parse_workbook_json(r#"{"sheets": {"命宮": {}}}"#),
            Err(WorkbookLoadError::InvalidShape(_))
        ));
        assert!(matches!(
            parse_workbook_json("{"),
            Err(WorkbookLoadError::Parse(_))
        ));
    }

    #[test]
    fn render_table_json_matches_expected_layout() {
        let workbook = parse_workbook_json(C_WORKBOOK_FIXTURE).expect("parse workbook");
        let output =
            build_trans_table(&workbook, &SpecTransBuildOptions::default()).expect("build");
        let c_json = render_table_json(&output.table).expect("render");

        let c_expected = "{\n  \"命宮\": {\n    \"忌\": {\n      \"命宮\": \"乙\"\n    }\n  },\n  \"財帛\": {\n    \"權\": {\n      \"田宅\": \"12\"\n    },\n    \"祿\": {\n      \"田宅\": \"甲\"\n    }\n  }\n}";
        assert_eq!(c_json, c_expected);
    }

    #[test]
    fn render_table_json_is_deterministic() {
        let workbook = parse_workbook_json(C_WORKBOOK_FIXTURE).expect("parse workbook");
        let l_runs: Vec<String> = (0..3)
            .map(|_| {
                let output = build_trans_table(&workbook, &SpecTransBuildOptions::default())
                    .expect("build");
                render_table_json(&output.table).expect("render")
            })
            .collect();
        assert!(l_runs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn write_table_json_writes_rendered_text() {
        let tmp = TestDir::new();
        let path_out = tmp.path().join("ziwei_output.json");
        let workbook = parse_workbook_json(C_WORKBOOK_FIXTURE).expect("parse workbook");
        let output =
            build_trans_table(&workbook, &SpecTransBuildOptions::default()).expect("build");

        write_table_json(&path_out, &output.table).expect("write table");
        assert_eq!(
            std::fs::read_to_string(&path_out).expect("read table"),
            render_table_json(&output.table).expect("render")
        );
    }

    #[test]
    fn report_json_round_trips() {
        let tmp = TestDir::new();
        let path_report = tmp.path().join("report.json");
        let workbook = parse_workbook_json(C_WORKBOOK_FIXTURE).expect("parse workbook");
        let output =
            build_trans_table(&workbook, &SpecTransBuildOptions::default()).expect("build");

        write_report_json(&path_report, &output.report).expect("write report");
        let c_text = std::fs::read_to_string(&path_report).expect("read report");
        let report: ReportTrans = serde_json::from_str(&c_text).expect("decode report");
        assert_eq!(report, output.report);
        assert_eq!(report.cnt_sheets_skipped, 1);
        assert!(c_text.contains("\"cnt_entries_written\": 3"));
    }

    #[test]
    fn render_table_json_keeps_empty_sources() {
        let workbook = parse_workbook_json(r#"{"sheets": {"兄弟宮": []}}"#).expect("parse");
        let output =
            build_trans_table(&workbook, &SpecTransBuildOptions::default()).expect("build");
        assert_eq!(
            render_table_json(&output.table).expect("render"),
            "{\n  \"兄弟\": {}\n}"
        );
    }
}
