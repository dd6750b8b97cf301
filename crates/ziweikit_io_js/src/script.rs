//! Text edits on the data script that embeds the table.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::report::ReportScriptEdit;
use crate::spec::{ScriptSpliceError, SpecScriptMarkers};
use crate::util::{parse_json_lenient, slice_js_literal};

/// Legacy career-palace labels replaced by [`C_LABEL_CAREER`].
pub const TUP_LABEL_CAREER_LEGACY: [&str; 2] = ["官祿", "官禄"];
/// Current career-palace label.
pub const C_LABEL_CAREER: &str = "事業";

////////////////////////////////////////////////////////////////////////////////
// #region InMemoryEdits

/// Replace the table block between the start and end declarations.
///
/// Everything before `const <table> =` and everything from
/// `const <next> =` onward is preserved; the block in between is rebuilt as
/// `const <table> = <json>;` followed by the section comment.
pub fn splice_table_into_script(
    script: &str,
    table_json: &str,
    markers: &SpecScriptMarkers,
) -> Result<String, ScriptSpliceError> {
    let c_marker_start = markers.start_marker();
    let c_marker_end = markers.end_marker();

    let n_idx_end = script
        .find(&c_marker_end)
        .ok_or_else(|| ScriptSpliceError::MissingEndMarker(c_marker_end.clone()))?;
    let (c_before_end, c_from_end) = script.split_at(n_idx_end);

    let n_idx_start = c_before_end
        .find(&c_marker_start)
        .ok_or_else(|| ScriptSpliceError::MissingStartMarker(c_marker_start.clone()))?;
    let c_prefix = &c_before_end[..n_idx_start];

    Ok(format!(
        "{c_prefix}{c_marker_start} {table_json};\n\n{}\n\n{c_from_end}",
        markers.section_comment
    ))
}

/// Parse the value that follows `const <table> =`.
///
/// Strict JSON is tried first. When it fails, the leading `{...}` literal is
/// re-read as JSON5 (unquoted keys, single quotes, trailing commas). Trailing
/// `;`, comments and later declarations are left unread.
pub fn extract_table_from_script(
    script: &str,
    markers: &SpecScriptMarkers,
) -> Result<Value, ScriptSpliceError> {
    let c_pattern = format!(r"const\s+{}\s*=\s*", regex::escape(&markers.table_ident));
    let re_decl = Regex::new(&c_pattern)?;
    let m_decl = re_decl
        .find(script)
        .ok_or_else(|| ScriptSpliceError::MissingStartMarker(markers.start_marker()))?;

    let c_rest = &script[m_decl.end()..];
    let mut iter_values = serde_json::Deserializer::from_str(c_rest).into_iter::<Value>();
    match iter_values.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(err_strict)) => {
            let Some(c_literal) = slice_js_literal(c_rest) else {
                return Err(err_strict.into());
            };
            json5::from_str::<Value>(c_literal).map_err(|err_json5| {
                debug!(json5 = %err_json5, "table literal is neither JSON nor JSON5");
                ScriptSpliceError::from(err_strict)
            })
        }
        None => Err(ScriptSpliceError::MissingTableValue(markers.start_marker())),
    }
}

/// Replace every legacy career label (`官祿`, `官禄`) with `事業`.
///
/// Returns the new text and the replacement count.
pub fn rename_palace_label(script: &str) -> (String, u64) {
    let mut c_text = script.to_string();
    let mut n_replaced = 0u64;
    for c_legacy in TUP_LABEL_CAREER_LEGACY {
        n_replaced += c_text.matches(c_legacy).count() as u64;
        c_text = c_text.replace(c_legacy, C_LABEL_CAREER);
    }
    (c_text, n_replaced)
}

const C_PATTERN_TRAILING_NUMBERED_ITEMS: &str = r#"(?:[0-9]+\.\s*)+""#;

/// Remove runs of `N.` list markers sitting right before a closing quote.
///
/// `"...說明 3. 4."` becomes `"...說明 "`. Returns the new text and the number
/// of runs removed.
pub fn strip_trailing_numbered_items(script: &str) -> Result<(String, u64), ScriptSpliceError> {
    let re_items = Regex::new(C_PATTERN_TRAILING_NUMBERED_ITEMS)?;
    let n_removed = re_items.find_iter(script).count() as u64;
    if n_removed == 0 {
        return Ok((script.to_string(), 0));
    }
    Ok((re_items.replace_all(script, "\"").into_owned(), n_removed))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileEdits

fn _read_text(path: &Path) -> Result<String, ScriptSpliceError> {
    fs::read_to_string(path).map_err(|e| ScriptSpliceError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

fn _write_text(path: &Path, text: &str) -> Result<(), ScriptSpliceError> {
    fs::write(path, text).map_err(|e| ScriptSpliceError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read `path`, apply `edit`, and write back only when the text changed.
pub fn edit_script_file<P, F>(path: P, edit: F) -> Result<ReportScriptEdit, ScriptSpliceError>
where
    P: AsRef<Path>,
    F: FnOnce(&str) -> Result<(String, u64), ScriptSpliceError>,
{
    let path = path.as_ref();
    let c_text_old = _read_text(path)?;
    let (c_text_new, n_replaced) = edit(&c_text_old)?;
    let if_changed = c_text_new != c_text_old;
    if if_changed {
        _write_text(path, &c_text_new)?;
    }

    let report = ReportScriptEdit {
        path: path.to_path_buf(),
        cnt_replaced: n_replaced,
        if_changed,
    };
    info!("{report}");
    Ok(report)
}

/// Splice already-rendered table JSON into the script file.
pub fn splice_table_into_script_file<P: AsRef<Path>>(
    path_script: P,
    table_json: &str,
    markers: &SpecScriptMarkers,
) -> Result<ReportScriptEdit, ScriptSpliceError> {
    edit_script_file(path_script, |c_text| {
        Ok((splice_table_into_script(c_text, table_json, markers)?, 1))
    })
}

/// Splice a table JSON file into the script file.
///
/// The table file is re-rendered with 2-space indentation, keeping its key
/// order.
pub fn splice_table_file_into_script_file<P, Q>(
    path_table: P,
    path_script: Q,
    markers: &SpecScriptMarkers,
) -> Result<ReportScriptEdit, ScriptSpliceError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let value_table = parse_json_lenient(&_read_text(path_table.as_ref())?)?;
    let c_json = serde_json::to_string_pretty(&value_table)?;
    splice_table_into_script_file(path_script, &c_json, markers)
}

/// Extract the embedded table from the script and write it as pretty JSON.
pub fn export_table_from_script_file<P, Q>(
    path_script: P,
    path_out: Q,
    markers: &SpecScriptMarkers,
) -> Result<Value, ScriptSpliceError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let value_table = extract_table_from_script(&_read_text(path_script.as_ref())?, markers)?;
    _write_text(
        path_out.as_ref(),
        &serde_json::to_string_pretty(&value_table)?,
    )?;
    Ok(value_table)
}

/// Apply [`rename_palace_label`] to the script file.
pub fn rename_palace_label_file<P: AsRef<Path>>(
    path_script: P,
) -> Result<ReportScriptEdit, ScriptSpliceError> {
    edit_script_file(path_script, |c_text| Ok(rename_palace_label(c_text)))
}

/// Apply [`strip_trailing_numbered_items`] to the script file.
pub fn strip_trailing_numbered_items_file<P: AsRef<Path>>(
    path_script: P,
) -> Result<ReportScriptEdit, ScriptSpliceError> {
    edit_script_file(path_script, strip_trailing_numbered_items)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
