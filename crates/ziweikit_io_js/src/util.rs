//! Lenient JSON parsing shared by the workbook and script readers.

use serde_json::Value;
use tracing::debug;

/// Parse `text` as JSON, falling back to JSON5.
///
/// The fallback accepts what Python's `json.dump` and hand-edited scripts
/// produce: `NaN`/`Infinity`, unquoted keys, single quotes, trailing commas.
/// Non-finite numbers become `null`. When both parsers reject the text, the
/// strict error is returned.
pub fn parse_json_lenient(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err_strict) => json5::from_str::<Value>(text).map_err(|err_json5| {
            debug!(strict = %err_strict, json5 = %err_json5, "lenient JSON parse failed");
            err_strict
        }),
    }
}

/// Leading `{...}` or `[...]` literal of `text`, with bracket depth tracked
/// outside single- and double-quoted strings.
///
/// Returns `None` when `text` does not start with a bracket (after
/// whitespace) or the brackets never balance.
pub fn slice_js_literal(text: &str) -> Option<&str> {
    let text = text.trim_start();
    if !text.starts_with(['{', '[']) {
        return None;
    }

    let mut n_depth = 0usize;
    let mut c_quote: Option<char> = None;
    let mut if_escaped = false;
    for (n_idx, ch) in text.char_indices() {
        if let Some(c_open) = c_quote {
            if if_escaped {
                if_escaped = false;
            } else if ch == '\\' {
                if_escaped = true;
            } else if ch == c_open {
                c_quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => c_quote = Some(ch),
            '{' | '[' => n_depth += 1,
            '}' | ']' => {
                n_depth = n_depth.checked_sub(1)?;
                if n_depth == 0 {
                    return Some(&text[..n_idx + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
