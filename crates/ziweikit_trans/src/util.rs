//! Stateless helpers: palace-name canonicalization and header parsing.

use crate::conf::{
    C_DIRECTIVE_ARROW, C_DIRECTIVE_NATAL_YEAR, C_DIRECTIVE_SELF, C_PALACE_LIFE,
    N_WORKERS_DEFAULT_MAX, TUP_PALACE_LABELS, TUP_PALACE_LIFE_VARIANTS, TUP_PALACE_SUFFIX,
    TUP_PALACE_VARIANTS, TUP_TRANS_SYMBOLS,
};
use crate::spec::{EnumHeaderDirective, SpecSheetRow, SpecTransBuildOptions};

////////////////////////////////////////////////////////////////////////////////
// #region PalaceNames

fn _lookup_palace_variant(name: &str) -> Option<&'static str> {
    TUP_PALACE_VARIANTS
        .iter()
        .find(|(c_variant, _)| *c_variant == name)
        .map(|(_, c_label)| *c_label)
}

/// Map a raw palace spelling to its canonical label.
///
/// Resolution order:
/// 1. life-palace variants short-circuit to [`C_PALACE_LIFE`],
/// 2. exact lookup in [`TUP_PALACE_VARIANTS`],
/// 3. strip one trailing `宮`/`宫` and retry the lookup,
/// 4. otherwise return the (possibly stripped) text unchanged.
///
/// Unknown names pass through instead of failing.
pub fn canonicalize_palace_name(raw: &str) -> String {
    let c_name = raw.trim();
    if TUP_PALACE_LIFE_VARIANTS.contains(&c_name) {
        return C_PALACE_LIFE.to_string();
    }
    if let Some(c_label) = _lookup_palace_variant(c_name) {
        return c_label.to_string();
    }

    let c_name_short = c_name
        .strip_suffix(&TUP_PALACE_SUFFIX[..])
        .unwrap_or(c_name);
    _lookup_palace_variant(c_name_short)
        .unwrap_or(c_name_short)
        .to_string()
}

/// Whether a sheet name denotes a palace sheet (ends in `宮`/`宫`).
pub fn is_palace_sheet_name(name: &str) -> bool {
    name.ends_with(&TUP_PALACE_SUFFIX[..])
}

/// Whether `label` belongs to the closed canonical palace set.
pub fn is_known_palace_label(label: &str) -> bool {
    TUP_PALACE_LABELS.contains(&label)
}

/// Whether `symbol` is one of the four transformation symbols.
pub fn is_valid_trans_symbol(symbol: &str) -> bool {
    TUP_TRANS_SYMBOLS.contains(&symbol)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderDirectives

/// Parse a label cell into a header directive.
///
/// Returns `None` when the text carries no `→`. Priority is
/// natal-year skip, then self-transformation, then the directed target
/// (text after the first arrow, up to the next one).
pub fn parse_header_directive(text: &str) -> Option<EnumHeaderDirective> {
    let c_header = text.trim();
    if !c_header.contains(C_DIRECTIVE_ARROW) {
        return None;
    }

    if c_header.contains(C_DIRECTIVE_NATAL_YEAR) {
        return Some(EnumHeaderDirective::Skip);
    }
    if c_header.contains(C_DIRECTIVE_SELF) {
        return Some(EnumHeaderDirective::SelfTarget);
    }

    let c_target_raw = c_header
        .split(C_DIRECTIVE_ARROW)
        .nth(1)
        .unwrap_or_default()
        .trim();
    Some(EnumHeaderDirective::DirectedTarget(canonicalize_palace_name(
        c_target_raw,
    )))
}

/// Header of the first column whose name contains `marker`.
///
/// First match wins when several headers contain the marker.
pub fn find_directive_column<'a>(row: &'a SpecSheetRow, marker: &str) -> Option<&'a str> {
    row.cells
        .iter()
        .map(|(c_name, _)| c_name.as_str())
        .find(|c_name| c_name.contains(marker))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OptionsAndWorkers

/// Validate build options; column names and marker must be non-empty.
pub fn validate_trans_build_options(options: &SpecTransBuildOptions) -> Result<(), String> {
    if options.col_directive_marker.is_empty() {
        return Err("`col_directive_marker` must be non-empty.".to_string());
    }
    if options.col_trans_symbol.is_empty() {
        return Err("`col_trans_symbol` must be non-empty.".to_string());
    }
    if options.col_content.is_empty() {
        return Err("`col_content` must be non-empty.".to_string());
    }
    if options.col_trans_symbol == options.col_content {
        return Err(format!(
            "`col_trans_symbol` and `col_content` must differ (both {:?}).",
            options.col_content
        ));
    }
    Ok(())
}

/// Clamp requested worker count to available parallelism.
pub fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, N_WORKERS_DEFAULT_MAX),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
