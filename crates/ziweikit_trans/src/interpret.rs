//! Per-sheet interpreter: header directives drive a current-target state,
//! data rows are routed under that target.

use tracing::{debug, warn};

use crate::report::ReportTransBuilder;
use crate::spec::{
    EnumHeaderDirective, EnumTargetState, SpecSheetRow, SpecTransBuildOptions,
    SpecTransContribution, TypeSheetTrans,
};
use crate::util::{
    canonicalize_palace_name, find_directive_column, is_known_palace_label,
    is_valid_trans_symbol, parse_header_directive,
};

/// Outcome of feeding one row through [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRowTransition {
    /// State after the row.
    pub state: EnumTargetState,
    /// Directive parsed from the row, if it is a header row.
    pub directive: Option<EnumHeaderDirective>,
    /// Entry produced by the row, if it is a valid data row.
    pub contribution: Option<SpecTransContribution>,
}

/// Interpretation result of one palace sheet.
#[derive(Debug, Clone)]
pub struct SpecSheetTrans {
    /// Raw sheet name.
    pub sheet_name: String,
    /// Canonical source label of the sheet.
    pub source_label: String,
    /// symbol -> target -> content.
    pub trans: TypeSheetTrans,
    /// Per-sheet counters and warnings.
    pub report: ReportTransBuilder,
}

/// Parse the row's directive cell, if the row is a header row.
///
/// The directive cell is the first column whose header contains
/// `options.col_directive_marker`; only non-empty text with `→` counts.
pub fn derive_row_directive(
    row: &SpecSheetRow,
    options: &SpecTransBuildOptions,
) -> Option<EnumHeaderDirective> {
    let c_col_directive = find_directive_column(row, &options.col_directive_marker)?;
    let c_text = row.get(c_col_directive)?.as_str()?;
    if c_text.is_empty() {
        return None;
    }
    parse_header_directive(c_text)
}

/// Apply a header directive to the current state.
///
/// An empty directed target resets the state to [`EnumTargetState::Unset`].
pub fn apply_header_directive(
    directive: &EnumHeaderDirective,
    own_label: &str,
) -> EnumTargetState {
    match directive {
        EnumHeaderDirective::Skip => EnumTargetState::Skip,
        EnumHeaderDirective::SelfTarget => EnumTargetState::Target(own_label.to_string()),
        EnumHeaderDirective::DirectedTarget(c_label) if c_label.is_empty() => {
            EnumTargetState::Unset
        }
        EnumHeaderDirective::DirectedTarget(c_label) => EnumTargetState::Target(c_label.clone()),
    }
}

/// Read the data columns of `row` under `state`.
///
/// Contributes only when the state holds a target, both cells are non-empty
/// and the symbol is one of the four transformation symbols.
pub fn derive_row_contribution(
    state: &EnumTargetState,
    row: &SpecSheetRow,
    options: &SpecTransBuildOptions,
) -> Option<SpecTransContribution> {
    let EnumTargetState::Target(c_target) = state else {
        return None;
    };

    let value_symbol = row.get(&options.col_trans_symbol)?;
    let value_content = row.get(&options.col_content)?;
    if value_symbol.is_empty() {
        return None;
    }
    let c_symbol = value_symbol.as_str()?;
    if !is_valid_trans_symbol(c_symbol) {
        return None;
    }
    let c_content = value_content.to_content_text()?;

    Some(SpecTransContribution {
        symbol: c_symbol.to_string(),
        target: c_target.clone(),
        content: c_content,
    })
}

/// Pure per-row transition: `(state, row) -> (state, contribution)`.
///
/// Directive parsing and data extraction both run against the same row, so a
/// header row that also carries data contributes under its new target.
pub fn transition(
    state: EnumTargetState,
    row: &SpecSheetRow,
    own_label: &str,
    options: &SpecTransBuildOptions,
) -> SpecRowTransition {
    let directive = derive_row_directive(row, options);
    let state = match &directive {
        Some(d) => apply_header_directive(d, own_label),
        None => state,
    };
    let contribution = derive_row_contribution(&state, row, options);

    SpecRowTransition {
        state,
        directive,
        contribution,
    }
}

/// Interpret the rows of one palace sheet.
///
/// Never fails: rows that do not fit the documented shapes contribute
/// nothing and are counted as ignored.
pub fn interpret_sheet(
    sheet_name: &str,
    rows: &[SpecSheetRow],
    options: &SpecTransBuildOptions,
) -> SpecSheetTrans {
    let c_source_label = canonicalize_palace_name(sheet_name);
    let mut builder_report = ReportTransBuilder::default();
    builder_report.add_sheet_scanned();
    if !is_known_palace_label(&c_source_label) {
        let c_msg = format!(
            "Unknown source palace {c_source_label:?} from sheet {sheet_name:?}; kept as-is."
        );
        warn!("{c_msg}");
        builder_report.add_warning(c_msg);
    }

    let mut dict_trans = TypeSheetTrans::new();
    let mut enum_state = EnumTargetState::Unset;

    for (n_idx_row, row) in rows.iter().enumerate() {
        builder_report.add_row_scanned();
        let spec_step = transition(enum_state, row, &c_source_label, options);
        enum_state = spec_step.state;

        if let Some(directive) = &spec_step.directive {
            builder_report.add_header();
            if let EnumHeaderDirective::DirectedTarget(c_label) = directive {
                if !c_label.is_empty() && !is_known_palace_label(c_label) {
                    let c_msg = format!(
                        "Unknown target palace {c_label:?} in sheet {sheet_name:?} (row {n_idx_row}); kept as-is."
                    );
                    warn!("{c_msg}");
                    builder_report.add_warning(c_msg);
                }
            }
        }

        match spec_step.contribution {
            Some(contribution) => {
                let b_overwrite = dict_trans
                    .entry(contribution.symbol)
                    .or_default()
                    .insert(contribution.target, contribution.content)
                    .is_some();
                builder_report.add_entry_written(b_overwrite);
            }
            None if spec_step.directive.is_none() => builder_report.add_row_ignored(),
            None => {}
        }
    }

    debug!(
        sheet = sheet_name,
        source = c_source_label.as_str(),
        rows = rows.len(),
        entries = builder_report.cnt_entries_written,
        "interpreted palace sheet"
    );

    SpecSheetTrans {
        sheet_name: sheet_name.to_string(),
        source_label: c_source_label,
        trans: dict_trans,
        report: builder_report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumCellValue;

    fn header(text: &str) -> SpecSheetRow {
        SpecSheetRow::from_pairs([("財帛宮四化", text)])
    }

    fn data(symbol: &str, content: &str) -> SpecSheetRow {
        SpecSheetRow::from_pairs([
            ("財帛宮四化", ""),
            ("Unnamed:1", symbol),
            ("Unnamed:2", content),
        ])
    }

    #[test]
    fn transition_header_sets_directed_target() {
        let options = SpecTransBuildOptions::default();
        let step = transition(
            EnumTargetState::Unset,
            &header("财帛→田宅"),
            "財帛",
            &options,
        );
        assert_eq!(step.state, EnumTargetState::Target("田宅".to_string()));
        assert_eq!(
            step.directive,
            Some(EnumHeaderDirective::DirectedTarget("田宅".to_string()))
        );
        assert_eq!(step.contribution, None);
    }

    #[test]
    fn transition_data_row_under_unset_or_skip_contributes_nothing() {
        let options = SpecTransBuildOptions::default();
        for enum_state in [EnumTargetState::Unset, EnumTargetState::Skip] {
            let step = transition(enum_state.clone(), &data("祿", "甲"), "財帛", &options);
            assert_eq!(step.state, enum_state);
            assert_eq!(step.contribution, None);
        }
    }

    #[test]
    fn transition_header_and_data_in_same_row() {
        let options = SpecTransBuildOptions::default();
        let row = SpecSheetRow::from_pairs([
            ("財帛宮四化", "財帛→夫妻"),
            ("Unnamed:1", "科"),
            ("Unnamed:2", "乙"),
        ]);
        let step = transition(EnumTargetState::Skip, &row, "財帛", &options);
        assert_eq!(step.state, EnumTargetState::Target("夫妻".to_string()));
        assert_eq!(
            step.contribution,
            Some(SpecTransContribution {
                symbol: "科".to_string(),
                target: "夫妻".to_string(),
                content: "乙".to_string(),
            })
        );
    }

    #[test]
    fn transition_empty_directed_target_resets_state() {
        let options = SpecTransBuildOptions::default();
        let step = transition(
            EnumTargetState::Target("田宅".to_string()),
            &header("財帛→ "),
            "財帛",
            &options,
        );
        assert_eq!(step.state, EnumTargetState::Unset);
    }

    #[test]
    fn derive_row_contribution_rejects_invalid_cells() {
        let options = SpecTransBuildOptions::default();
        let enum_state = EnumTargetState::Target("田宅".to_string());

        assert_eq!(derive_row_contribution(&enum_state, &data("", "甲"), &options), None);
        assert_eq!(derive_row_contribution(&enum_state, &data("禄", "甲"), &options), None);
        assert_eq!(derive_row_contribution(&enum_state, &data("祿", ""), &options), None);
        assert_eq!(
            derive_row_contribution(&enum_state, &header("no data"), &options),
            None
        );

        let row_numeric = SpecSheetRow::from_pairs([
            ("Unnamed:1", EnumCellValue::String("忌".to_string())),
            ("Unnamed:2", EnumCellValue::Number(3.0)),
        ]);
        assert_eq!(
            derive_row_contribution(&enum_state, &row_numeric, &options)
                .map(|c| c.content),
            Some("3".to_string())
        );
    }

    #[test]
    fn interpret_sheet_routes_rows_under_headers() {
        let options = SpecTransBuildOptions::default();
        let rows = vec![
            header("财帛→田宅"),
            data("祿", "甲"),
            data("權", "乙"),
            header("生年四化→財帛"),
            data("科", "丙"),
            data("忌", "丁"),
            header("財帛→自化"),
            data("忌", "戊"),
            data("X", "ignored"),
        ];

        let spec_sheet = interpret_sheet("财帛宫", &rows, &options);
        assert_eq!(spec_sheet.source_label, "財帛");
        assert_eq!(spec_sheet.trans["祿"]["田宅"], "甲");
        assert_eq!(spec_sheet.trans["權"]["田宅"], "乙");
        assert!(!spec_sheet.trans.contains_key("科"));
        assert_eq!(spec_sheet.trans["忌"].len(), 1);
        assert_eq!(spec_sheet.trans["忌"]["財帛"], "戊");

        let report = spec_sheet.report.build();
        assert_eq!(report.cnt_rows_scanned, 9);
        assert_eq!(report.cnt_headers, 3);
        assert_eq!(report.cnt_entries_written, 3);
        assert_eq!(report.cnt_rows_ignored, 3);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn interpret_sheet_last_write_wins_within_sheet() {
        let options = SpecTransBuildOptions::default();
        let rows = vec![header("命→兄弟"), data("祿", "first"), data("祿", "second")];

        let spec_sheet = interpret_sheet("命宮", &rows, &options);
        assert_eq!(spec_sheet.trans["祿"]["兄弟"], "second");
        assert_eq!(spec_sheet.report.cnt_entries_overwritten, 1);
    }

    #[test]
    fn interpret_sheet_warns_on_unknown_target() {
        let options = SpecTransBuildOptions::default();
        let rows = vec![header("命→身宮"), data("祿", "甲")];

        let spec_sheet = interpret_sheet("命宮", &rows, &options);
        assert_eq!(spec_sheet.trans["祿"]["身"], "甲");
        assert_eq!(spec_sheet.report.warnings.len(), 1);
    }
}
