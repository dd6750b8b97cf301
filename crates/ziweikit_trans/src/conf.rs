//! Transformation-table constants and default preset factories.

use crate::spec::SpecTransBuildOptions;

/// Canonical label of the life palace.
pub const C_PALACE_LIFE: &str = "命宮";
/// Raw spellings that denote the life palace.
pub const TUP_PALACE_LIFE_VARIANTS: [&str; 3] = ["命宮", "命", "命宫"];

/// Palace suffix characters (traditional, simplified).
pub const TUP_PALACE_SUFFIX: [char; 2] = ['宮', '宫'];

/// Closed set of canonical palace labels, in chart order.
pub const TUP_PALACE_LABELS: [&str; 12] = [
    "命宮", "兄弟", "夫妻", "子女", "財帛", "疾厄", "遷移", "交友", "事業", "田宅", "福德", "父母",
];

/// Known raw spelling -> canonical palace label.
///
/// Covers traditional/simplified forms with and without the palace suffix,
/// and the legacy career label (官祿) that was renamed to 事業.
pub const TUP_PALACE_VARIANTS: [(&str, &str); 54] = [
    ("官祿宮", "事業"),
    ("官祿宫", "事業"),
    ("官祿", "事業"),
    ("官禄宮", "事業"),
    ("官禄宫", "事業"),
    ("官禄", "事業"),
    ("事業宮", "事業"),
    ("事業宫", "事業"),
    ("事業", "事業"),
    ("事业宫", "事業"),
    ("事业", "事業"),
    ("父母宮", "父母"),
    ("父母宫", "父母"),
    ("父母", "父母"),
    ("財帛宮", "財帛"),
    ("財帛宫", "財帛"),
    ("財帛", "財帛"),
    ("财帛宮", "財帛"),
    ("财帛宫", "財帛"),
    ("财帛", "財帛"),
    ("遷移宮", "遷移"),
    ("遷移宫", "遷移"),
    ("遷移", "遷移"),
    ("迁移宮", "遷移"),
    ("迁移宫", "遷移"),
    ("迁移", "遷移"),
    ("疾厄宮", "疾厄"),
    ("疾厄宫", "疾厄"),
    ("疾厄", "疾厄"),
    ("兄弟宮", "兄弟"),
    ("兄弟宫", "兄弟"),
    ("兄弟", "兄弟"),
    ("夫妻宮", "夫妻"),
    ("夫妻宫", "夫妻"),
    ("夫妻", "夫妻"),
    ("子女宮", "子女"),
    ("子女宫", "子女"),
    ("子女", "子女"),
    ("交友宮", "交友"),
    ("交友宫", "交友"),
    ("交友", "交友"),
    ("奴僕宮", "交友"),
    ("奴仆宫", "交友"),
    ("奴僕", "交友"),
    ("奴仆", "交友"),
    ("田宅宮", "田宅"),
    ("田宅宫", "田宅"),
    ("田宅", "田宅"),
    ("福德宮", "福德"),
    ("福德宫", "福德"),
    ("福德", "福德"),
    ("命宮", "命宮"),
    ("命宫", "命宮"),
    ("命", "命宮"),
];

/// The four transformation symbols (祿, 權, 科, 忌).
pub const TUP_TRANS_SYMBOLS: [&str; 4] = ["祿", "權", "科", "忌"];

/// Directional marker separating source and target in header text.
pub const C_DIRECTIVE_ARROW: &str = "→";
/// Header marker of the natal-year transformation block (skipped).
pub const C_DIRECTIVE_NATAL_YEAR: &str = "生年四化";
/// Header marker of the self-transformation block.
pub const C_DIRECTIVE_SELF: &str = "自化";

/// Substring identifying the directive column header.
pub const C_COL_DIRECTIVE_MARKER: &str = "四化";
/// Default header of the transformation-symbol column.
pub const C_COL_TRANS_SYMBOL: &str = "Unnamed:1";
/// Default header of the content column.
pub const C_COL_CONTENT: &str = "Unnamed:2";

/// Upper bound of default worker count when `num_workers_max` is unset.
pub const N_WORKERS_DEFAULT_MAX: usize = 8;

/// Build default build options.
pub fn derive_default_trans_build_options() -> SpecTransBuildOptions {
    SpecTransBuildOptions::default()
}
