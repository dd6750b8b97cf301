use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ziweikit_io_js::{
    SpecScriptMarkers, export_table_from_script_file, load_workbook_json,
    rename_palace_label_file, render_table_json, splice_table_file_into_script_file,
    splice_table_into_script_file, strip_trailing_numbered_items_file, write_json_text,
    write_report_json,
};
use ziweikit_trans::build_trans_table;
use ziweikit_trans::conf::derive_default_trans_build_options;

#[derive(Parser, Debug)]
#[command(author, version, about = "Palace transformation table builder", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the table from a workbook dump and write it as JSON
    Build {
        /// Workbook dump JSON (`{"sheets": {name: [rows]}}`)
        #[arg(long)]
        input: PathBuf,

        /// Output table JSON path
        #[arg(long)]
        output: PathBuf,

        /// Data script to splice the table into after writing
        #[arg(long)]
        script: Option<PathBuf>,

        /// Write the build report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Header of the transformation-symbol column
        #[arg(long)]
        col_symbol: Option<String>,

        /// Header of the content column
        #[arg(long)]
        col_content: Option<String>,

        /// Maximum worker threads for sheet interpretation
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Splice an existing table JSON file into the data script
    Splice {
        #[arg(long)]
        table: PathBuf,

        #[arg(long)]
        script: PathBuf,
    },

    /// Extract the embedded table from the data script into a JSON file
    Export {
        #[arg(long)]
        script: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },

    /// Rename legacy career-palace labels (官祿/官禄) to 事業
    Rename {
        #[arg(long)]
        script: PathBuf,
    },

    /// Remove trailing numbered-list markers before closing quotes
    StripNumbering {
        #[arg(long)]
        script: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_build(
    input: PathBuf,
    output: PathBuf,
    script: Option<PathBuf>,
    report: Option<PathBuf>,
    col_symbol: Option<String>,
    col_content: Option<String>,
    workers: Option<usize>,
) -> Result<()> {
    let workbook = load_workbook_json(&input)
        .with_context(|| format!("Failed to load workbook dump {}", input.display()))?;

    let mut spec_options = derive_default_trans_build_options();
    if let Some(col_symbol) = col_symbol {
        spec_options.col_trans_symbol = col_symbol;
    }
    if let Some(col_content) = col_content {
        spec_options.col_content = col_content;
    }
    if workers.is_some() {
        spec_options.num_workers_max = workers;
    }

    let output_table =
        build_trans_table(&workbook, &spec_options).with_context(|| "Table build failed")?;

    let c_json = render_table_json(&output_table.table).with_context(|| "Table render failed")?;
    write_json_text(&output, &c_json)
        .with_context(|| format!("Failed to write table JSON {}", output.display()))?;
    info!(
        palaces = output_table.table.len(),
        path = %output.display(),
        "wrote table JSON"
    );

    if let Some(path_report) = report {
        write_report_json(&path_report, &output_table.report)
            .with_context(|| format!("Failed to write report JSON {}", path_report.display()))?;
    }

    if let Some(path_script) = script {
        splice_table_into_script_file(&path_script, &c_json, &SpecScriptMarkers::default())
            .with_context(|| format!("Failed to splice table into {}", path_script.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    match args.command {
        Command::Build {
            input,
            output,
            script,
            report,
            col_symbol,
            col_content,
            workers,
        } => run_build(
            input,
            output,
            script,
            report,
            col_symbol,
            col_content,
            workers,
        )?,
        Command::Splice { table, script } => {
            splice_table_file_into_script_file(&table, &script, &SpecScriptMarkers::default())
                .with_context(|| {
                    format!(
                        "Failed to splice {} into {}",
                        table.display(),
                        script.display()
                    )
                })?;
        }
        Command::Export { script, output } => {
            let value_table =
                export_table_from_script_file(&script, &output, &SpecScriptMarkers::default())
                    .with_context(|| {
                        format!("Failed to export table from {}", script.display())
                    })?;
            let n_palaces = value_table.as_object().map_or(0, |dict| dict.len());
            info!(palaces = n_palaces, path = %output.display(), "exported table JSON");
        }
        Command::Rename { script } => {
            rename_palace_label_file(&script)
                .with_context(|| format!("Failed to rename labels in {}", script.display()))?;
        }
        Command::StripNumbering { script } => {
            strip_trailing_numbered_items_file(&script)
                .with_context(|| format!("Failed to strip numbering in {}", script.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use ziweikit_trans::ReportTrans;

    use super::run_build;

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("ziweikit_cli_test_{n}"));
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

    #[test]
    fn run_build_writes_table_report_and_script() {
        let tmp = TestDir::new();
        let path_input = tmp.path().join("ziwei.json");
        let path_output = tmp.path().join("ziwei_output.json");
        let path_report = tmp.path().join("report.json");
        let path_script = tmp.path().join("ziwei_data_P.js");
        std::fs::write(
            &path_input,
            r#"{"sheets": {"财帛宫": [
                {"财帛宫四化": "财帛→田宅", "Unnamed:1": NaN, "Unnamed:2": NaN},
                {"财帛宫四化": NaN, "Unnamed:1": "祿", "Unnamed:2": "甲"}
            ]}}"#,
        )
        .expect("write input");
        std::fs::write(
            &path_script,
            "const ZIWEI_DATA_P = {};\n\n//宮位自化對應表\n\nconst ZIWEI_DATA_ZIHUA = {};\n",
        )
        .expect("write script");

        run_build(
            path_input,
            path_output.clone(),
            Some(path_script.clone()),
            Some(path_report.clone()),
            None,
            None,
            None,
        )
        .expect("build");

        let c_json = std::fs::read_to_string(&path_output).expect("read table");
        assert_eq!(
            c_json,
            "{\n  \"財帛\": {\n    \"祿\": {\n      \"田宅\": \"甲\"\n    }\n  }\n}"
        );

        let c_script = std::fs::read_to_string(&path_script).expect("read script");
        assert_eq!(
            c_script,
            format!(
                "const ZIWEI_DATA_P = {c_json};\n\n//宮位自化對應表\n\nconst ZIWEI_DATA_ZIHUA = {{}};\n"
            )
        );

        let report: ReportTrans = serde_json::from_str(
            &std::fs::read_to_string(&path_report).expect("read report"),
        )
        .expect("decode report");
        assert_eq!(report.cnt_sheets_scanned, 1);
        assert_eq!(report.cnt_entries_written, 1);
    }
}
