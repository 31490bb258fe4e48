use log::{debug, info, warn};

use survey_report::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;
use crate::report::discovery::find_latest_input;
use crate::report::io_common::InputProvider;
use crate::report::render_pdf::PdfRenderer;
use crate::report::summary::{summary_string, SummaryRenderer};

pub mod config_reader;
pub mod discovery;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;
pub mod render_pdf;
pub mod summary;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("No input file matching {pattern}"))]
    InputMissing { pattern: String },
    #[snafu(display("Invalid search pattern {pattern}"))]
    InputPattern {
        source: glob::PatternError,
        pattern: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the csv file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No data found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing json"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error preparing the report: {source}"))]
    Pipeline { source: ReportErrors },
    #[snafu(display("Error writing the report to {path}"))]
    WritingPdf {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RpResult<T> = Result<T, ReportError>;

/// Something that turns a composed report into an output artifact.
pub trait ReportRenderer {
    fn render(&self, report: &Report) -> RpResult<()>;
}

fn read_survey_data(
    path: &Path,
    provider: InputProvider,
    worksheet: Option<&str>,
) -> RpResult<SurveyTable> {
    info!(
        "read_survey_data: reading {:?} as {:?}",
        path.display(),
        provider
    );
    match provider {
        InputProvider::Csv => io_csv::read_csv_survey(path),
        InputProvider::Xlsx => io_xlsx::read_xlsx_survey(path, worksheet),
    }
}

// Repeated headers are renamed `<question>.1` by the readers. A configured
// question that appears twice cannot be told apart.
fn check_ambiguous_questions(raw: &SurveyTable, mapping: &ColumnMapping) -> RpResult<()> {
    for column in raw.columns() {
        if let Some(label) = mapping.label_for(column) {
            if raw.column_index(&format!("{}.1", column)).is_some() {
                return Err(ReportError::Pipeline {
                    source: ReportErrors::DuplicateColumn {
                        column: label.to_string(),
                    },
                });
            }
        }
    }
    Ok(())
}

// Relative paths in the configuration are relative to the configuration file.
fn resolve(root: &Path, p: &str) -> PathBuf {
    let path = Path::new(p);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Runs the full pipeline: reading, preparing, composing and rendering.
///
/// Command line arguments take precedence over the configuration.
pub fn run_report(args: &Args) -> RpResult<()> {
    let (config, root) = match args.config.as_ref() {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, root)
        }
        None => (default_config()?, PathBuf::new()),
    };
    info!("run_report: config: {:?}", config);

    let settings = config.report_settings()?;
    let mapping = config.column_mapping()?;

    let provider = InputProvider::parse(
        args.input_type
            .as_deref()
            .unwrap_or(config.input_settings.provider.as_str()),
    )?;
    let input_path = match args.input.as_ref() {
        Some(p) => PathBuf::from(p),
        None => {
            let dir = resolve(&root, &config.input_settings.input_directory);
            find_latest_input(&dir, provider.extension())?
        }
    };
    let worksheet = args
        .excel_worksheet_name
        .as_deref()
        .or(config.input_settings.excel_worksheet_name.as_deref());
    let raw = read_survey_data(&input_path, provider, worksheet)?;
    check_ambiguous_questions(&raw, &mapping)?;

    let prepared = prepare_survey(raw, &mapping, &settings).context(PipelineSnafu {})?;
    let report = prepared.compose().context(PipelineSnafu {})?;
    info!("run_report: composed {} pages", report.pages.len());

    let out_path = match args.out.as_ref() {
        Some(p) => PathBuf::from(p),
        None => resolve(&root, &config.output_settings.output_path),
    };
    let summary_path = args
        .summary
        .clone()
        .or_else(|| config.output_settings.summary_path.clone())
        .map(|p| {
            if p == "stdout" {
                p
            } else {
                resolve(&root, &p).display().to_string()
            }
        });

    let mut renderers: Vec<Box<dyn ReportRenderer>> = vec![Box::new(PdfRenderer::new(
        out_path,
        settings.label_width,
    ))];
    if let Some(p) = summary_path {
        renderers.push(Box::new(SummaryRenderer::new(
            p,
            settings.clone(),
            prepared.table().num_rows(),
        )));
    }
    for renderer in renderers.iter() {
        renderer.render(&report)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_p) = args.reference.as_ref() {
        let pretty_js_stats = summary_string(&settings, prepared.table().num_rows(), &report)?;
        let summary_ref = read_summary(reference_p)?;
        debug!("run_report: reference summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("run_report: summary matches {}", reference_p);
    }

    Ok(())
}

pub fn print_error(e: &ReportError) {
    eprintln!("An error occured {}", e);
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}

#[cfg(test)]
fn test_dir() -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "data"].iter().collect()
}

/// Runs the fixture `test_name` and returns the number of pages of the report.
///
/// The input file is discovered from the directory of the configuration.
#[cfg(test)]
pub fn test_wrapper(test_name: &str) -> usize {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = test_dir().join(test_name);
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join(format!("{}.pdf", test_name));
    let args = Args {
        config: Some(
            dir.join(format!("{}_config.json", test_name))
                .display()
                .to_string(),
        ),
        reference: Some(
            dir.join(format!("{}_expected_summary.json", test_name))
                .display()
                .to_string(),
        ),
        out: Some(out.display().to_string()),
        ..Args::default()
    };
    info!("Running test {}", test_name);
    if let Err(e) = run_report(&args) {
        print_error(&e);
        panic!("test {} failed: {}", test_name, e);
    }
    let doc = lopdf::Document::load(&out).unwrap();
    doc.get_pages().len()
}
