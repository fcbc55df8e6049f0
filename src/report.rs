use log::{debug, info, warn};

use matching_report::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_forms;
mod io_refs;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet {sheet:?}"))]
    MissingSheet { path: String, sheet: String },
    #[snafu(display("The file {path} is empty"))]
    EmptyInput { path: String },
    #[snafu(display("The file {path} has no column {column}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Error opening csv file {path}"))]
    CsvOpen { source: std::io::Error, path: String },
    #[snafu(display("Error reading line {lineno} of csv file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the configuration"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error reading the templates in {path}"))]
    ReadingTemplates {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the report to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the reference report {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid report settings"))]
    InvalidSettings { source: ReportErrors },
    #[snafu(display("No forms found for programmes {programmes:?} and matching dates {dates:?}"))]
    NoResults {
        programmes: Vec<String>,
        dates: Vec<String>,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Everything needed to produce one report, after merging the configuration
/// file and the command line. All the paths can be used as is.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportSettings {
    pub pdef_path: String,
    pub codings_path: String,
    pub programmes_path: Option<String>,
    pub response_sources: Vec<ResponseSource>,
    pub programmes: Vec<String>,
    pub matching_dates: Vec<String>,
    pub lang: Lang,
    /// A file path or `stdout`.
    pub output: String,
    pub template_directory: Option<String>,
}

fn provider_from_path(path: &str) -> String {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => "csv".to_string(),
        _ => "xlsx".to_string(),
    }
}

fn default_output_name(programmes: &[String], dates: &[String], lang: Lang) -> String {
    format!("{}_{}_{}.html", programmes.join("_"), dates.join("_"), lang.code())
}

/// Merges the configuration file (if any) with the command line. The command
/// line takes precedence.
pub fn settings_from_args(args: &Args) -> ReportResult<ReportSettings> {
    let config: Option<ReportConfig> = match &args.config {
        Some(p) => {
            let config = read_config(p)?;
            let root = Path::new(p).parent().context(MissingParentDirSnafu {})?;
            Some(config.resolved(root))
        }
        None => None,
    };
    debug!("settings_from_args: config: {:?}", config);

    let pdef_path = match (&args.pdef, config.as_ref()) {
        (Some(p), _) => p.clone(),
        (None, Some(c)) => c.pdef_path.clone(),
        (None, None) => {
            whatever!("No process definition: use --pdef or --config");
        }
    };
    let codings_path = match (&args.codings, config.as_ref()) {
        (Some(p), _) => p.clone(),
        (None, Some(c)) => c.codings_path.clone(),
        (None, None) => {
            whatever!("No codings: use --codings or --config");
        }
    };
    let programmes_path = args
        .programmes_file
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.programmes_path.clone()));

    let response_sources = match (&args.input, config.as_ref()) {
        (Some(input), _) => vec![ResponseSource {
            provider: args
                .input_type
                .clone()
                .unwrap_or_else(|| provider_from_path(input)),
            file_path: input.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        }],
        (None, Some(c)) => c.response_sources.clone(),
        (None, None) => {
            whatever!("No responses: use --input or --config");
        }
    };
    if response_sources.is_empty() {
        whatever!("No response sources detected");
    }

    let programmes = if !args.programmes.is_empty() {
        args.programmes.clone()
    } else {
        config.as_ref().map(|c| c.programmes.clone()).unwrap_or_default()
    };
    let matching_dates = if !args.dates.is_empty() {
        args.dates.clone()
    } else {
        config
            .as_ref()
            .map(|c| c.matching_dates.clone())
            .unwrap_or_default()
    };
    if programmes.is_empty() || matching_dates.is_empty() {
        whatever!("At least one programme and one matching date are required");
    }

    let lang_s = args
        .lang
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.language.clone()))
        .unwrap_or_else(|| "nl".to_string());
    let lang = Lang::from_str(&lang_s).context(InvalidSettingsSnafu {})?;

    let output = match (&args.out, config.as_ref()) {
        (Some(o), _) => o.clone(),
        (None, Some(c)) => c.output_path(&default_output_name(&programmes, &matching_dates, lang)),
        (None, None) => default_output_name(&programmes, &matching_dates, lang),
    };

    Ok(ReportSettings {
        pdef_path,
        codings_path,
        programmes_path,
        response_sources,
        programmes,
        matching_dates,
        lang,
        output,
        template_directory: config.and_then(|c| c.template_directory),
    })
}

pub fn read_responses(sources: &[ResponseSource]) -> ReportResult<ResponseTable> {
    let mut rows: Vec<Response> = Vec::new();
    for source in sources.iter() {
        info!(
            "Attempting to read responses {:?} ({})",
            source.file_path, source.provider
        );
        let table = match source.provider.as_str() {
            "xlsx" => io_forms::read_xlsx(&source.file_path, source.excel_worksheet_name.as_deref())?,
            "csv" => io_csv::read_csv(&source.file_path)?,
            x => {
                whatever!("Provider not implemented {:?}", x);
            }
        };
        let mut file_rows = io_common::read_responses(&table)?;
        info!(
            "read_responses: {} rows in {}",
            file_rows.len(),
            io_common::simplify_file_name(&source.file_path)
        );
        rows.append(&mut file_rows);
    }
    Ok(ResponseTable::new(rows))
}

pub fn read_templates(lang: Lang, directory: Option<&str>) -> ReportResult<Templates> {
    let mut templates = Templates::embedded(lang);
    if let Some(dir) = directory {
        let entries = fs::read_dir(dir).context(ReadingTemplatesSnafu { path: dir })?;
        for entry in entries {
            let entry = entry.context(ReadingTemplatesSnafu { path: dir })?;
            let p: PathBuf = entry.path();
            if !p.is_file() {
                continue;
            }
            let name = io_common::simplify_file_name(&p.display().to_string());
            // Images and other files next to the templates are not read.
            if !templates.accepts(&name) {
                debug!("read_templates: skipping {:?}", name);
                continue;
            }
            let content = fs::read_to_string(&p).context(ReadingTemplatesSnafu {
                path: p.display().to_string(),
            })?;
            templates.override_with(&name, &content);
        }
    }
    Ok(templates)
}

/// Builds the report and returns it as html.
pub fn render(
    settings: &ReportSettings,
    refs: &References,
    responses: &ResponseTable,
    templates: Templates,
    generated_on: &str,
) -> ReportResult<String> {
    let body = run_with_templates(
        responses,
        refs,
        &settings.programmes,
        &settings.matching_dates,
        settings.lang,
        generated_on,
        templates,
    )
    .context(NoResultsSnafu {
        programmes: settings.programmes.clone(),
        dates: settings.matching_dates.clone(),
    })?;
    Ok(body.html())
}

pub fn write_output(html: &str, output: &str) -> ReportResult<()> {
    if output == "stdout" {
        println!("{}", html);
        return Ok(());
    }
    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu { path: output })?;
        }
    }
    fs::write(output, html).context(WritingOutputSnafu { path: output })?;
    info!("Report written to {}", output);
    Ok(())
}

/// Fails if the report differs from the reference, after printing the differences.
pub fn check_reference(html: &str, reference_path: &str) -> ReportResult<()> {
    let reference =
        fs::read_to_string(reference_path).context(ReadingReferenceSnafu { path: reference_path })?;
    if reference != html {
        warn!("Found differences with the reference report");
        print_diff(reference.as_str(), html, "\n");
        whatever!("Difference detected between the generated report and the reference report");
    }
    Ok(())
}

pub fn run_report(args: &Args) -> ReportResult<()> {
    let settings = settings_from_args(args)?;
    info!("settings: {:?}", settings);

    let refs = io_refs::read_references(
        &settings.pdef_path,
        &settings.codings_path,
        settings.programmes_path.as_deref(),
    )?;
    let responses = read_responses(&settings.response_sources)?;
    let templates = read_templates(settings.lang, settings.template_directory.as_deref())?;
    let generated_on = chrono::Local::now().format("%d-%m-%Y").to_string();

    let html = render(&settings, &refs, &responses, templates, &generated_on)?;
    write_output(&html, &settings.output)?;

    // The reference report, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(&html, reference_path)?;
    }
    Ok(())
}
