use clap::Parser;

/// Builds the statistics report of the matching forms of one or more programmes.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the report: reference files, response files,
    /// programmes and matching dates. Relative paths in this file are resolved from its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference HTML report. If provided, matchrep checks that the generated report
    /// matches the reference and fails otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path or 'stdout') Where to write the HTML report. Setting this option overrides the
    /// output that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A file with responses. Setting this option overrides the response sources that
    /// may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv) The type of the input. By default it is derived from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path) The process definition workbook (questions and answers).
    #[clap(long, value_parser)]
    pub pdef: Option<String>,

    /// (file path) The codings workbook (sub-questions and answer scales).
    #[clap(long, value_parser)]
    pub codings: Option<String>,

    /// (file path, optional) The workbook with the names of the programmes.
    #[clap(long, value_parser)]
    pub programmes_file: Option<String>,

    /// (programme code, repeatable) The programmes to report on.
    #[clap(short, long = "programme", value_parser)]
    pub programmes: Vec<String>,

    /// (matching date code, repeatable) The matching dates to report on, for example APRIL.
    #[clap(short, long = "date", value_parser)]
    pub dates: Vec<String>,

    /// (nl or en, default nl) The language of the report.
    #[clap(long, value_parser)]
    pub lang: Option<String>,

    /// When using an Excel file of responses, the name of the worksheet to use.
    /// By default the first worksheet is used.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
