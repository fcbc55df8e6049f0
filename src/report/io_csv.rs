use log::debug;
use snafu::prelude::*;
use std::fs;

use crate::report::io_common::RawTable;
use crate::report::*;

/// Exports from Dutch spreadsheets use `;` as the separator.
fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

pub fn read_csv(path: &str) -> ReportResult<RawTable> {
    let content = fs::read_to_string(path).context(CsvOpenSnafu { path })?;
    let delimiter = detect_delimiter(&content);
    debug!(
        "read_csv: path: {:?} delimiter: {:?}",
        path, delimiter as char
    );
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    RawTable::new(path, rows)
}
