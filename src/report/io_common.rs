use calamine::DataType;
use log::debug;
use matching_report::Response;
use snafu::prelude::*;
use std::path::Path;

use crate::report::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The text of a worksheet cell. Whole numbers are written without a decimal
/// part, so that codes stored as numbers by Excel read as they were typed.
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(d) => d.to_string(),
        _ => String::new(),
    }
}

/// A sheet of text cells with a header row. Columns are looked up by name,
/// ignoring case.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawTable {
    pub path: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// The first row is the header.
    pub fn new(path: &str, mut rows: Vec<Vec<String>>) -> ReportResult<RawTable> {
        ensure!(!rows.is_empty(), EmptyInputSnafu { path });
        let header = rows
            .remove(0)
            .iter()
            .map(|s| s.trim().to_uppercase())
            .collect();
        debug!("RawTable::new: {}: header {:?}", path, header);
        Ok(RawTable {
            path: path.to_string(),
            header,
            rows,
        })
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.to_uppercase();
        self.header.iter().position(|h| *h == name)
    }

    /// The first of the names that is a column.
    pub fn column_of(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.column(n))
    }

    pub fn required(&self, names: &[&str]) -> ReportResult<usize> {
        self.column_of(names).context(MissingColumnSnafu {
            path: self.path.clone(),
            column: names.join(" or "),
        })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// The content of a cell. Missing cells and blank cells are `None`.
pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty())
}

const ANSWER_COLUMNS: &[&str] = &[
    "SYSTEEM_ANTWOORD_CODE",
    "GESLOTEN_ANTWOORD_CODE",
    "OPEN_ANTWOORD_STUDENT",
    "ANTWOORD",
];

/// Reads the responses of an export of the forms: one row per form and step.
/// Rows without form or step are skipped.
pub fn read_responses(table: &RawTable) -> ReportResult<Vec<Response>> {
    let form_idx = table.required(&["IO_AANVR_ID", "OOA_ID", "FORM_ID"])?;
    let student_idx = table.required(&["STUDENTNUMMER", "STUDENT_ID"])?;
    let programme_idx = table.required(&["OPLEIDING", "PROGRAMME"])?;
    let step_idx = table.required(&["PROCESSTAP", "STEP"])?;
    let faculty_idx = table.column_of(&["FACULTEIT", "FACULTY"]);
    let answer_idxs: Vec<usize> = ANSWER_COLUMNS
        .iter()
        .filter_map(|n| table.column(n))
        .collect();
    ensure!(
        !answer_idxs.is_empty(),
        MissingColumnSnafu {
            path: table.path.clone(),
            column: ANSWER_COLUMNS.join(" or "),
        }
    );

    let mut res: Vec<Response> = Vec::new();
    let mut skipped = 0;
    for row in table.rows() {
        let (form_id, step) = match (cell(row, form_idx), cell(row, step_idx)) {
            (Some(f), Some(s)) => (f, s),
            _ => {
                skipped += 1;
                continue;
            }
        };
        let answer = answer_idxs.iter().find_map(|idx| cell(row, *idx));
        res.push(Response {
            form_id: form_id.to_string(),
            student_id: cell(row, student_idx).unwrap_or("").to_string(),
            programme: cell(row, programme_idx).unwrap_or("").to_string(),
            faculty: faculty_idx.and_then(|idx| cell(row, idx)).map(|s| s.to_string()),
            step: step.to_string(),
            answer: answer.map(|s| s.to_string()),
        });
    }
    if skipped > 0 {
        debug!(
            "read_responses: {}: skipped {} rows without form or step",
            table.path, skipped
        );
    }
    Ok(res)
}
