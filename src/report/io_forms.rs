use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;
use std::fs::File;
use std::io::BufReader;

use crate::report::io_common::{cell_to_string, RawTable};
use crate::report::*;

pub fn open_xlsx(path: &str) -> ReportResult<Xlsx<BufReader<File>>> {
    open_workbook(path).context(OpeningExcelSnafu { path })
}

/// The worksheet with the given name, or the first one.
pub fn get_range(
    workbook: &mut Xlsx<BufReader<File>>,
    path: &str,
    worksheet_name: Option<&str>,
) -> ReportResult<Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
    let wrange = match worksheet_name {
        // A worksheet name was provided, use it.
        Some(name) => workbook.worksheet_range(name).context(MissingSheetSnafu {
            path,
            sheet: name,
        })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyInputSnafu { path })?,
    };
    wrange.context(OpeningExcelSnafu { path })
}

pub fn range_to_table(path: &str, wrange: &Range<DataType>) -> ReportResult<RawTable> {
    let rows: Vec<Vec<String>> = wrange
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    RawTable::new(path, rows)
}

pub fn read_xlsx(path: &str, worksheet_name: Option<&str>) -> ReportResult<RawTable> {
    let mut workbook = open_xlsx(path)?;
    let wrange = get_range(&mut workbook, path, worksheet_name)?;
    range_to_table(path, &wrange)
}
