use std::fmt::Display;
use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, DataType, Ods, Range, Reader, Xls, Xlsx};
use tracing::debug;

use crate::domain::error::{AppError, Result};

/// Workbook formats read through calamine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Xls,
    Ods,
}

/// Read the first worksheet of an in-memory workbook as rows of strings
pub fn read_first_sheet(buffer: &[u8], format: SpreadsheetFormat) -> Result<Vec<Vec<String>>> {
    let range = match format {
        SpreadsheetFormat::Xlsx => first_range::<Xlsx<_>>(buffer)?,
        SpreadsheetFormat::Xls => first_range::<Xls<_>>(buffer)?,
        SpreadsheetFormat::Ods => first_range::<Ods<_>>(buffer)?,
    };

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    debug!(rows = rows.len(), ?format, "Worksheet read");
    Ok(rows)
}

fn first_range<'a, R>(buffer: &'a [u8]) -> Result<Range<Data>>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: Display,
{
    let mut workbook: R = open_workbook_from_rs(Cursor::new(buffer))
        .map_err(|e| AppError::UnreadableFile(format!("Failed to open workbook: {}", e)))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::UnreadableFile("No worksheet found".to_string()))?
        .map_err(|e| AppError::UnreadableFile(format!("Failed to read worksheet: {}", e)))
}

/// Render a cell the way it reads in the sheet. Whole floats drop the
/// fractional part so numeric codes keep their digits only.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
        other => other
            .as_string()
            .unwrap_or_else(|| format!("{}", other)),
    }
}
