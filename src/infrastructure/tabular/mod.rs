// ============================================================
// TABULAR READER
// ============================================================
// Turn an uploaded CSV / spreadsheet buffer into a positional Table

mod csv_parser;
mod encoding;
mod spreadsheet;

pub use csv_parser::{CsvParser, ParsedRecords, DELIMITER_CANDIDATES};
pub use encoding::SourceEncoding;
pub use spreadsheet::SpreadsheetFormat;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::{HeaderMode, Table};
use crate::infrastructure::config::GeneratorConfig;

/// File kind inferred from the upload's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Delimited,
    Spreadsheet(SpreadsheetFormat),
}

impl FileKind {
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" | "tsv" => Ok(FileKind::Delimited),
            "xlsx" | "xlsm" => Ok(FileKind::Spreadsheet(SpreadsheetFormat::Xlsx)),
            "xls" => Ok(FileKind::Spreadsheet(SpreadsheetFormat::Xls)),
            "ods" => Ok(FileKind::Spreadsheet(SpreadsheetFormat::Ods)),
            _ => Err(AppError::UnsupportedExtension(file_name.to_string())),
        }
    }
}

/// Reads uploads without any hint about encoding or delimiter
#[derive(Debug, Clone)]
pub struct TabularReader {
    sample_bytes: usize,
    header_mode: HeaderMode,
}

impl Default for TabularReader {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl TabularReader {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            sample_bytes: config.sample_bytes,
            header_mode: config.header_detection,
        }
    }

    pub fn with_header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    /// Read a named buffer into a table
    pub fn read(&self, buffer: &[u8], file_name: &str) -> Result<Table> {
        let kind = FileKind::from_file_name(file_name)?;

        let records = match kind {
            FileKind::Delimited => self.read_delimited(buffer, file_name)?,
            FileKind::Spreadsheet(format) => spreadsheet::read_first_sheet(buffer, format)
                .map_err(|e| {
                    warn!(file = file_name, error = %e, "Spreadsheet read failed");
                    e
                })?,
        };

        let table = Table::from_records(records, self.header_mode);
        info!(
            file = file_name,
            rows = table.row_count(),
            columns = table.column_count(),
            header = table.headers.is_some(),
            "Table read"
        );
        Ok(table)
    }

    /// Try each candidate encoding from the start of the buffer: decode a
    /// leading sample, detect the delimiter on it, then decode and parse the
    /// whole buffer with that pair.
    fn read_delimited(&self, buffer: &[u8], file_name: &str) -> Result<Vec<Vec<String>>> {
        let truncated = buffer.len() > self.sample_bytes;

        for encoding in SourceEncoding::CANDIDATES {
            let Some(sample) = encoding.decode_sample(buffer, self.sample_bytes) else {
                debug!(file = file_name, encoding = encoding.name(), "Sample does not decode");
                continue;
            };

            if sample.contains('\0') {
                debug!(file = file_name, encoding = encoding.name(), "Sample looks binary");
                continue;
            }

            let Some(delimiter) = CsvParser::detect_delimiter(&sample, truncated) else {
                debug!(file = file_name, encoding = encoding.name(), "No delimiter detected");
                continue;
            };

            let Some(content) = encoding.decode(buffer) else {
                debug!(file = file_name, encoding = encoding.name(), "Full content does not decode");
                continue;
            };

            let parsed = CsvParser::new().with_delimiter(delimiter).parse_content(&content);
            if parsed.records.is_empty() {
                continue;
            }

            if parsed.skipped > 0 {
                warn!(
                    file = file_name,
                    skipped = parsed.skipped,
                    "Malformed CSV records skipped"
                );
            }

            let delimiter = (delimiter as char).escape_default().to_string();
            info!(
                file = file_name,
                encoding = encoding.name(),
                delimiter = %delimiter,
                "CSV format detected"
            );
            return Ok(parsed.records);
        }

        Err(AppError::UnreadableFile(format!(
            "{}: no supported encoding / delimiter combination",
            file_name
        )))
    }
}
