// ============================================================
// CSV PARSER
// ============================================================
// Delimiter detection and tolerant record parsing for decoded text

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

/// Delimiters considered by [`CsvParser::detect_delimiter`]
pub const DELIMITER_CANDIDATES: [u8; 4] = [b';', b',', b'|', b'\t'];

/// Lines of the sample used for delimiter scoring
const SAMPLE_LINES: usize = 10;

/// Records of a delimited text plus the number of malformed ones dropped
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: Vec<Vec<String>>,
    pub skipped: usize,
}

/// CSV parser for already-decoded content
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse every record. The first record fixes the field count; records
    /// with another count, or that the reader cannot parse, are skipped.
    pub fn parse_content(&self, content: &str) -> ParsedRecords {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut parsed = ParsedRecords::default();
        let mut expected_fields: Option<usize> = None;

        for (index, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(record = index + 1, error = %e, "Skipping unparsable CSV record");
                    parsed.skipped += 1;
                    continue;
                }
            };

            let expected = *expected_fields.get_or_insert(record.len());
            if record.len() != expected {
                warn!(
                    record = index + 1,
                    fields = record.len(),
                    expected,
                    "Skipping CSV record with unexpected field count"
                );
                parsed.skipped += 1;
                continue;
            }

            parsed
                .records
                .push(record.iter().map(|s| s.to_string()).collect());
        }

        let delimiter = (self.delimiter as char).escape_default().to_string();
        debug!(
            records = parsed.records.len(),
            skipped = parsed.skipped,
            delimiter = %delimiter,
            "CSV content parsed"
        );

        parsed
    }

    /// Detect delimiter from a leading sample (semicolon, comma, pipe, tab).
    ///
    /// Each candidate is scored by how often and how consistently it occurs
    /// per line: mean count divided by one plus the standard deviation.
    /// Occurrences inside double quotes are ignored. When `truncated` is set
    /// the last line of the sample is treated as partial and left out.
    ///
    /// Returns `None` when the sample has no content line. A sample where no
    /// candidate occurs is a single-column file and yields the default comma.
    pub fn detect_delimiter(sample: &str, truncated: bool) -> Option<u8> {
        let mut lines: Vec<&str> = sample.lines().collect();
        if truncated && lines.len() > 1 {
            lines.pop();
        }
        let sample_lines: Vec<&str> = lines
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .take(SAMPLE_LINES)
            .collect();

        if sample_lines.is_empty() {
            return None;
        }

        let mut best_delimiter = None;
        let mut best_score = 0.0f32;

        for &delimiter in &DELIMITER_CANDIDATES {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| count_unquoted(line, delimiter))
                .collect();

            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = Some(delimiter);
            }
        }

        Some(best_delimiter.unwrap_or(b','))
    }
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
