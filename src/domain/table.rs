// ============================================================
// TABLE
// ============================================================
// Positional table produced by the tabular reader

use serde::{Deserialize, Serialize};

/// How the first record of a file is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Decide from the cell kinds of the first row against the rest
    #[default]
    Auto,
    /// The first record is always a header
    Always,
    /// Every record is data
    Never,
}

/// Ordered rows of string cells, columns addressed by 1-based position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Header row, when one was recognized
    pub headers: Option<Vec<String>>,

    /// Data rows (header excluded)
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from raw records, splitting off a header row per `mode`
    pub fn from_records(mut records: Vec<Vec<String>>, mode: HeaderMode) -> Self {
        let has_header = match mode {
            HeaderMode::Always => !records.is_empty(),
            HeaderMode::Never => false,
            HeaderMode::Auto => looks_like_header(&records),
        };

        let headers = if has_header {
            Some(records.remove(0))
        } else {
            None
        };

        Self {
            headers,
            rows: records,
        }
    }

    /// Width of the widest row (header included)
    pub fn column_count(&self) -> usize {
        let header_width = self.headers.as_ref().map(|h| h.len()).unwrap_or(0);
        self.rows
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .max(header_width)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at a 0-based row and 1-based column; `None` when the row is shorter
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column == 0 {
            return None;
        }
        self.rows
            .get(row)
            .and_then(|r| r.get(column - 1))
            .map(|s| s.as_str())
    }
}

/// Check if a string value is numeric
fn is_numeric_value(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }

    trimmed.parse::<f64>().is_ok()
        || trimmed.parse::<i64>().is_ok()
        || trimmed.replace(',', ".").parse::<f64>().is_ok()
}

/// Width shared by every cell, if any
fn common_width(cells: &[&str]) -> Option<usize> {
    let width = cells.first()?.chars().count();
    cells
        .iter()
        .all(|v| v.chars().count() == width)
        .then_some(width)
}

/// Per column, compare the first row's cell with the remaining cells:
/// - over a numeric column, a label votes for a header, anything else against.
///   A label has no ASCII digit, or a width other than the column's common one,
///   so a mistyped value such as `1234O` stays in the data
/// - text over a text column votes for a header when every other cell has the
///   same length and the first one does not, against when it has that length too
/// - numeric over a text column votes against
///
/// The first row is a header when the votes are positive.
fn looks_like_header(records: &[Vec<String>]) -> bool {
    if records.len() < 2 {
        return false;
    }

    let first = &records[0];
    let mut votes: i64 = 0;

    for (col, head) in first.iter().enumerate() {
        let head = head.trim();
        if head.is_empty() {
            continue;
        }

        let body: Vec<&str> = records[1..]
            .iter()
            .filter_map(|r| r.get(col).map(|s| s.trim()))
            .filter(|v| !v.is_empty())
            .collect();
        let numeric = body.iter().filter(|v| is_numeric_value(v)).count();
        let text = body.len() - numeric;
        let head_width = head.chars().count();

        if numeric > text {
            let label = !is_numeric_value(head)
                && (!head.chars().any(|c| c.is_ascii_digit())
                    || common_width(&body).is_some_and(|w| w != head_width));
            votes += if label { 1 } else { -1 };
        } else if text > numeric && !is_numeric_value(head) {
            if let Some(width) = common_width(&body) {
                votes += if head_width == width { -1 } else { 1 };
            }
        } else if text > numeric {
            votes -= 1;
        }
    }

    votes > 0
}
