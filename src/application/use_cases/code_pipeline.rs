// ============================================================
// CODE PIPELINE
// ============================================================
// Column extraction, code validation and old → new remapping

use tracing::{debug, info, warn};

use crate::domain::code::sanitize_all;
use crate::domain::error::{AppError, Result};
use crate::domain::{Account, Code, Mapping, MappingOutcome, Table};

/// Row-aligned cells of a 1-based column; `None` for missing or blank cells
fn column_cells(table: &Table, index: usize) -> Result<Vec<Option<&str>>> {
    let column_count = table.column_count();
    if index == 0 || index > column_count {
        return Err(AppError::ColumnOutOfRange {
            index,
            column_count,
        });
    }

    Ok((0..table.row_count())
        .map(|row| {
            table
                .cell(row, index)
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .collect())
}

/// Trimmed non-blank values of a 1-based column
pub fn extract_column(table: &Table, index: usize) -> Result<Vec<String>> {
    let values: Vec<String> = column_cells(table, index)?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();

    debug!(
        column = index,
        values = values.len(),
        dropped = table.row_count() - values.len(),
        "Column extracted"
    );
    Ok(values)
}

/// Extract and validate the product codes of a column. Every raw value that
/// is not a 5 or 6 digit code is reported back, nothing is dropped silently.
pub fn extract_codes(table: &Table, index: usize) -> Result<Vec<Code>> {
    let raw = extract_column(table, index)?;
    sanitize_all(&raw).map_err(|invalid| {
        warn!(
            column = index,
            invalid = invalid.len(),
            first = invalid.first().map(String::as_str).unwrap_or_default(),
            "Invalid product codes"
        );
        AppError::InvalidCode(invalid)
    })
}

/// Account numbers of a column, in file order
pub fn extract_accounts(table: &Table, index: usize) -> Result<Vec<Account>> {
    Ok(extract_column(table, index)?
        .iter()
        .filter_map(|raw| Account::new(raw))
        .collect())
}

/// Build the old → new lookup from two columns of the same table. Pairs with
/// an invalid or blank side are discarded; the first pair of a repeated old
/// code wins.
pub fn build_mapping(table: &Table, old_index: usize, new_index: usize) -> Result<Mapping> {
    let old_cells = column_cells(table, old_index)?;
    let new_cells = column_cells(table, new_index)?;

    let mut mapping = Mapping::new();
    let mut discarded = 0usize;
    let mut duplicates = 0usize;

    for (old, new) in old_cells.into_iter().zip(new_cells) {
        let pair = old
            .and_then(Code::sanitize)
            .zip(new.and_then(Code::sanitize));

        match pair {
            Some((old, new)) => {
                if !mapping.insert(old, new) {
                    duplicates += 1;
                }
            }
            None => discarded += 1,
        }
    }

    if mapping.is_empty() {
        warn!(old_column = old_index, new_column = new_index, "Mapping table has no valid pair");
        return Err(AppError::EmptyMapping);
    }

    info!(
        pairs = mapping.len(),
        discarded,
        duplicates,
        "Mapping table built"
    );
    Ok(mapping)
}

/// Replace every code found in the mapping. A position is `changed` when the
/// mapped value differs from the input and `unmatched` when the code has no
/// entry; a code mapped onto itself is neither.
pub fn apply_mapping(codes: &[Code], mapping: &Mapping) -> MappingOutcome {
    let mut updated = Vec::with_capacity(codes.len());
    let mut changed = Vec::with_capacity(codes.len());
    let mut unmatched = Vec::with_capacity(codes.len());

    for code in codes {
        match mapping.get(code) {
            Some(target) => {
                changed.push(target != code);
                unmatched.push(false);
                updated.push(target.clone());
            }
            None => {
                changed.push(false);
                unmatched.push(true);
                updated.push(code.clone());
            }
        }
    }

    let outcome = MappingOutcome {
        original: codes.to_vec(),
        codes: updated,
        changed,
        unmatched,
    };
    info!(summary = %outcome.summary(), "Mapping applied");
    outcome
}
