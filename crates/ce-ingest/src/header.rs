//! Header row detection and column mapping.

use crate::workbook::Grid;
use ce_core::{CellValue, TableSchema};

/// Default number of leading rows searched for the header marker.
pub const HEADER_SCAN_LIMIT: usize = 10;

/// How header text is normalized before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMatch {
    /// Lowercase, all whitespace removed
    #[default]
    Whitespace,
    /// Lowercase, everything but ASCII letters and digits removed
    Alphanumeric,
}

impl HeaderMatch {
    pub fn normalize(self, text: &str) -> String {
        let keep: fn(&char) -> bool = match self {
            HeaderMatch::Whitespace => |c: &char| !c.is_whitespace(),
            HeaderMatch::Alphanumeric => |c: &char| c.is_ascii_alphanumeric(),
        };
        text.chars()
            .filter(keep)
            .flat_map(char::to_lowercase)
            .collect()
    }
}

/// Index of the first row, among the first `scan_limit`, that has a cell
/// equal to `marker` after whitespace/case normalization.
pub fn find_header_row(grid: &Grid, marker: &str, scan_limit: usize) -> Option<usize> {
    let wanted = HeaderMatch::Whitespace.normalize(marker);
    grid.rows().take(scan_limit).position(|row| {
        row.iter()
            .any(|cell| HeaderMatch::Whitespace.normalize(&cell.to_string()) == wanted)
    })
}

/// For each canonical column, the index of the header cell that maps to it.
///
/// A header matches a column when its normalized text equals the normalized
/// column name or one of its aliases. The leftmost matching header wins.
pub fn map_columns(
    header: &[CellValue],
    schema: &TableSchema,
    matching: HeaderMatch,
) -> Vec<Option<usize>> {
    let normalized: Vec<String> = header
        .iter()
        .map(|cell| matching.normalize(&cell.to_string()))
        .collect();
    schema
        .columns
        .iter()
        .map(|col| {
            let names: Vec<String> = std::iter::once(col.name.as_str())
                .chain(col.aliases.iter().map(String::as_str))
                .map(|n| matching.normalize(n))
                .collect();
            normalized
                .iter()
                .position(|h| !h.is_empty() && names.contains(h))
        })
        .collect()
}
