//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "Z100") and zero-indexed column/row coordinates.
//! Columns are a single letter, so a sheet never has more than 26 of them.
//!
//! # Examples
//!
//! ```
//! use tally_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Number of addressable columns (`A` through `Z`).
pub const MAX_COLUMNS: usize = 26;

/// Errors produced when a cell identifier cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellRefError {
    #[error("Invalid column in cell id: {0:?}")]
    InvalidColumn(String),

    #[error("Invalid row in cell id: {0:?}")]
    InvalidRow(String),
}

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "Z10").
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Result<CellRef, CellRefError> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Result<CellRef, CellRefError> {
        let name = name.trim();
        let Some(caps) = cell_id_re().captures(name) else {
            // Distinguish a bad column prefix from a bad row suffix.
            let bytes = name.as_bytes();
            let column_ok = bytes.first().is_some_and(u8::is_ascii_uppercase)
                && !bytes.get(1).is_some_and(u8::is_ascii_alphabetic);
            return if column_ok {
                Err(CellRefError::InvalidRow(name.to_string()))
            } else {
                Err(CellRefError::InvalidColumn(name.to_string()))
            };
        };

        let col = (caps["letter"].as_bytes()[0] - b'A') as usize;
        let row = caps["numbers"]
            .parse::<usize>()
            .ok()
            .and_then(|r| r.checked_sub(1))
            .ok_or_else(|| CellRefError::InvalidRow(name.to_string()))?;

        Ok(CellRef::new(col, row))
    }

    /// Convert column index to its letter (0 -> A, 25 -> Z).
    ///
    /// Columns past `Z` have no single-letter form and render as `?`.
    pub fn col_to_letter(col: usize) -> char {
        if col < MAX_COLUMNS {
            (b'A' + col as u8) as char
        } else {
            '?'
        }
    }
}

impl std::str::FromStr for CellRef {
    type Err = CellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letter(self.col), self.row + 1)
    }
}

fn cell_id_re() -> &'static Regex {
    static CELL_ID_RE: OnceLock<Regex> = OnceLock::new();
    CELL_ID_RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Z])(?<numbers>[0-9]+)$").expect("cell id regex must compile")
    })
}

/// Fixed sheet dimensions. Cells are laid out row-major in a flat arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

impl Dimensions {
    /// Create dimensions, clamping `columns` to [`MAX_COLUMNS`].
    pub fn new(rows: usize, columns: usize) -> Self {
        Dimensions {
            rows,
            columns: columns.min(MAX_COLUMNS),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        cell.row < self.rows && cell.col < self.columns
    }

    /// Arena index of an in-bounds cell.
    pub fn index_of(&self, cell: &CellRef) -> usize {
        debug_assert!(self.contains(cell), "{} is outside {:?}", cell, self);
        cell.row * self.columns + cell.col
    }

    /// Inverse of [`Dimensions::index_of`].
    pub fn cell_at(&self, index: usize) -> CellRef {
        CellRef::new(index % self.columns, index / self.columns)
    }
}
