//! Error types for Tally core.

use thiserror::Error;

use tally_engine::engine::{CellRef, CellRefError, ParseError};

/// Errors returned by sheet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    #[error("Invalid cell id: {0}")]
    InvalidCellId(#[from] CellRefError),

    #[error("Cell {cell} is outside the {rows}x{columns} sheet")]
    OutOfBounds {
        cell: CellRef,
        rows: usize,
        columns: usize,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Circular dependency detected while setting {cell}")]
    CycleDetected { cell: CellRef },
}

pub type Result<T> = std::result::Result<T, TallyError>;
