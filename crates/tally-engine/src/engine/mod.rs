//! Spreadsheet engine API.
//!
//! This module provides the pure computation core for the spreadsheet:
//!
//! - [`CellRef`], [`Dimensions`] - Cell addressing (A1 notation ↔ row/col indices)
//! - [`parse_formula`], [`Term`] - Formula parsing into signed terms
//! - [`DepGraph`] - Dependents tracking and ordered transitive traversal
//! - [`evaluate`] - Folding terms into an integer value
//! - [`Cell`], [`Formula`] - Tagged literal/formula cell contents

mod cell;
mod cell_ref;
mod deps;
mod eval;
mod formula;

pub use cell::{Cell, Formula};
pub use cell_ref::{CellRef, CellRefError, Dimensions, MAX_COLUMNS};
pub use deps::{CycleError, DepGraph};
pub use eval::evaluate;
pub use formula::{MAX_RANGE_CELLS, Operand, ParseError, Sign, Term, parse_formula};
