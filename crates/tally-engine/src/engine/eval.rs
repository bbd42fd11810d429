//! Formula evaluation.
//!
//! Evaluation is a plain left-to-right fold. It reads whatever values the
//! lookup returns and never recomputes referenced cells itself; callers are
//! responsible for evaluating in dependency order.

use super::cell_ref::CellRef;
use super::formula::{Operand, Term};

/// Fold `terms` into a value, reading referenced cells through `lookup`.
///
/// An empty term list evaluates to 0.
pub fn evaluate<F>(terms: &[Term], lookup: F) -> i64
where
    F: Fn(&CellRef) -> i64,
{
    terms.iter().fold(0, |total, term| {
        let value = match &term.operand {
            Operand::Literal(v) => *v,
            Operand::Cell(cell) => lookup(cell),
        };
        term.sign.accumulate(total, value)
    })
}
